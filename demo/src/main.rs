use anyhow::Context;
use backend::{
    renderer::{RecordingRenderer, Renderer},
    scene_system::Scene,
};

mod gesture_script;

const DEFAULT_SCENE: &str = include_str!("scene.json");

fn main() -> anyhow::Result<()> {
    backend::app::init();

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("cannot read scene file {path}"))?,
        None => DEFAULT_SCENE.to_string(),
    };
    let mut scene = Scene::parse(&text).context("cannot build scene")?;

    let mut renderer = RecordingRenderer::new();
    renderer.update_scene(&mut scene);
    log::info!(
        "first frame: {} of {} shapes drawn, scene bounds {:?}",
        renderer.draws.len(),
        scene.len(),
        scene.measure_boundaries()
    );

    gesture_script::run(&mut scene, &mut renderer, &gesture_script::default_script())?;
    log::info!("{} projection uploads in total", renderer.projections.len());
    Ok(())
}
