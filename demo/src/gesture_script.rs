use backend::{
    data::prelude::*,
    renderer::{RecordingRenderer, Renderer},
    scene_system::{Controller, InputStatus, PointerEvent, Scene, Surface, ToolOptions},
};

/// A gesture in screen pixels, replayed as a stream of pointer events.
#[derive(Debug, Clone, Copy)]
pub enum Gesture {
    Drag { from: ScreenPoint, to: ScreenPoint, steps: usize },
    Pinch { center: ScreenPoint, from_span: f32, to_span: f32, steps: usize },
    Scroll { at: ScreenPoint, lines: f32 },
}

pub fn default_script() -> Vec<Gesture> {
    vec![
        Gesture::Scroll { at: ScreenPoint::new(600.0, 100.0), lines: 3.0 },
        Gesture::Drag { from: ScreenPoint::new(400.0, 200.0), to: ScreenPoint::new(200.0, 250.0), steps: 8 },
        Gesture::Pinch { center: ScreenPoint::new(400.0, 200.0), from_span: 50.0, to_span: 200.0, steps: 6 },
        Gesture::Drag { from: ScreenPoint::new(100.0, 100.0), to: ScreenPoint::new(790.0, 390.0), steps: 4 },
        Gesture::Scroll { at: ScreenPoint::new(0.0, 0.0), lines: -30.0 },
    ]
}

fn step_status(step: usize, steps: usize) -> InputStatus {
    match step {
        0 => InputStatus::Start,
        s if s == steps => InputStatus::End,
        _ => InputStatus::Move,
    }
}

/// Events for one gesture, still in screen space.
fn screen_events(gesture: &Gesture) -> Vec<(InputStatus, Vec<ScreenPoint>)> {
    match *gesture {
        Gesture::Drag { from, to, steps } => (0..=steps.max(1))
            .map(|step| {
                let t = step as f32 / steps.max(1) as f32;
                (step_status(step, steps.max(1)), vec![from.lerp(to, t)])
            })
            .collect(),
        Gesture::Pinch { center, from_span, to_span, steps } => (0..=steps.max(1))
            .map(|step| {
                let t = step as f32 / steps.max(1) as f32;
                let half = (from_span + (to_span - from_span) * t) / 2.0;
                let spread = ScreenVector::new(half, 0.0);
                let fingers = vec![center - spread, center + spread];
                (step_status(step, steps.max(1)), fingers)
            })
            .collect(),
        Gesture::Scroll { at, .. } => vec![(InputStatus::Move, vec![at]), (InputStatus::End, vec![at])],
    }
}

pub fn run(scene: &mut Scene, renderer: &mut RecordingRenderer, script: &[Gesture]) -> backend::Result<()> {
    let viewport = scene.camera().viewport();
    let surface = Surface::new(ScreenPoint::origin(), viewport)?;
    let mut controller = Controller::new(ToolOptions::default())?;

    for gesture in script {
        for (status, screen) in screen_events(gesture) {
            // Convert with the camera as it is now; the tools follow the view.
            let world: Vec<Point> = screen.iter().map(|&p| surface.screen_to_world(p, scene.camera())).collect();
            let event = match (gesture, world.as_slice()) {
                (Gesture::Drag { .. }, &[point]) => PointerEvent::Pointer { status, point },
                (Gesture::Pinch { .. }, &[a, b]) => PointerEvent::Pinch { status, points: [a, b] },
                (Gesture::Scroll { lines, .. }, &[focus]) => PointerEvent::Wheel { status, lines: *lines, focus },
                _ => continue,
            };
            controller.handle(event, scene.camera_mut())?;
        }

        renderer.clear_draws();
        renderer.update_scene(scene);

        let hit = scene.hit_test(scene.camera().view().center());
        log::info!(
            "{:?}: zoom {:.3}, view {:?}, {} draws, hit at center {:?}",
            gesture,
            scene.camera().zoom(),
            scene.camera().view(),
            renderer.draws.len(),
            hit
        );
    }
    Ok(())
}
