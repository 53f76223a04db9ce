//! The contract with a drawing backend.
//!
//! The core never talks to a GPU. It hands packed vertex bytes, packed
//! `u16` index bytes and flat matrices to a [`Renderer`], which uploads them
//! however it likes.

use bytemuck::{Pod, Zeroable};

use crate::{
    data::prelude::*,
    mesh::Mesh,
    scene_system::{Scene, Shape},
};

/// Model matrix as a column-major 3x3, ready for a uniform upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub matrix: [f32; 9],
}

impl ModelUniform {
    pub fn new(matrix: &Affine2D) -> Self {
        Self { matrix: matrix.to_mat3() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Everything needed to draw one shape.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub mesh: &'a Mesh,
    /// Float32 pairs.
    pub vertices: &'a [u8],
    /// Uint16 triples; `None` for meshes drawn without indices.
    pub indices: Option<&'a [u8]>,
    pub index_count: usize,
    pub model: ModelUniform,
}

impl<'a> DrawCall<'a> {
    pub fn new(shape: &'a Shape) -> Self {
        let mesh: &Mesh = shape.mesh();
        let indices = mesh.indices();
        Self {
            mesh,
            vertices: mesh.vertices().as_bytes(),
            indices: indices.map(|indices| indices.as_bytes()),
            index_count: indices.map_or(0, |indices| indices.as_slice().len()),
            model: ModelUniform::new(shape.matrix()),
        }
    }
}

pub trait Renderer {
    fn update_view_matrix(&mut self, projection: &ProjMatrix);

    /// The projection most recently passed to `update_view_matrix`.
    fn view_matrix(&self) -> Option<&ProjMatrix>;

    fn draw_mesh(&mut self, call: &DrawCall);

    /// Push the projection if it differs from the one this renderer holds,
    /// then draw every shape that overlaps the view, bottom to top.
    fn update_scene(&mut self, scene: &mut Scene) {
        let projection = *scene.camera_mut().projection();
        if self.view_matrix() != Some(&projection) {
            self.update_view_matrix(&projection);
        }

        let view = scene.camera().view();
        for shape in scene.shapes() {
            if shape.measure_boundaries().is_some_and(|bounds| bounds.intersects(&view)) {
                self.draw_mesh(&DrawCall::new(shape));
            } else {
                log::trace!("culled mesh {:?}", shape.mesh().id());
            }
        }
    }
}

/// A draw call copied out of the borrowed buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub mesh_id: Option<String>,
    pub vertex_bytes: usize,
    pub index_count: usize,
    pub instances: usize,
    pub model: ModelUniform,
}

/// Renderer that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub projections: Vec<ProjMatrix>,
    pub draws: Vec<RecordedDraw>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the draws of the previous frame.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn update_view_matrix(&mut self, projection: &ProjMatrix) {
        self.projections.push(*projection);
    }

    fn view_matrix(&self) -> Option<&ProjMatrix> {
        self.projections.last()
    }

    fn draw_mesh(&mut self, call: &DrawCall) {
        self.draws.push(RecordedDraw {
            mesh_id: call.mesh.id().map(str::to_string),
            vertex_bytes: call.vertices.len(),
            index_count: call.index_count,
            instances: call.mesh.instance_count(),
            model: call.model,
        });
    }
}

#[cfg(test)]
mod test_renderer {
    use std::rc::Rc;

    use super::*;
    use crate::{mesh::regular_polygon, scene_system::{Camera, CameraOptions}};

    fn scene() -> Scene {
        let camera = Camera::new(Rect::new(-10.0, 10.0, 10.0, -10.0), CameraOptions::default()).unwrap();
        let mut scene = Scene::new(camera);
        let hexagon = Rc::new(regular_polygon(6, true).unwrap().with_id("hex"));
        scene.push(Shape::new(Rc::clone(&hexagon)));
        let mut far = Shape::new(hexagon);
        far.matrix_mut().post_translate(8.0, 0.0);
        scene.push(far);
        scene
    }

    #[test]
    fn test_model_uniform_layout() {
        let uniform = ModelUniform::new(&Affine2D::translation(3.0, 4.0));
        assert_eq!(uniform.matrix, [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 3.0, 4.0, 1.0]);
        assert_eq!(uniform.as_bytes().len(), 9 * 4);
    }

    #[test]
    fn test_update_scene_records_draws() {
        let mut scene = scene();
        let mut renderer = RecordingRenderer::new();
        renderer.update_scene(&mut scene);

        assert_eq!(renderer.projections.len(), 1);
        assert_eq!(renderer.draws.len(), 2);
        let draw = &renderer.draws[0];
        assert_eq!(draw.mesh_id.as_deref(), Some("hex"));
        assert_eq!(draw.vertex_bytes, 6 * 2 * 4);
        assert_eq!(draw.index_count, 3 * 4);
        assert_eq!(draw.instances, 1);
        assert_eq!(renderer.draws[1].model.matrix[6], 8.0);

        // The projection is only pushed again after the camera changes.
        renderer.clear_draws();
        renderer.update_scene(&mut scene);
        assert_eq!(renderer.projections.len(), 1);
        scene.camera_mut().zoom_in(2.0);
        renderer.update_scene(&mut scene);
        assert_eq!(renderer.projections.len(), 2);
    }

    #[test]
    fn test_projection_refreshed_elsewhere() {
        let mut scene = scene();
        scene.camera_mut().projection();
        assert!(!scene.camera().is_projection_dirty());

        let mut first = RecordingRenderer::new();
        first.update_scene(&mut scene);
        assert_eq!(first.projections.len(), 1);

        let mut second = RecordingRenderer::new();
        second.update_scene(&mut scene);
        assert_eq!(second.projections, first.projections);

        first.update_scene(&mut scene);
        assert_eq!(first.projections.len(), 1);
    }

    #[test]
    fn test_culls_shapes_outside_view() {
        let mut scene = scene();
        scene.camera_mut().zoom_in(4.0);
        scene.camera_mut().offset(Vector::new(100.0, 0.0));

        let mut renderer = RecordingRenderer::new();
        renderer.update_scene(&mut scene);
        assert_eq!(renderer.draws.len(), 1);
        assert_eq!(renderer.draws[0].model.matrix[6], 8.0);
    }
}
