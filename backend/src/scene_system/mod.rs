//! Shapes placed in the world, the camera looking at them and the gesture
//! tools that move the camera.

pub mod camera;
pub mod controller;
pub mod shape;
pub mod surface;

use std::{collections::HashMap, rc::Rc};

use json::JsonValue;

use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
    mesh::{
        spec::{field, point, read_f32, read_point, read_rect, read_str},
        Mesh, MeshSpec,
    },
};

pub use camera::{Camera, CameraOptions, ZoomResult};
pub use controller::{Controller, InputStatus, PanTool, PinchTool, PointerEvent, ScrollZoomTool, ToolOptions};
pub use shape::Shape;
pub use surface::Surface;

/// Ordered shapes, drawn first to last, and the camera over them.
#[derive(Debug)]
pub struct Scene {
    shapes: Vec<Shape>,
    /// Inverted model matrices for hit testing; `None` for degenerate ones.
    inverses: Vec<DirtyFlag<Option<Affine2D>>>,
    camera: Camera,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self { shapes: Vec::new(), inverses: Vec::new(), camera }
    }

    /// Append on top of the existing shapes and return the new index.
    pub fn push(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.inverses.push(DirtyFlag::dirty(None));
        self.shapes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Mutable access; the cached inverse is rebuilt on the next hit test.
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.inverses.get_mut(index)?.set_dirty();
        self.shapes.get_mut(index)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Index of the topmost shape containing the world `point`.
    pub fn hit_test(&mut self, point: Point) -> Option<usize> {
        (0..self.shapes.len()).rev().find(|&i| {
            let shape = &self.shapes[i];
            let inverse = self.inverses[i].refresh_with(|| shape.matrix().invert().ok());
            match inverse {
                Some(inverse) => shape.mesh().contains(inverse.map(point)),
                None => false,
            }
        })
    }

    /// World space bounding box of every shape.
    pub fn measure_boundaries(&self) -> Option<Rect> {
        let mut boxes = self.shapes.iter().filter_map(Shape::measure_boundaries);
        let mut bounds = boxes.next()?;
        boxes.for_each(|rect| bounds.union_rect(&rect));
        Some(bounds)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let value = json::parse(text).map_err(|e| GeometryError::MalformedSpec(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Build a scene from its JSON description.
    ///
    /// Each shape entry is a mesh specification plus optional `translate`,
    /// `scale`, `rotate` or `line` placement. An entry with `"mesh": "<id>"`
    /// reuses the mesh built earlier under that id.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let target = read_rect(value, "target")?
            .ok_or_else(|| GeometryError::MalformedSpec("scene needs a `target` rectangle".to_string()))?;

        let mut options = CameraOptions::default();
        if let Some(camera) = field(value, "camera") {
            options.min_zoom = read_f32(camera, "minZoom")?.unwrap_or(options.min_zoom);
            options.max_zoom = read_f32(camera, "maxZoom")?.unwrap_or(options.max_zoom);
        }

        let mut camera = Camera::new(target, options)?;
        if let Some(viewport) = field(value, "viewport") {
            let size = point(viewport)
                .ok_or_else(|| GeometryError::MalformedSpec("`viewport` must be a [width, height] pair".to_string()))?;
            camera.set_viewport(size.x, size.y)?;
        }

        let mut scene = Self::new(camera);
        let mut meshes: HashMap<String, Rc<Mesh>> = HashMap::new();
        let entries = match field(value, "shapes") {
            Some(shapes) if shapes.is_array() => shapes.members().collect(),
            Some(_) => return Err(GeometryError::MalformedSpec("`shapes` must be an array".to_string())),
            None => Vec::new(),
        };

        for entry in entries {
            let mesh = match read_str(entry, "mesh")? {
                Some(id) => meshes
                    .get(id)
                    .cloned()
                    .ok_or_else(|| GeometryError::MalformedSpec(format!("no mesh with id `{id}`")))?,
                None => {
                    let mesh = Rc::new(MeshSpec::from_json(entry)?.build()?);
                    if let Some(id) = mesh.id() {
                        meshes.insert(id.to_string(), Rc::clone(&mesh));
                    }
                    mesh
                }
            };

            let mut shape = Shape::new(mesh);
            place(&mut shape, entry)?;
            scene.push(shape);
        }

        log::info!("scene loaded: {} shapes, {} distinct meshes", scene.len(), meshes.len());
        Ok(scene)
    }
}

fn place(shape: &mut Shape, entry: &JsonValue) -> Result<()> {
    let translate = read_point(entry, "translate")?;
    let scale = read_f32(entry, "scale")?;
    let rotate = read_f32(entry, "rotate")?;

    if let Some(line) = field(entry, "line") {
        let ends: Option<Vec<Point>> = line.members().map(point).collect();
        let &[start, end] = ends.as_deref().unwrap_or_default() else {
            return Err(GeometryError::MalformedSpec("`line` must be two [x, y] points".to_string()));
        };
        if translate.is_some() || scale.is_some() || rotate.is_some() {
            log::warn!("shape placed by `line` ignores translate, scale and rotate");
        }
        return shape.stretch_across_line(start, end);
    }

    let matrix = shape.matrix_mut();
    if let Some(s) = scale {
        matrix.post_scale(s, s, None);
    }
    if let Some(radians) = rotate {
        matrix.post_rotate(radians, None);
    }
    if let Some(offset) = translate {
        matrix.post_translate(offset.x, offset.y);
    }
    Ok(())
}
