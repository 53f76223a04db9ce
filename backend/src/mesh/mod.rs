//! Packed meshes and the generators that build them.

pub mod generator;
pub mod miter;
pub mod spec;
pub mod spray;

use crate::{
    data::buffer::StructCursor,
    data::prelude::*,
    error::{GeometryError, Result},
};

pub use generator::{rectangle, regular_polygon, star};
pub use miter::{measure_miter, measure_outline_miters, measure_polyline_miters, stroke_polygon, StrokeOptions};
pub use spec::{MeshSpec, MeshType};
pub use spray::spray;

/// How a mesh answers containment queries.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshKind {
    /// The whole vertex buffer is one closed outline.
    Polygon,
    /// Disjoint outlines, each an index walk over the shared vertices.
    MultiPolygon { polygons: Vec<Vec<u16>> },
    /// Back-to-back copies of one outline, `vertices_per_instance` each.
    Instanced { vertices_per_instance: usize },
}

/// Geometry built once and shared read-only between shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    id: Option<String>,
    vertices: VertexBuffer,
    indices: Option<IndexTupleBuffer>,
    bounds: Option<Rect>,
    kind: MeshKind,
}

impl Mesh {
    pub fn polygon(vertices: VertexBuffer, indices: Option<IndexTupleBuffer>) -> Result<Self> {
        Self::build(vertices, indices, MeshKind::Polygon)
    }

    pub fn multi_polygon(
        vertices: VertexBuffer,
        indices: Option<IndexTupleBuffer>,
        polygons: Vec<Vec<u16>>,
    ) -> Result<Self> {
        Self::build(vertices, indices, MeshKind::MultiPolygon { polygons })
    }

    pub fn instanced(
        vertices: VertexBuffer,
        indices: Option<IndexTupleBuffer>,
        vertices_per_instance: usize,
    ) -> Result<Self> {
        Self::build(vertices, indices, MeshKind::Instanced { vertices_per_instance })
    }

    fn build(mut vertices: VertexBuffer, mut indices: Option<IndexTupleBuffer>, kind: MeshKind) -> Result<Self> {
        let count = vertices.len();
        if count > usize::from(u16::MAX) + 1 {
            return Err(GeometryError::IndexOverflow(count));
        }

        let out_of_range = |index: u16| GeometryError::IndexOutOfRange { index: usize::from(index), vertices: count };
        if let Some(max) = indices.as_ref().and_then(IndexTupleBuffer::max_index) {
            if usize::from(max) >= count {
                return Err(out_of_range(max));
            }
        }

        match &kind {
            MeshKind::Polygon => {}
            MeshKind::MultiPolygon { polygons } => {
                if let Some(&index) = polygons.iter().flatten().find(|&&i| usize::from(i) >= count) {
                    return Err(out_of_range(index));
                }
            }
            MeshKind::Instanced { vertices_per_instance } => {
                if *vertices_per_instance == 0 || count % vertices_per_instance != 0 {
                    return Err(GeometryError::MalformedSpec(format!(
                        "{count} vertices do not split into instances of {vertices_per_instance}"
                    )));
                }
            }
        }

        vertices.move_to_first();
        if let Some(indices) = indices.as_mut() {
            indices.move_to_first();
        }

        let bounds = vertices.measure_boundaries(0, count);
        Ok(Self { id: None, vertices, indices, bounds, kind })
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the measured bounds with caller supplied ones.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&IndexTupleBuffer> {
        self.indices.as_ref()
    }

    /// `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn kind(&self) -> &MeshKind {
        &self.kind
    }

    pub fn instance_count(&self) -> usize {
        match self.kind {
            MeshKind::Instanced { vertices_per_instance } => self.vertices.len() / vertices_per_instance,
            _ => 1,
        }
    }

    /// Hit test in model space.
    pub fn contains(&self, point: Point) -> bool {
        if !self.bounds.is_some_and(|bounds| bounds.contains(point)) {
            return false;
        }

        match &self.kind {
            MeshKind::Polygon => self.vertices.contains(point, 0, self.vertices.len()),
            MeshKind::MultiPolygon { polygons } => polygons
                .iter()
                .any(|polygon| self.vertices.indexed_contains(point, polygon)),
            MeshKind::Instanced { vertices_per_instance } => (0..self.vertices.len())
                .step_by(*vertices_per_instance)
                .any(|offset| self.vertices.contains(point, offset, *vertices_per_instance)),
        }
    }

    /// Top center of the bounds; the end placed on a line's start.
    pub fn pivot(&self) -> Result<Point> {
        let bounds = self.bounds.ok_or(GeometryError::EmptyMesh)?;
        Ok(Point::new(bounds.center().x, bounds.top))
    }

    /// Bottom center of the bounds; the end stretched towards a line's end.
    pub fn control(&self) -> Result<Point> {
        let bounds = self.bounds.ok_or(GeometryError::EmptyMesh)?;
        Ok(Point::new(bounds.center().x, bounds.bottom))
    }
}
