use std::f32::consts::{PI, TAU};

use super::Mesh;
use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
};

/// Largest vertex count addressable by `u16` indices.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

pub(crate) fn ensure_addressable(vertex_count: usize) -> Result<()> {
    if vertex_count > MAX_VERTICES {
        return Err(GeometryError::IndexOverflow(vertex_count));
    }
    Ok(())
}

/// Point at `angle` on a circle of `radius`, measured counter-clockwise from +Y.
pub(crate) fn on_circle(angle: f32, radius: f32) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(-sin * radius, cos * radius)
}

/// Triangle fan `(0, i, i + 1)` over a convex outline of `count` vertices.
fn fan_indices(count: usize) -> IndexTupleBuffer {
    let mut indices = IndexTupleBuffer::create(count.saturating_sub(2));
    for i in 1..count.saturating_sub(1) {
        indices.put(0, i as u16, (i + 1) as u16);
    }
    indices
}

/// `sides` vertices on the unit circle, counter-clockwise and fanned from
/// vertex 0.
///
/// Angle 0 points straight up, so the polygon is pointy topped; a flat
/// topped polygon is turned by half a sector.
pub fn regular_polygon(sides: usize, has_flat_top: bool) -> Result<Mesh> {
    if sides < 3 {
        return Err(GeometryError::TooFewSides(sides));
    }
    ensure_addressable(sides)?;

    let step = TAU / sides as f32;
    let start = if has_flat_top { step / 2.0 } else { 0.0 };
    let mut vertices = VertexBuffer::create(sides);
    for i in 0..sides {
        vertices.put(on_circle(start + step * i as f32, 1.0));
    }

    log::debug!("regular polygon: {} sides, flat top {}", sides, has_flat_top);
    Mesh::polygon(vertices, Some(fan_indices(sides)))
}

/// Star outline of `points` spikes: `2 * points` vertices alternating between
/// radius 1 (even) and radius `ratio` (odd), half a sector apart.
///
/// The inner polygon is fanned from vertex 1 over the odd vertices, giving
/// `points - 2` triangles; each spike is the triangle of an outer vertex and
/// its two inner neighbours.
pub fn star(points: usize, ratio: f32) -> Result<Mesh> {
    if points < 3 {
        return Err(GeometryError::TooFewSides(points));
    }
    if !(ratio > 0.0 && ratio.is_finite()) {
        return Err(GeometryError::InvalidOptions(format!("star ratio must be positive, got {ratio}")));
    }

    let count = points * 2;
    ensure_addressable(count)?;

    let step = PI / points as f32;
    let mut vertices = VertexBuffer::create(count);
    for i in 0..count {
        let radius = if i % 2 == 0 { 1.0 } else { ratio };
        vertices.put(on_circle(step * i as f32, radius));
    }

    let mut indices = IndexTupleBuffer::create(points - 2 + points);
    let (first, mut second, mut third) = (1, 3, 5);
    for _ in 0..points - 2 {
        indices.put(first, second as u16, third as u16);
        second += 2;
        third += 2;
    }
    let (mut first, mut second, mut third) = (count - 1, 0, 1);
    for _ in 0..points {
        indices.put((first % count) as u16, second as u16, third as u16);
        first += 2;
        second += 2;
        third += 2;
    }

    log::debug!("star: {} points, ratio {}", points, ratio);
    Mesh::polygon(vertices, Some(indices))
}

/// The four corners of `rect`, counter-clockwise from the top-left.
pub fn rectangle(rect: &Rect) -> Result<Mesh> {
    let vertices = VertexBuffer::from_points(&rect.corners());
    Mesh::polygon(vertices, Some(fan_indices(4)))
}
