use super::{generator::ensure_addressable, Mesh};
use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeOptions {
    /// Half the stroke width, measured from the outline to each side.
    pub line_width: f32,
    /// Longest allowed miter, as a multiple of `line_width`.
    pub miter_limit: f32,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self { line_width: 0.05, miter_limit: 4.0 }
    }
}

impl StrokeOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.line_width > 0.0 && self.line_width.is_finite()) {
            return Err(GeometryError::InvalidOptions(format!("line width must be positive, got {}", self.line_width)));
        }
        if self.miter_limit.is_nan() || self.miter_limit < 1.0 {
            return Err(GeometryError::InvalidOptions(format!("miter limit must be at least 1, got {}", self.miter_limit)));
        }
        Ok(())
    }

    fn max_miter_length(&self) -> f32 {
        self.line_width * self.miter_limit
    }
}

/// Offset of the joint between `line1` and `line2` (edge directions).
///
/// The edges' right hand normals are averaged into the miter direction and
/// its length is `line_width / dot(miter, n2)`, clamped to the miter limit.
/// For a counter-clockwise outline the result points outwards.
pub fn measure_miter(line1: Vector, line2: Vector, options: &StrokeOptions) -> Result<Vector> {
    let n1 = line1.rotate_right().checked_normalize()?;
    let n2 = line2.rotate_right().checked_normalize()?;

    let Ok(miter) = (n1 + n2).checked_normalize() else {
        // The path doubles back on itself; there is no joint to bisect.
        return Ok(line1.normalize() * options.max_miter_length());
    };

    let length = (options.line_width / miter.dot(n2)).min(options.max_miter_length());
    Ok(miter * length)
}

/// One miter per vertex of `points`.
///
/// A closed outline wraps around so the last edge joins the first. An open
/// polyline uses the plain edge normal at its two ends.
pub fn measure_polyline_miters(points: &[Point], closed: bool, options: &StrokeOptions) -> Result<Vec<Vector>> {
    let n = points.len();
    if n < 2 {
        return Err(GeometryError::TooFewSides(n));
    }

    (0..n)
        .map(|i| {
            let previous = if i > 0 { Some(i - 1) } else { closed.then_some(n - 1) };
            let next = if i + 1 < n { Some(i + 1) } else { closed.then_some(0) };

            match (previous, next) {
                (Some(p), Some(q)) => measure_miter(points[i] - points[p], points[q] - points[i], options),
                (None, Some(q)) => Ok((points[q] - points[i]).rotate_right().checked_normalize()? * options.line_width),
                (Some(p), None) => Ok((points[i] - points[p]).rotate_right().checked_normalize()? * options.line_width),
                (None, None) => unreachable!("polyline with at least two points has a neighbour"),
            }
        })
        .collect()
}

/// Cyclic miters around the closed outline stored in a vertex subrange.
pub fn measure_outline_miters(
    vertices: &VertexBuffer,
    offset: usize,
    count: usize,
    options: &StrokeOptions,
) -> Result<Vec<Vector>> {
    let outline: Vec<Point> = vertices.iter().skip(offset).take(count).collect();
    measure_polyline_miters(&outline, true, options)
}

/// Band of width `2 * line_width` centered on a polyline.
///
/// Each point contributes an outer (`+miter`) and an inner (`-miter`)
/// vertex; each edge becomes a quad of two triangles that is also one hit
/// polygon of the resulting multi-polygon mesh.
pub fn stroke_polyline(points: &[Point], closed: bool, options: &StrokeOptions) -> Result<Mesh> {
    options.validate()?;
    let miters = measure_polyline_miters(points, closed, options)?;

    let n = points.len();
    ensure_addressable(n * 2)?;
    let edges = if closed { n } else { n - 1 };

    let mut vertices = VertexBuffer::create(n * 2);
    for (point, miter) in points.iter().zip(&miters) {
        vertices.put(*point + *miter);
        vertices.put(*point - *miter);
    }

    let mut indices = IndexTupleBuffer::create(edges * 2);
    let mut polygons = Vec::with_capacity(edges);
    for i in 0..edges {
        let j = (i + 1) % n;
        let (outer_i, inner_i) = ((2 * i) as u16, (2 * i + 1) as u16);
        let (outer_j, inner_j) = ((2 * j) as u16, (2 * j + 1) as u16);
        indices.put(outer_i, inner_i, outer_j);
        indices.put(outer_j, inner_i, inner_j);
        polygons.push(vec![outer_i, inner_i, inner_j, outer_j]);
    }

    log::debug!("stroke: {} points, {} edges, closed {}", n, edges, closed);
    Mesh::multi_polygon(vertices, Some(indices), polygons)
}

/// Stroke the outline of a polygon mesh.
pub fn stroke_polygon(outline: &Mesh, options: &StrokeOptions) -> Result<Mesh> {
    let points: Vec<Point> = outline.vertices().iter().collect();
    stroke_polyline(&points, true, options)
}
