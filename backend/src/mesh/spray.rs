use std::f32::consts::TAU;

use super::{
    generator::{ensure_addressable, on_circle},
    Mesh,
};
use crate::{
    data::prelude::*,
    error::{GeometryError, Result},
};

/// Copies of `instance` laid out in concentric rings around the origin.
///
/// Ring `k` holds `inner_ring * 2^k` copies. Each copy is stretched across
/// the radial segment from radius `k / rings` to `(k + 1) / rings`, its pivot
/// on the inner end and its control point on the outer one, so the whole
/// spray fills the unit disc.
pub fn spray(instance: &Mesh, inner_ring: usize, rings: usize) -> Result<Mesh> {
    if inner_ring == 0 || rings == 0 {
        return Err(GeometryError::InvalidOptions(format!(
            "spray needs at least one ring and one instance, got {inner_ring} x {rings}"
        )));
    }
    let per_instance = instance.vertices().len();
    if per_instance == 0 {
        return Err(GeometryError::EmptyMesh);
    }

    let total = (0..rings).try_fold(0usize, |total, k| {
        inner_ring
            .checked_shl(k as u32)
            .filter(|&n| n >> k == inner_ring)
            .and_then(|n| total.checked_add(n))
    });
    let total = total.ok_or(GeometryError::IndexOverflow(usize::MAX))?;
    ensure_addressable(per_instance.saturating_mul(total))?;

    let pivot = instance.pivot()?;
    let control = instance.control()?;
    let tuples = instance.indices().map_or(&[][..], |indices| indices.tuples());

    let mut vertices = VertexBuffer::create(per_instance * total);
    let mut indices = instance.indices().map(|_| IndexTupleBuffer::create(tuples.len() * total));
    let mut placement = Affine2D::identity();
    let mut copy = 0;

    for k in 0..rings {
        let count = inner_ring << k;
        let inner = k as f32 / rings as f32;
        let outer = (k + 1) as f32 / rings as f32;

        for j in 0..count {
            let angle = TAU * j as f32 / count as f32;
            placement.set_stretch_across_line(pivot, control, on_circle(angle, inner), on_circle(angle, outer))?;

            let base = copy * per_instance;
            for point in instance.vertices().iter() {
                vertices.put(point);
            }
            vertices.transform(&placement, base, per_instance);

            if let Some(indices) = indices.as_mut() {
                for &tuple in tuples {
                    indices.put_tuple(tuple);
                }
                indices.offset_indices(base, copy * tuples.len(), tuples.len())?;
            }
            copy += 1;
        }
    }

    log::debug!("spray: {} copies of {} vertices over {} rings", total, per_instance, rings);
    Mesh::instanced(vertices, indices, per_instance)
}

#[cfg(test)]
mod test_spray {
    use super::*;
    use crate::mesh::generator::{rectangle, regular_polygon};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    fn blade() -> Mesh {
        rectangle(&Rect::new(-0.1, 0.0, 0.1, -1.0)).unwrap()
    }

    #[test]
    fn test_instance_counts() {
        let mesh = spray(&blade(), 3, 2).unwrap();
        assert_eq!(mesh.instance_count(), 9);
        assert_eq!(mesh.vertices().len(), 36);
        assert_eq!(mesh.indices().unwrap().len(), 18);

        let mesh = spray(&regular_polygon(6, true).unwrap(), 4, 3).unwrap();
        assert_eq!(mesh.instance_count(), 4 * 7);
    }

    #[test]
    fn test_first_copy_spans_inner_ring() {
        let mesh = spray(&blade(), 3, 2).unwrap();
        // Pivot (0, 0) lands on the origin, control (0, -1) on (0, 0.5).
        assert!(approx_eq(mesh.vertices().get_at(0).unwrap(), Point::new(0.05, 0.0)));
        assert!(approx_eq(mesh.vertices().get_at(1).unwrap(), Point::new(0.05, 0.5)));
        assert!(mesh.contains(Point::new(0.0, 0.25)));
    }

    #[test]
    fn test_outer_ring_copies() {
        let mesh = spray(&blade(), 2, 2).unwrap();
        // Ring 1 holds four copies, the first one pointing up from radius 0.5.
        let first_outer = 2 * 4;
        let bounds = mesh.vertices().measure_boundaries(first_outer, 4).unwrap();
        assert!((bounds.bottom - 0.5).abs() < EPSILON);
        assert!((bounds.top - 1.0).abs() < EPSILON);
        assert!(mesh.contains(Point::new(0.0, 0.75)));
        assert!(!mesh.contains(Point::new(0.3, 0.3)));
    }

    #[test]
    fn test_indices_shifted_per_copy() {
        let mesh = spray(&blade(), 1, 2).unwrap();
        let tuples = mesh.indices().unwrap().tuples();
        assert_eq!(&tuples[..2], &[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(&tuples[2..4], &[[4, 5, 6], [4, 6, 7]]);
    }

    #[test]
    fn test_invalid_spray() {
        assert!(spray(&blade(), 0, 3).is_err());
        assert!(spray(&blade(), 3, 0).is_err());
        let empty = Mesh::polygon(VertexBuffer::create(0), None).unwrap();
        assert_eq!(spray(&empty, 4, 3).err(), Some(GeometryError::EmptyMesh));
        assert!(matches!(spray(&blade(), 4, 20), Err(GeometryError::IndexOverflow(_))));
    }
}
