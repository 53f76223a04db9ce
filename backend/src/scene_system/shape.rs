use std::rc::Rc;

use crate::{data::prelude::*, error::Result, mesh::Mesh};

/// A shared mesh placed in the world by its own model matrix.
#[derive(Debug, Clone)]
pub struct Shape {
    mesh: Rc<Mesh>,
    matrix: Affine2D,
}

impl Shape {
    pub fn new(mesh: Rc<Mesh>) -> Self {
        Self::with_matrix(mesh, Affine2D::identity())
    }

    pub fn with_matrix(mesh: Rc<Mesh>, matrix: Affine2D) -> Self {
        Self { mesh, matrix }
    }

    pub fn mesh(&self) -> &Rc<Mesh> {
        &self.mesh
    }

    pub fn matrix(&self) -> &Affine2D {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut Affine2D {
        &mut self.matrix
    }

    /// World space bounding box, measured from every mapped vertex.
    pub fn measure_boundaries(&self) -> Option<Rect> {
        Rect::from_points(self.mesh.vertices().iter().map(|point| self.matrix.map(point)))
    }

    pub fn model_to_world(&self, point: Point) -> Point {
        self.matrix.map(point)
    }

    pub fn world_to_model(&self, point: Point) -> Result<Point> {
        Ok(self.matrix.invert()?.map(point))
    }

    /// Hit test a world point.
    ///
    /// `inverse` is the inverted model matrix; when absent it is computed
    /// here, which fails for a degenerate matrix.
    pub fn contains(&self, point: Point, inverse: Option<&Affine2D>) -> Result<bool> {
        let model = match inverse {
            Some(inverse) => inverse.map(point),
            None => self.world_to_model(point)?,
        };
        Ok(self.mesh.contains(model))
    }

    /// Place the mesh pivot on `start` with its control point towards `end`.
    pub fn stretch_across_line(&mut self, start: Point, end: Point) -> Result<()> {
        let pivot = self.mesh.pivot()?;
        let control = self.mesh.control()?;
        self.matrix.set_stretch_across_line(pivot, control, start, end)
    }
}

#[cfg(test)]
mod test_shape {
    use super::*;
    use crate::{error::GeometryError, mesh::rectangle};

    const EPSILON: f32 = 1e-4;

    fn unit_square() -> Rc<Mesh> {
        Rc::new(rectangle(&Rect::new(0.0, 1.0, 1.0, 0.0)).unwrap())
    }

    #[test]
    fn test_unit_square_under_identity() {
        let shape = Shape::new(unit_square());
        assert_eq!(shape.measure_boundaries(), Some(Rect::new(0.0, 1.0, 1.0, 0.0)));
        assert!(shape.contains(Point::new(0.5, 0.5), None).unwrap());
        assert!(!shape.contains(Point::new(1.5, 0.5), None).unwrap());
    }

    #[test]
    fn test_moved_shape() {
        let mut shape = Shape::new(unit_square());
        shape.matrix_mut().post_scale(2.0, 2.0, None).post_translate(10.0, 0.0);

        assert_eq!(shape.measure_boundaries(), Some(Rect::new(10.0, 2.0, 12.0, 0.0)));
        assert_eq!(shape.model_to_world(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
        assert_eq!(shape.world_to_model(Point::new(11.0, 1.0)), Ok(Point::new(0.5, 0.5)));

        let inverse = shape.matrix().invert().unwrap();
        assert!(shape.contains(Point::new(11.5, 1.5), Some(&inverse)).unwrap());
        assert!(!shape.contains(Point::new(0.5, 0.5), Some(&inverse)).unwrap());
    }

    #[test]
    fn test_shared_mesh() {
        let mesh = unit_square();
        let a = Shape::new(Rc::clone(&mesh));
        let mut b = Shape::new(Rc::clone(&mesh));
        b.matrix_mut().post_translate(5.0, 5.0);

        assert!(Rc::ptr_eq(a.mesh(), b.mesh()));
        assert_eq!(Rc::strong_count(&mesh), 3);
        assert_ne!(a.measure_boundaries(), b.measure_boundaries());
    }

    #[test]
    fn test_degenerate_matrix() {
        let mut shape = Shape::new(unit_square());
        shape.matrix_mut().set_scale(0.0, 1.0, None);
        assert!(matches!(
            shape.contains(Point::origin(), None),
            Err(GeometryError::DegenerateMatrix { .. })
        ));
    }

    #[test]
    fn test_stretch_across_line() {
        // Pivot is the top center (0.5, 1), control the bottom center (0.5, 0).
        let mut shape = Shape::new(unit_square());
        shape.stretch_across_line(Point::new(2.0, 2.0), Point::new(2.0, 6.0)).unwrap();

        let pivot = shape.model_to_world(Point::new(0.5, 1.0));
        let control = shape.model_to_world(Point::new(0.5, 0.0));
        assert!((pivot - Point::new(2.0, 2.0)).length() < EPSILON);
        assert!((control - Point::new(2.0, 6.0)).length() < EPSILON);

        let bounds = shape.measure_boundaries().unwrap();
        assert!((bounds.width() - 4.0).abs() < EPSILON);
        assert!((bounds.height() - 4.0).abs() < EPSILON);
    }
}
