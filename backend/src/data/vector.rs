use super::prelude::*;
use crate::error::{GeometryError, Result};

/// Vector helpers on top of euclid's `Vector2D`.
///
/// euclid already covers `length`, `square_length`, `dot` and `cross`
/// (`x1 * y2 - x2 * y1`). Its `normalize` divides by the length without a
/// check and yields NaN for a zero vector; use [`VectorExt::checked_normalize`]
/// where the input is not known to be non-zero.
pub trait VectorExt: Sized {
    /// Vector from `from` to `to`, i.e. `to - from`.
    fn from_point_to_point(from: Point, to: Point) -> Self;

    /// Rotate by +90° (counter-clockwise with Y up).
    fn rotate_left(self) -> Self;

    /// Rotate by -90° (clockwise with Y up).
    fn rotate_right(self) -> Self;

    fn checked_normalize(self) -> Result<Self>;
}

impl VectorExt for Vector {
    fn from_point_to_point(from: Point, to: Point) -> Self {
        to - from
    }

    fn rotate_left(self) -> Self {
        Vector::new(-self.y, self.x)
    }

    fn rotate_right(self) -> Self {
        Vector::new(self.y, -self.x)
    }

    fn checked_normalize(self) -> Result<Self> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(GeometryError::ZeroLengthVector);
        }
        Ok(self / length)
    }
}

/// Squared distance between two points.
pub fn distance2(a: Point, b: Point) -> f32 {
    (b - a).square_length()
}

pub fn distance(a: Point, b: Point) -> f32 {
    (b - a).length()
}

#[cfg(test)]
mod test_vector {
    use super::*;

    #[test]
    fn test_rotations() {
        let v = Vector::new(1.0, 0.0);
        assert_eq!(v.rotate_left(), Vector::new(0.0, 1.0));
        assert_eq!(v.rotate_right(), Vector::new(0.0, -1.0));
        assert_eq!(v.rotate_left().rotate_right(), v);
        assert_eq!(v.rotate_left().rotate_left(), Vector::new(-1.0, 0.0));
    }

    #[test]
    fn test_point_to_point() {
        let v = Vector::from_point_to_point(Point::new(1.0, 2.0), Point::new(4.0, 6.0));
        assert_eq!(v, Vector::new(3.0, 4.0));
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.square_length(), 25.0);
        assert_eq!(distance(Point::new(1.0, 2.0), Point::new(4.0, 6.0)), 5.0);
        assert_eq!(distance2(Point::new(1.0, 2.0), Point::new(4.0, 6.0)), 25.0);
    }

    #[test]
    fn test_dot_and_cross() {
        let a = Vector::new(2.0, 3.0);
        let b = Vector::new(4.0, -1.0);
        assert_eq!(a.dot(b), 5.0);
        assert_eq!(a.cross(b), 2.0 * -1.0 - 4.0 * 3.0);
    }

    #[test]
    fn test_checked_normalize() {
        let n = Vector::new(3.0, 4.0).checked_normalize().unwrap();
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
        assert_eq!(Vector::zero().checked_normalize(), Err(GeometryError::ZeroLengthVector));
    }
}
