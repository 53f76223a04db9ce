use super::euclid;
use super::prelude::*;
use crate::error::{GeometryError, Result};

/// How [`Affine2D::set_rect_to_rect`] fits the source into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleToFit {
    /// Scale x and y independently so `src` covers `dst` exactly.
    Fill,
    /// Uniform scale, top-left corners aligned.
    Start,
    /// Uniform scale, centers aligned.
    Center,
    /// Uniform scale, bottom-right corners aligned.
    End,
}

/// 2D affine transform stored as the top two rows of a 3x3 matrix.
///
/// ```text
/// | c1r1 c2r1 c3r1 |
/// | c1r2 c2r2 c3r2 |
/// |  0    0    1   |
/// ```
///
/// `set_concat(left, right)` maps a point as `left.map(right.map(p))`.
/// `post_*` operations apply after the current transform, `pre_*` before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2D {
    pub c1r1: f32,
    pub c2r1: f32,
    pub c3r1: f32,
    pub c1r2: f32,
    pub c2r2: f32,
    pub c3r2: f32,
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2D {
    pub const fn new(c1r1: f32, c2r1: f32, c3r1: f32, c1r2: f32, c2r2: f32, c3r2: f32) -> Self {
        Self { c1r1, c2r1, c3r1, c1r2, c2r2, c3r2 }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    pub fn scaling(sx: f32, sy: f32, pivot: Option<Point>) -> Self {
        let mut m = Self::identity();
        m.set_scale(sx, sy, pivot);
        m
    }

    pub fn rotation(radians: f32, pivot: Option<Point>) -> Self {
        let mut m = Self::identity();
        m.set_rotate(radians, pivot);
        m
    }

    pub fn rect_to_rect(src: &Rect, dst: &Rect, mode: ScaleToFit) -> Result<Self> {
        let mut m = Self::identity();
        m.set_rect_to_rect(src, dst, mode)?;
        Ok(m)
    }

    pub fn stretch_rotate_to_point(start: Point, end: Point, pivot: Point) -> Result<Self> {
        let mut m = Self::identity();
        m.set_stretch_rotate_to_point(start, end, pivot)?;
        Ok(m)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn set_identity(&mut self) {
        *self = Self::identity();
    }

    pub fn set_translate(&mut self, dx: f32, dy: f32) {
        *self = Self::translation(dx, dy);
    }

    pub fn set_scale(&mut self, sx: f32, sy: f32, pivot: Option<Point>) {
        let p = pivot.unwrap_or(Point::origin());
        *self = Self::new(sx, 0.0, p.x - sx * p.x, 0.0, sy, p.y - sy * p.y);
    }

    pub fn set_rotate(&mut self, radians: f32, pivot: Option<Point>) {
        let (sin, cos) = radians.sin_cos();
        self.set_sin_cos(sin, cos, pivot);
    }

    /// Rotation given by its sine and cosine, conjugated by the pivot translation.
    pub fn set_sin_cos(&mut self, sin: f32, cos: f32, pivot: Option<Point>) {
        let p = pivot.unwrap_or(Point::origin());
        *self = Self::new(
            cos, -sin, p.x - cos * p.x + sin * p.y,
            sin, cos, p.y - sin * p.x - cos * p.y,
        );
    }

    /// `self = left * right`.
    pub fn set_concat(&mut self, left: &Affine2D, right: &Affine2D) {
        *self = Self::new(
            left.c1r1 * right.c1r1 + left.c2r1 * right.c1r2,
            left.c1r1 * right.c2r1 + left.c2r1 * right.c2r2,
            left.c1r1 * right.c3r1 + left.c2r1 * right.c3r2 + left.c3r1,
            left.c1r2 * right.c1r1 + left.c2r2 * right.c1r2,
            left.c1r2 * right.c2r1 + left.c2r2 * right.c2r2,
            left.c1r2 * right.c3r1 + left.c2r2 * right.c3r2 + left.c3r2,
        );
    }

    /// `other` is applied after `self`.
    pub fn post_concat(&mut self, other: &Affine2D) -> &mut Self {
        let current = *self;
        self.set_concat(other, &current);
        self
    }

    /// `other` is applied before `self`.
    pub fn pre_concat(&mut self, other: &Affine2D) -> &mut Self {
        let current = *self;
        self.set_concat(&current, other);
        self
    }

    pub fn post_translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.c3r1 += dx;
        self.c3r2 += dy;
        self
    }

    pub fn pre_translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.pre_concat(&Self::translation(dx, dy))
    }

    pub fn post_scale(&mut self, sx: f32, sy: f32, pivot: Option<Point>) -> &mut Self {
        self.post_concat(&Self::scaling(sx, sy, pivot))
    }

    pub fn pre_scale(&mut self, sx: f32, sy: f32, pivot: Option<Point>) -> &mut Self {
        self.pre_concat(&Self::scaling(sx, sy, pivot))
    }

    pub fn post_rotate(&mut self, radians: f32, pivot: Option<Point>) -> &mut Self {
        self.post_concat(&Self::rotation(radians, pivot))
    }

    pub fn pre_rotate(&mut self, radians: f32, pivot: Option<Point>) -> &mut Self {
        self.pre_concat(&Self::rotation(radians, pivot))
    }

    /// Map `src` onto `dst` according to `mode`. Fails when `src` has no area.
    pub fn set_rect_to_rect(&mut self, src: &Rect, dst: &Rect, mode: ScaleToFit) -> Result<()> {
        if src.is_empty() {
            return Err(GeometryError::EmptyRect);
        }

        let mut sx = dst.width() / src.width();
        let mut sy = dst.height() / src.height();
        let (from, to) = match mode {
            ScaleToFit::Fill | ScaleToFit::Start => (src.left_top(), dst.left_top()),
            ScaleToFit::Center => (src.center(), dst.center()),
            ScaleToFit::End => (src.right_bottom(), dst.right_bottom()),
        };
        if mode != ScaleToFit::Fill {
            let s = sx.min(sy);
            sx = s;
            sy = s;
        }

        *self = Self::new(sx, 0.0, to.x - sx * from.x, 0.0, sy, to.y - sy * from.y);
        Ok(())
    }

    /// Rotation plus uniform scale about `pivot` taking `start` to `end`.
    ///
    /// Fails when either point coincides with the pivot.
    pub fn set_stretch_rotate_to_point(&mut self, start: Point, end: Point, pivot: Point) -> Result<()> {
        let from = start - pivot;
        let to = end - pivot;
        let scale = to.length() / from.length();
        let from = from.checked_normalize()?;
        let to = to.checked_normalize()?;

        let cos = from.dot(to);
        let sin = from.cross(to);
        self.set_sin_cos(sin, cos, Some(pivot));
        self.c1r1 *= scale;
        self.c2r1 *= scale;
        self.c1r2 *= scale;
        self.c2r2 *= scale;
        self.c3r1 = pivot.x - self.c1r1 * pivot.x - self.c2r1 * pivot.y;
        self.c3r2 = pivot.y - self.c1r2 * pivot.x - self.c2r2 * pivot.y;
        Ok(())
    }

    /// Place `pivot` on `start` and stretch-rotate about it so `control`
    /// lands on `end`.
    ///
    /// The rotation is solved between the shifted control point and `end`
    /// first; the shift is then applied before it.
    pub fn set_stretch_across_line(&mut self, pivot: Point, control: Point, start: Point, end: Point) -> Result<()> {
        let shift = start - pivot;
        self.set_stretch_rotate_to_point(control + shift, end, start)?;
        self.pre_translate(shift.x, shift.y);
        Ok(())
    }

    pub fn determinant(&self) -> f32 {
        self.c1r1 * self.c2r2 - self.c2r1 * self.c1r2
    }

    /// Closed form inverse.
    ///
    /// Fails with [`GeometryError::DegenerateMatrix`] when the determinant is
    /// zero (within `f32::EPSILON²`) or not finite.
    pub fn invert(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < f32::EPSILON * f32::EPSILON {
            return Err(GeometryError::DegenerateMatrix { determinant: det });
        }

        let inv = 1.0 / det;
        Ok(Self::new(
            self.c2r2 * inv,
            -self.c2r1 * inv,
            (self.c2r1 * self.c3r2 - self.c2r2 * self.c3r1) * inv,
            -self.c1r2 * inv,
            self.c1r1 * inv,
            (self.c1r2 * self.c3r1 - self.c1r1 * self.c3r2) * inv,
        ))
    }

    pub fn set_inverse(&mut self, other: &Affine2D) -> Result<()> {
        *self = other.invert()?;
        Ok(())
    }

    pub fn map(&self, point: Point) -> Point {
        Point::new(
            self.c1r1 * point.x + self.c2r1 * point.y + self.c3r1,
            self.c1r2 * point.x + self.c2r2 * point.y + self.c3r2,
        )
    }

    /// Map a direction; translation is ignored.
    pub fn map_vector(&self, vector: Vector) -> Vector {
        Vector::new(
            self.c1r1 * vector.x + self.c2r1 * vector.y,
            self.c1r2 * vector.x + self.c2r2 * vector.y,
        )
    }

    pub fn map_points(&self, points: &mut [Point]) {
        points.iter_mut().for_each(|point| *point = self.map(*point));
    }

    /// Bounding box of the four mapped corners.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|corner| self.map(corner));
        let mut out = Rect::from_point(corners[0]);
        corners[1..].iter().for_each(|corner| out.union_point(*corner));
        out
    }

    /// `[c1r1, c2r1, c3r1, c1r2, c2r2, c3r2]`
    pub fn to_array6(&self) -> [f32; 6] {
        [self.c1r1, self.c2r1, self.c3r1, self.c1r2, self.c2r2, self.c3r2]
    }

    /// Column-major 3x3, the layout of a GL `mat3` uniform.
    pub fn to_mat3(&self) -> [f32; 9] {
        [
            self.c1r1, self.c1r2, 0.0,
            self.c2r1, self.c2r2, 0.0,
            self.c3r1, self.c3r2, 1.0,
        ]
    }

    pub fn to_transform2d(&self) -> euclid::default::Transform2D<f32> {
        euclid::default::Transform2D::new(self.c1r1, self.c1r2, self.c2r1, self.c2r2, self.c3r1, self.c3r2)
    }
}

pub trait ProjectWorldToViewport {
    /// Orthographic projection of `view` into clip space.
    fn look_to(view: &Rect, near: f32, far: f32) -> Self;
}

impl ProjectWorldToViewport for ProjMatrix {
    fn look_to(view: &Rect, near: f32, far: f32) -> Self {
        let c0r0 = 2.0 / view.width();
        let c1r1 = 2.0 / view.height();
        let c2r2 = -2.0 / (far - near);
        let c3r0 = -(view.right + view.left) / view.width();
        let c3r1 = -(view.top + view.bottom) / view.height();
        let c3r2 = -(far + near) / (far - near);

        Self::new(
            c0r0, 0.0, 0.0, 0.0,
            0.0, c1r1, 0.0, 0.0,
            0.0, 0.0, c2r2, 0.0,
            c3r0, c3r1, c3r2, 1.0,
        )
    }
}
