use super::euclid;
use super::prelude::*;

/// Axis aligned rectangle in a Y-up space.
///
/// Normalized rectangles hold `left <= right` and `bottom <= top`. Points on
/// an edge are contained.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn from_center_size(center: Point, width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(center.x - hw, center.y + hh, center.x + hw, center.y - hh)
    }

    /// Degenerate rectangle covering a single point.
    pub fn from_point(point: Point) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Bounding box of `points`, or `None` for an empty set.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let mut rect = Self::from_point(points.next()?);
        points.for_each(|point| rect.union_point(point));
        Some(rect)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn left_top(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn left_bottom(&self) -> Point {
        Point::new(self.left, self.bottom)
    }

    pub fn right_bottom(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn right_top(&self) -> Point {
        Point::new(self.right, self.top)
    }

    /// Top-left, bottom-left, bottom-right, top-right: counter-clockwise.
    pub fn corners(&self) -> [Point; 4] {
        [self.left_top(), self.left_bottom(), self.right_bottom(), self.right_top()]
    }

    /// Swap edges so that `left <= right` and `bottom <= top`.
    pub fn normalize(&mut self) {
        if self.left > self.right {
            std::mem::swap(&mut self.left, &mut self.right);
        }
        if self.bottom > self.top {
            std::mem::swap(&mut self.bottom, &mut self.top);
        }
    }

    pub fn union_point(&mut self, point: Point) {
        self.left = self.left.min(point.x);
        self.right = self.right.max(point.x);
        self.bottom = self.bottom.min(point.y);
        self.top = self.top.max(point.y);
    }

    pub fn union_rect(&mut self, other: &Rect) {
        self.left = self.left.min(other.left);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.min(other.bottom);
        self.top = self.top.max(other.top);
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.bottom >= self.bottom
            && other.top <= self.top
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.bottom <= other.top
            && other.bottom <= self.top
    }

    pub fn offset(&mut self, vector: Vector) {
        self.left += vector.x;
        self.right += vector.x;
        self.top += vector.y;
        self.bottom += vector.y;
    }

    /// Scale width by `sx` and height by `sy`, keeping the center fixed.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.scale_about(sx, sy, self.center());
    }

    /// Scale edges relative to `pivot`; `Point::origin()` scales about the origin.
    pub fn scale_about(&mut self, sx: f32, sy: f32, pivot: Point) {
        self.left = pivot.x + (self.left - pivot.x) * sx;
        self.right = pivot.x + (self.right - pivot.x) * sx;
        self.top = pivot.y + (self.top - pivot.y) * sy;
        self.bottom = pivot.y + (self.bottom - pivot.y) * sy;
    }

    /// Uniform scale about the center.
    pub fn stretch(&mut self, ratio: f32) {
        self.scale(ratio, ratio);
    }

    pub fn to_box2d(&self) -> euclid::default::Box2D<f32> {
        euclid::default::Box2D::new(self.left_bottom(), self.right_top())
    }
}

impl From<euclid::default::Box2D<f32>> for Rect {
    fn from(b: euclid::default::Box2D<f32>) -> Self {
        Self::new(b.min.x, b.max.y, b.max.x, b.min.y)
    }
}
