//! Flat numeric buffers read as sequences of fixed size structs.
//!
//! A [`VertexBuffer`] holds `x, y` pairs; an [`IndexTupleBuffer`] holds one
//! `u16` triple per triangle. Both keep a cursor used by generators to fill
//! them sequentially: `put` writes at the cursor and advances, and advancing
//! past the last struct invalidates the cursor, which is how fill loops learn
//! that the buffer is full. Capacity never changes after creation.

use std::ops::Range;

use super::prelude::*;
use crate::error::{GeometryError, Result};

pub const VERTEX_STRIDE: usize = 2;
pub const INDEX_TUPLE_STRIDE: usize = 3;

/// Cursor protocol over a fixed number of structs.
///
/// Out of range moves report `false` and leave the cursor invalid.
pub trait StructCursor {
    /// Number of structs; fixed at creation.
    fn capacity(&self) -> usize;

    fn position(&self) -> Option<usize>;

    fn set_position(&mut self, position: Option<usize>);

    fn has_valid_position(&self) -> bool {
        self.position().is_some()
    }

    fn move_to_position(&mut self, index: usize) -> bool {
        let valid = index < self.capacity();
        self.set_position(valid.then_some(index));
        valid
    }

    fn move_to_first(&mut self) -> bool {
        self.move_to_position(0)
    }

    fn move_to_next(&mut self) -> bool {
        match self.position() {
            Some(position) => self.move_to_position(position + 1),
            None => false,
        }
    }
}

fn clip_range(capacity: usize, offset: usize, count: usize) -> Range<usize> {
    let start = offset.min(capacity);
    start..offset.saturating_add(count).min(capacity)
}

fn crosses(point: Point, a: [f32; 2], b: [f32; 2]) -> bool {
    let ([x1, y1], [x2, y2]) = (a, b);
    (y1 > point.y) != (y2 > point.y) && point.x < (x2 - x1) * (point.y - y1) / (y2 - y1) + x1
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    data: Vec<f32>,
    position: Option<usize>,
}

impl StructCursor for VertexBuffer {
    fn capacity(&self) -> usize {
        self.data.len() / VERTEX_STRIDE
    }

    fn position(&self) -> Option<usize> {
        self.position
    }

    fn set_position(&mut self, position: Option<usize>) {
        self.position = position;
    }
}

impl VertexBuffer {
    /// Zero filled buffer for `capacity` vertices, cursor on the first one.
    pub fn create(capacity: usize) -> Self {
        let mut buffer = Self { data: vec![0.0; capacity * VERTEX_STRIDE], position: None };
        buffer.move_to_first();
        buffer
    }

    /// Take ownership of packed `x, y` data without copying it.
    pub fn from_raw(data: Vec<f32>) -> Result<Self> {
        if data.len() % VERTEX_STRIDE != 0 {
            return Err(GeometryError::MalformedSpec(format!(
                "vertex data holds {} numbers, expected x/y pairs",
                data.len()
            )));
        }

        let mut buffer = Self { data, position: None };
        buffer.move_to_first();
        Ok(buffer)
    }

    pub fn from_points(points: &[Point]) -> Self {
        let mut buffer = Self::create(points.len());
        points.iter().for_each(|point| {
            buffer.put(*point);
        });
        buffer
    }

    pub fn len(&self) -> usize {
        self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write at the cursor and advance. Returns `false` if the cursor was invalid.
    pub fn put(&mut self, point: Point) -> bool {
        self.put_xy(point.x, point.y)
    }

    pub fn put_xy(&mut self, x: f32, y: f32) -> bool {
        let Some(position) = self.position else {
            return false;
        };

        let i = position * VERTEX_STRIDE;
        self.data[i] = x;
        self.data[i + 1] = y;
        self.move_to_next();
        true
    }

    /// Vertex under the cursor.
    pub fn get(&self) -> Option<Point> {
        self.position.and_then(|position| self.get_at(position))
    }

    pub fn get_at(&self, index: usize) -> Option<Point> {
        self.points().get(index).map(|&[x, y]| Point::new(x, y))
    }

    pub fn set_at(&mut self, index: usize, point: Point) -> bool {
        let i = index * VERTEX_STRIDE;
        if index >= self.capacity() {
            return false;
        }

        self.data[i] = point.x;
        self.data[i + 1] = point.y;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points().iter().map(|&[x, y]| Point::new(x, y))
    }

    /// The buffer viewed as `[x, y]` structs.
    pub fn points(&self) -> &[[f32; 2]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Packed little-endian bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Ray casting point-in-polygon over `count` vertices from `offset`.
    ///
    /// The vertices form a closed polygon; the edge from the last vertex back
    /// to the first is implicit.
    pub fn contains(&self, point: Point, offset: usize, count: usize) -> bool {
        let polygon = &self.points()[clip_range(self.capacity(), offset, count)];
        let Some(&last) = polygon.last() else {
            return false;
        };

        let mut inside = false;
        let mut previous = last;
        for &vertex in polygon {
            if crosses(point, previous, vertex) {
                inside = !inside;
            }
            previous = vertex;
        }
        inside
    }

    /// Same test as [`VertexBuffer::contains`] walking `indices` instead of
    /// sequential order. Indices outside the buffer are skipped.
    pub fn indexed_contains(&self, point: Point, indices: &[u16]) -> bool {
        let points = self.points();
        let mut polygon = indices.iter().filter_map(|&i| points.get(usize::from(i)).copied());
        let Some(first) = polygon.next() else {
            return false;
        };

        let mut inside = false;
        let mut previous = first;
        for vertex in polygon.chain(std::iter::once(first)) {
            if crosses(point, previous, vertex) {
                inside = !inside;
            }
            previous = vertex;
        }
        inside
    }

    /// Map a vertex subrange through `matrix` in place.
    pub fn transform(&mut self, matrix: &Affine2D, offset: usize, count: usize) {
        let range = clip_range(self.capacity(), offset, count);
        let points: &mut [[f32; 2]] = bytemuck::cast_slice_mut(&mut self.data);
        points[range].iter_mut().for_each(|vertex| {
            let mapped = matrix.map(Point::new(vertex[0], vertex[1]));
            *vertex = [mapped.x, mapped.y];
        });
    }

    pub fn offset(&mut self, vector: Vector, offset: usize, count: usize) {
        let range = clip_range(self.capacity(), offset, count);
        let points: &mut [[f32; 2]] = bytemuck::cast_slice_mut(&mut self.data);
        points[range].iter_mut().for_each(|vertex| {
            vertex[0] += vector.x;
            vertex[1] += vector.y;
        });
    }

    /// Bounding box of a vertex subrange; `None` when the range is empty.
    pub fn measure_boundaries(&self, offset: usize, count: usize) -> Option<Rect> {
        let range = clip_range(self.capacity(), offset, count);
        Rect::from_points(self.points()[range].iter().map(|&[x, y]| Point::new(x, y)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexTupleBuffer {
    data: Vec<u16>,
    position: Option<usize>,
}

impl StructCursor for IndexTupleBuffer {
    fn capacity(&self) -> usize {
        self.data.len() / INDEX_TUPLE_STRIDE
    }

    fn position(&self) -> Option<usize> {
        self.position
    }

    fn set_position(&mut self, position: Option<usize>) {
        self.position = position;
    }
}

impl IndexTupleBuffer {
    pub fn create(capacity: usize) -> Self {
        let mut buffer = Self { data: vec![0; capacity * INDEX_TUPLE_STRIDE], position: None };
        buffer.move_to_first();
        buffer
    }

    pub fn from_raw(data: Vec<u16>) -> Result<Self> {
        if data.len() % INDEX_TUPLE_STRIDE != 0 {
            return Err(GeometryError::MalformedSpec(format!(
                "triangle indices hold {} numbers, expected triples",
                data.len()
            )));
        }

        let mut buffer = Self { data, position: None };
        buffer.move_to_first();
        Ok(buffer)
    }

    pub fn len(&self) -> usize {
        self.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn put(&mut self, first: u16, second: u16, third: u16) -> bool {
        let Some(position) = self.position else {
            return false;
        };

        let i = position * INDEX_TUPLE_STRIDE;
        self.data[i..i + INDEX_TUPLE_STRIDE].copy_from_slice(&[first, second, third]);
        self.move_to_next();
        true
    }

    pub fn put_tuple(&mut self, tuple: [u16; 3]) -> bool {
        self.put(tuple[0], tuple[1], tuple[2])
    }

    pub fn get(&self) -> Option<[u16; 3]> {
        self.position.and_then(|position| self.get_at(position))
    }

    pub fn get_at(&self, index: usize) -> Option<[u16; 3]> {
        self.tuples().get(index).copied()
    }

    pub fn tuples(&self) -> &[[u16; 3]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn max_index(&self) -> Option<u16> {
        self.data.iter().copied().max()
    }

    /// Add `delta` to every index of a tuple subrange.
    pub fn offset_indices(&mut self, delta: usize, offset: usize, count: usize) -> Result<()> {
        let range = clip_range(self.capacity(), offset, count);
        let indices = &mut self.data[range.start * INDEX_TUPLE_STRIDE..range.end * INDEX_TUPLE_STRIDE];
        // Nothing is shifted unless every index fits.
        if let Some(&largest) = indices.iter().max() {
            let shifted = usize::from(largest) + delta;
            if shifted > usize::from(u16::MAX) {
                return Err(GeometryError::IndexOverflow(shifted + 1));
            }
        }
        for index in indices {
            *index += delta as u16;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_buffer {
    use super::*;

    fn unit_square() -> VertexBuffer {
        VertexBuffer::from_raw(vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn test_cursor_fill_loop() {
        let mut buffer = VertexBuffer::create(3);
        assert_eq!(buffer.position(), Some(0));

        let mut written = 0;
        while buffer.put_xy(written as f32, 0.0) {
            written += 1;
        }
        assert_eq!(written, 3);
        assert!(!buffer.has_valid_position());
        assert_eq!(buffer.get(), None);
        assert!(!buffer.move_to_next());

        assert!(buffer.move_to_first());
        assert_eq!(buffer.get(), Some(Point::new(0.0, 0.0)));
        assert!(buffer.move_to_next());
        assert_eq!(buffer.get(), Some(Point::new(1.0, 0.0)));
        assert!(buffer.move_to_position(2));
        assert_eq!(buffer.get(), Some(Point::new(2.0, 0.0)));
        assert!(!buffer.move_to_position(3));
        assert!(!buffer.has_valid_position());
    }

    #[test]
    fn test_empty_buffer_has_no_cursor() {
        let mut buffer = VertexBuffer::create(0);
        assert!(buffer.is_empty());
        assert!(!buffer.has_valid_position());
        assert!(!buffer.put_xy(1.0, 1.0));
        assert_eq!(buffer.measure_boundaries(0, 10), None);
        assert!(!buffer.contains(Point::origin(), 0, 10));
    }

    #[test]
    fn test_from_raw_rejects_odd_length() {
        assert!(VertexBuffer::from_raw(vec![1.0, 2.0, 3.0]).is_err());
        assert!(IndexTupleBuffer::from_raw(vec![0, 1]).is_err());
    }

    #[test]
    fn test_random_access() {
        let mut buffer = unit_square();
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.get_at(2), Some(Point::new(1.0, 0.0)));
        assert_eq!(buffer.get_at(4), None);
        assert!(buffer.set_at(3, Point::new(2.0, 2.0)));
        assert!(!buffer.set_at(4, Point::new(2.0, 2.0)));
        assert_eq!(buffer.iter().last(), Some(Point::new(2.0, 2.0)));
        assert_eq!(buffer.as_bytes().len(), 8 * 4);
    }

    #[test]
    fn test_contains() {
        let buffer = unit_square();
        assert!(buffer.contains(Point::new(0.5, 0.5), 0, 4));
        assert!(!buffer.contains(Point::new(1.5, 0.5), 0, 4));
        assert!(!buffer.contains(Point::new(0.5, -0.5), 0, 4));
        assert!(!buffer.contains(Point::new(0.5, 0.5), 0, 2));
    }

    #[test]
    fn test_contains_non_convex() {
        // U shape open to the top.
        let buffer = VertexBuffer::from_points(&[
            Point::new(0.0, 3.0),
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(2.0, 3.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 3.0),
        ]);
        assert!(buffer.contains(Point::new(0.5, 2.0), 0, 8));
        assert!(buffer.contains(Point::new(1.5, 0.5), 0, 8));
        assert!(!buffer.contains(Point::new(1.5, 2.0), 0, 8));
    }

    #[test]
    fn test_indexed_contains() {
        let buffer = VertexBuffer::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        // Sequential order is a bow tie; the indexed walk is the square.
        assert!(buffer.indexed_contains(Point::new(0.5, 0.1), &[0, 2, 1, 3]));
        assert!(!buffer.contains(Point::new(0.5, 0.1), 0, 4));
        assert!(!buffer.indexed_contains(Point::new(2.0, 0.5), &[0, 2, 1, 3]));
        assert!(!buffer.indexed_contains(Point::new(0.5, 0.5), &[]));
    }

    #[test]
    fn test_transform_and_offset_subrange() {
        let mut buffer = unit_square();
        buffer.transform(&Affine2D::scaling(2.0, 3.0, None), 2, 2);
        assert_eq!(buffer.get_at(0), Some(Point::new(0.0, 1.0)));
        assert_eq!(buffer.get_at(2), Some(Point::new(2.0, 0.0)));
        assert_eq!(buffer.get_at(3), Some(Point::new(2.0, 3.0)));

        buffer.offset(Vector::new(1.0, -1.0), 0, 1);
        assert_eq!(buffer.get_at(0), Some(Point::new(1.0, 0.0)));
        assert_eq!(buffer.measure_boundaries(0, 4), Some(Rect::new(0.0, 3.0, 2.0, 0.0)));
        assert_eq!(buffer.measure_boundaries(2, 100), Some(Rect::new(2.0, 3.0, 2.0, 0.0)));
    }

    #[test]
    fn test_index_tuples() {
        let mut indices = IndexTupleBuffer::create(2);
        assert!(indices.put(0, 1, 2));
        assert!(indices.put_tuple([0, 2, 3]));
        assert!(!indices.put(9, 9, 9));
        assert_eq!(indices.tuples(), &[[0, 1, 2], [0, 2, 3]]);
        assert_eq!(indices.max_index(), Some(3));

        indices.offset_indices(4, 1, 1).unwrap();
        assert_eq!(indices.as_slice(), &[0, 1, 2, 4, 6, 7]);
        assert!(matches!(
            indices.offset_indices(usize::from(u16::MAX), 0, 2),
            Err(GeometryError::IndexOverflow(_))
        ));
    }

    #[test]
    fn test_offset_indices_overflow_leaves_buffer() {
        let mut indices = IndexTupleBuffer::from_raw(vec![0, 1, 2, 0, 60000, 3]).unwrap();
        assert_eq!(indices.offset_indices(10000, 0, 2), Err(GeometryError::IndexOverflow(70001)));
        assert_eq!(indices.as_slice(), &[0, 1, 2, 0, 60000, 3]);

        // The first tuple alone still fits.
        indices.offset_indices(10000, 0, 1).unwrap();
        assert_eq!(indices.as_slice(), &[10000, 10001, 10002, 0, 60000, 3]);
    }
}
