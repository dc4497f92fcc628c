//! Axis-aligned rectangles.

use std::fmt;

use crate::Point;

/// Axis-aligned integer rectangle with origin `(x, y)` and size `(w, h)`.
///
/// The far edges are exclusive: a point at `x + w` is outside. A rectangle
/// with a non-positive width or height is empty and intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square region with the given top-left corner.
    #[inline]
    pub const fn square(origin: Point, width: i32) -> Self {
        Self::new(origin.x(), origin.y(), width, width)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    // Edges in i64 so `x + w` cannot overflow.
    #[inline]
    fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    #[inline]
    fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        if self.w < 0 || self.h < 0 {
            return false;
        }
        let (px, py) = (point.x() as i64, point.y() as i64);
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    /// Check if two rectangles share interior area.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Symmetric overlap test: intersection or containment either way.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersects(other) || self.contains_rect(other) || other.contains_rect(self)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.x, self.y, self.w, self.h)
    }
}
