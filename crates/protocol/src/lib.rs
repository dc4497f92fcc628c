//! Shared protocol crate for pointdb.
//!
//! This crate contains:
//! - Shared value types (Point, Rect, KeyValueEntry)
//! - The line-oriented command grammar
//! - Response formatting for command results

mod entry;
mod error;
mod geometry;
pub mod commands;

pub use entry::KeyValueEntry;
pub use error::ProtocolError;
pub use geometry::Rect;

use std::fmt;

use glam::IVec2;

/// Immutable 2D integer coordinate.
///
/// Equality and hashing are by `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point(IVec2);

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    #[inline]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    #[inline]
    pub const fn y(&self) -> i32 {
        self.0.y
    }

    /// Point shifted by `(dx, dy)`.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self(self.0 + IVec2::new(dx, dy))
    }

    /// The underlying glam vector.
    #[inline]
    pub const fn as_ivec2(&self) -> IVec2 {
        self.0
    }
}

impl From<IVec2> for Point {
    fn from(v: IVec2) -> Self {
        Self(v)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x(), self.y())
    }
}
