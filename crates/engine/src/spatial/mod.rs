//! Spatial indexing.
//!
//! Point-region quadtree: each leaf holds at most three distinct points, and
//! regions split into four equal quadrants as they fill.

mod node;
mod quadtree;

pub use node::{QuadNode, Quadrant, LEAF_CAPACITY};
pub use quadtree::{QuadTree, RegionSearch};
