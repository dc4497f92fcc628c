//! pointdb engine library.
//!
//! Two indexes over one set of named points: a skip list keyed by name and
//! a PR quadtree keyed by position, kept in step by [`Database`].

pub mod config;
pub mod database;
mod error;
pub mod processor;
pub mod skiplist;
pub mod spatial;

#[cfg(test)]
mod proptests;

// Re-export commonly used types
pub use config::Config;
pub use database::Database;
pub use error::IndexError;
pub use processor::CommandProcessor;
pub use skiplist::SkipList;
pub use spatial::{QuadNode, QuadTree, RegionSearch};
