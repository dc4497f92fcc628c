//! Dual-index point database.
//!
//! Every record is stored twice: in a [`SkipList`] for lookup by name and in
//! a [`QuadTree`] for lookup by region. Each mutation validates first and
//! then updates both indexes, or neither.

use std::borrow::Borrow;
use std::fmt::{self, Display};

use protocol::{KeyValueEntry, Point, Rect};
use tracing::debug;

use crate::config::Config;
use crate::skiplist::{Iter, SkipList};
use crate::spatial::{QuadTree, RegionSearch};
use crate::IndexError;

/// Named points indexed by key and by position.
pub struct Database<K> {
    skiplist: SkipList<K, Point>,
    tree: QuadTree<K>,
}

impl<K> Database<K> {
    /// Create an empty database over a `world_width` square world.
    pub fn new(world_width: i32) -> Result<Self, IndexError> {
        Ok(Self {
            skiplist: SkipList::new(),
            tree: QuadTree::new(world_width)?,
        })
    }

    /// Create an empty database whose skip list draws levels from `seed`.
    pub fn with_seed(world_width: i32, seed: u64) -> Result<Self, IndexError> {
        Ok(Self {
            skiplist: SkipList::with_seed(seed),
            tree: QuadTree::new(world_width)?,
        })
    }

    /// Create an empty database from configuration.
    pub fn from_config(config: &Config) -> Result<Self, IndexError> {
        match config.skiplist.seed {
            Some(seed) => Self::with_seed(config.world.width, seed),
            None => Self::new(config.world.width),
        }
    }

    #[inline]
    pub fn world_width(&self) -> i32 {
        self.tree.width()
    }

    /// Get the number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.skiplist.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.skiplist.is_empty()
    }

    /// Records in key order, newest first within a key.
    pub fn iter(&self) -> Iter<'_, K, Point> {
        self.skiplist.iter()
    }

    #[inline]
    pub fn tree(&self) -> &QuadTree<K> {
        &self.tree
    }

    /// Check that `point` lies within `[0, width]` on both axes.
    ///
    /// The upper bound is inclusive.
    pub fn validate(&self, point: &Point) -> bool {
        let width = self.world_width();
        (0..=width).contains(&point.x()) && (0..=width).contains(&point.y())
    }

    /// Every point held by more than one record.
    pub fn duplicates(&self) -> Vec<Point> {
        self.tree.duplicates()
    }

    /// Records whose point lies inside the rectangle `(x, y, w, h)`.
    pub fn region_search(&self, x: i32, y: i32, w: i32, h: i32) -> RegionSearch<'_, K> {
        let result = self.tree.region_search(&Rect::new(x, y, w, h));
        debug!(
            x,
            y,
            w,
            h,
            found = result.entries.len(),
            visited = result.nodes_visited,
            "region search"
        );
        result
    }
}

impl<K: Ord + Clone> Database<K> {
    /// Insert a record.
    ///
    /// Returns `false`, touching neither index, if the point is out of bounds
    /// or the identical `(key, point)` record already exists.
    pub fn insert(&mut self, entry: KeyValueEntry<K, Point>) -> bool {
        let point = *entry.value();
        if !self.validate(&point) {
            debug!(%point, "insert rejected: out of bounds");
            return false;
        }
        if self
            .skiplist
            .search(entry.key())
            .iter()
            .any(|held| held.value() == entry.value())
        {
            debug!(%point, "insert rejected: duplicate record");
            return false;
        }

        self.tree.insert(entry.clone());
        self.skiplist.insert(entry);
        debug!(%point, records = self.len(), "record inserted");
        true
    }

    /// Remove the newest record with `key`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<KeyValueEntry<K, Point>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.skiplist.remove(key)?;
        let mirrored = self.tree.remove_entry(&removed);
        debug_assert!(mirrored.is_some(), "skip list record missing from quadtree");
        debug!(point = %removed.value(), records = self.len(), "record removed by key");
        Some(removed)
    }

    /// Remove one record located at `point`.
    ///
    /// Out-of-bounds points are rejected before either index is touched.
    /// When several records share the point, the first one in quadtree
    /// traversal order is removed.
    pub fn remove_by_value(&mut self, point: &Point) -> Option<KeyValueEntry<K, Point>> {
        if !self.validate(point) {
            debug!(%point, "remove rejected: out of bounds");
            return None;
        }
        let removed = self.tree.remove_by_value(point)?;
        let mirrored = self.skiplist.remove_entry(&removed);
        debug_assert!(mirrored.is_some(), "quadtree record missing from skip list");
        debug!(%point, records = self.len(), "record removed by point");
        Some(removed)
    }

    /// All records with `key`, newest first.
    pub fn search<Q>(&self, key: &Q) -> Vec<&KeyValueEntry<K, Point>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.skiplist.search(key)
    }
}

impl<K: Display> Database<K> {
    /// Both index dumps, skip list first.
    pub fn dump(&self) -> String {
        format!("{}\nQuadTree dump:\n{}", self.skiplist.dump(), self.tree.dump())
    }
}

impl<K> fmt::Debug for Database<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("skiplist", &self.skiplist)
            .field("tree", &self.tree)
            .finish()
    }
}
