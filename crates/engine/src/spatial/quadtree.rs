//! QuadTree façade over the root [`QuadNode`].

use std::fmt::{self, Display};

use protocol::{KeyValueEntry, Point, Rect};

use super::QuadNode;
use crate::IndexError;

/// Result of a region query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSearch<'a, K> {
    /// Matching entries in tree traversal order.
    pub entries: Vec<&'a KeyValueEntry<K, Point>>,
    /// Nodes visited while answering the query.
    pub nodes_visited: usize,
}

/// Point-region quadtree over the square world `[0, width)`.
pub struct QuadTree<K> {
    root: QuadNode<K>,
    start: Point,
    width: i32,
}

impl<K> QuadTree<K> {
    /// Create an empty tree covering a `width` x `width` world.
    pub fn new(width: i32) -> Result<Self, IndexError> {
        if width < 1 {
            return Err(IndexError::InvalidWorldWidth(width));
        }
        Ok(Self {
            root: QuadNode::Empty,
            start: Point::new(0, 0),
            width,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn root(&self) -> &QuadNode<K> {
        &self.root
    }

    /// Insert an entry.
    pub fn insert(&mut self, entry: KeyValueEntry<K, Point>) {
        self.root = std::mem::take(&mut self.root).insert(entry, self.start, self.width);
    }

    /// Remove the first entry found at `point` in traversal order.
    pub fn remove_by_value(&mut self, point: &Point) -> Option<KeyValueEntry<K, Point>> {
        let mut removed = Vec::new();
        self.root = std::mem::take(&mut self.root).remove_by_value(point, self.start, self.width, &mut removed);
        removed.into_iter().next()
    }

    /// All points held by more than one entry.
    pub fn duplicates(&self) -> Vec<Point> {
        let mut out = Vec::new();
        self.root.duplicates(&mut out);
        out
    }

    /// All entries inside `rect`, plus the number of nodes visited.
    pub fn region_search(&self, rect: &Rect) -> RegionSearch<'_, K> {
        let mut entries = Vec::new();
        // Points on the far boundary, x or y == width, are held too.
        let end = self.start.offset(self.width + 1, self.width + 1);
        let nodes_visited = self.root.region_search(rect, self.start, self.width, end, &mut entries);
        RegionSearch { entries, nodes_visited }
    }
}

impl<K: PartialEq> QuadTree<K> {
    /// Remove the entry equal to `entry` in both key and point.
    pub fn remove_entry(&mut self, entry: &KeyValueEntry<K, Point>) -> Option<KeyValueEntry<K, Point>> {
        let mut removed = Vec::new();
        self.root = std::mem::take(&mut self.root).remove_where(
            entry.value(),
            self.start,
            self.width,
            &|held| held == entry,
            &mut removed,
        );
        removed.into_iter().next()
    }
}

impl<K: Display> QuadTree<K> {
    /// Indented description of every node, followed by a newline-terminated
    /// node count.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let nodes = self.root.dump(0, self.start, self.width, &mut out);
        out.push_str(&format!("QuadTree Size: {nodes} QuadTree Nodes Printed.\n"));
        out
    }
}

impl<K> fmt::Debug for QuadTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("width", &self.width)
            .field("root_internal", &self.root.is_internal())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD_WIDTH: i32 = 1024;

    fn kv(name: &'static str, x: i32, y: i32) -> KeyValueEntry<&'static str, Point> {
        KeyValueEntry::new(name, Point::new(x, y))
    }

    fn tree() -> QuadTree<&'static str> {
        QuadTree::new(WORLD_WIDTH).unwrap()
    }

    fn four_corners() -> QuadTree<&'static str> {
        let mut t = tree();
        t.insert(kv("P1", 0, 0));
        t.insert(kv("P2", 512, 0));
        t.insert(kv("P3", 0, 512));
        t.insert(kv("P4", 512, 512));
        t
    }

    fn two_level() -> QuadTree<&'static str> {
        let mut t = four_corners();
        t.insert(kv("P1", 256, 0));
        t.insert(kv("P1", 0, 256));
        t.insert(kv("P1", 256, 256));
        t.insert(kv("P4", 768, 512));
        t.insert(kv("P4", 512, 768));
        t.insert(kv("P4", 768, 768));
        t
    }

    #[test]
    fn test_rejects_bad_width() {
        assert!(matches!(
            QuadTree::<&str>::new(0),
            Err(IndexError::InvalidWorldWidth(0))
        ));
        assert!(QuadTree::<&str>::new(1).is_ok());
    }

    #[test]
    fn test_empty_dump() {
        assert_eq!(
            tree().dump(),
            "Node at 0, 0, 1024: Empty\nQuadTree Size: 1 QuadTree Nodes Printed.\n"
        );
    }

    #[test]
    fn test_multi_leaf_insert_dump() {
        let mut t = tree();
        t.insert(kv("P1", 0, 0));
        t.insert(kv("P1", 0, 1));
        assert_eq!(
            t.dump(),
            "Node at 0, 0, 1024:\n(P1, 0, 0)\n(P1, 0, 1)\nQuadTree Size: 1 QuadTree Nodes Printed.\n"
        );
    }

    #[test]
    fn test_four_corner_split() {
        let t = four_corners();
        assert!(t.root().is_internal());
        assert_eq!(
            t.dump(),
            "Node at 0, 0, 1024: Internal\n\
             \x20 Node at 0, 0, 512:\n\
             \x20 (P1, 0, 0)\n\
             \x20 Node at 512, 0, 512:\n\
             \x20 (P2, 512, 0)\n\
             \x20 Node at 0, 512, 512:\n\
             \x20 (P3, 0, 512)\n\
             \x20 Node at 512, 512, 512:\n\
             \x20 (P4, 512, 512)\n\
             QuadTree Size: 5 QuadTree Nodes Printed.\n"
        );
    }

    #[test]
    fn test_two_level_dump() {
        assert_eq!(
            two_level().dump(),
            "Node at 0, 0, 1024: Internal\n\
             \x20 Node at 0, 0, 512: Internal\n\
             \x20   Node at 0, 0, 256:\n\
             \x20   (P1, 0, 0)\n\
             \x20   Node at 256, 0, 256:\n\
             \x20   (P1, 256, 0)\n\
             \x20   Node at 0, 256, 256:\n\
             \x20   (P1, 0, 256)\n\
             \x20   Node at 256, 256, 256:\n\
             \x20   (P1, 256, 256)\n\
             \x20 Node at 512, 0, 512:\n\
             \x20 (P2, 512, 0)\n\
             \x20 Node at 0, 512, 512:\n\
             \x20 (P3, 0, 512)\n\
             \x20 Node at 512, 512, 512: Internal\n\
             \x20   Node at 512, 512, 256:\n\
             \x20   (P4, 512, 512)\n\
             \x20   Node at 768, 512, 256:\n\
             \x20   (P4, 768, 512)\n\
             \x20   Node at 512, 768, 256:\n\
             \x20   (P4, 512, 768)\n\
             \x20   Node at 768, 768, 256:\n\
             \x20   (P4, 768, 768)\n\
             QuadTree Size: 13 QuadTree Nodes Printed.\n"
        );
    }

    #[test]
    fn test_remove_collapses_nested_internal() {
        let mut t = two_level();
        assert_eq!(t.remove_by_value(&Point::new(0, 0)), Some(kv("P1", 0, 0)));
        assert_eq!(
            t.dump(),
            "Node at 0, 0, 1024: Internal\n\
             \x20 Node at 0, 0, 512:\n\
             \x20 (P1, 256, 0)\n\
             \x20 (P1, 0, 256)\n\
             \x20 (P1, 256, 256)\n\
             \x20 Node at 512, 0, 512:\n\
             \x20 (P2, 512, 0)\n\
             \x20 Node at 0, 512, 512:\n\
             \x20 (P3, 0, 512)\n\
             \x20 Node at 512, 512, 512: Internal\n\
             \x20   Node at 512, 512, 256:\n\
             \x20   (P4, 512, 512)\n\
             \x20   Node at 768, 512, 256:\n\
             \x20   (P4, 768, 512)\n\
             \x20   Node at 512, 768, 256:\n\
             \x20   (P4, 512, 768)\n\
             \x20   Node at 768, 768, 256:\n\
             \x20   (P4, 768, 768)\n\
             QuadTree Size: 9 QuadTree Nodes Printed.\n"
        );
    }

    #[test]
    fn test_remove_two_quadrants_collapses_root() {
        let mut t = four_corners();
        assert_eq!(t.remove_by_value(&Point::new(512, 0)), Some(kv("P2", 512, 0)));
        assert_eq!(t.remove_by_value(&Point::new(512, 512)), Some(kv("P4", 512, 512)));
        assert!(t.root().is_leaf());
        assert_eq!(
            t.dump(),
            "Node at 0, 0, 1024:\n(P1, 0, 0)\n(P3, 0, 512)\nQuadTree Size: 1 QuadTree Nodes Printed.\n"
        );
    }

    #[test]
    fn test_remove_everything_leaves_empty_root() {
        let mut t = two_level();
        let points: Vec<Point> = t
            .region_search(&Rect::new(0, 0, WORLD_WIDTH + 1, WORLD_WIDTH + 1))
            .entries
            .iter()
            .map(|e| *e.value())
            .collect();
        assert_eq!(points.len(), 10);
        for p in points {
            assert!(t.remove_by_value(&p).is_some());
        }
        assert!(t.root().is_empty());
        assert_eq!(t.remove_by_value(&Point::new(0, 0)), None);
    }

    #[test]
    fn test_remove_entry_picks_matching_key() {
        let mut t = tree();
        t.insert(kv("A", 7, 7));
        t.insert(kv("B", 7, 7));
        assert_eq!(t.remove_entry(&kv("B", 7, 7)), Some(kv("B", 7, 7)));
        assert_eq!(t.remove_entry(&kv("B", 7, 7)), None);
        assert_eq!(t.root().entries(), &[kv("A", 7, 7)]);
    }

    #[test]
    fn test_duplicates() {
        let mut t = tree();
        t.insert(kv("A", 7, 7));
        t.insert(kv("B", 7, 7));
        t.insert(kv("C", 8, 8));
        assert_eq!(t.duplicates(), vec![Point::new(7, 7)]);
    }

    #[test]
    fn test_region_search_outside_data() {
        let t = four_corners();
        let result = t.region_search(&Rect::new(100, 100, 10, 10));
        assert!(result.entries.is_empty());
        assert_eq!(result.nodes_visited, 2);
    }

    #[test]
    fn test_boundary_point_is_searchable() {
        let mut t = four_corners();
        t.insert(kv("edge", WORLD_WIDTH, WORLD_WIDTH));
        let result = t.region_search(&Rect::new(0, 0, WORLD_WIDTH + 1, WORLD_WIDTH + 1));
        assert_eq!(result.entries.len(), 5);
        assert!(result.entries.contains(&&kv("edge", WORLD_WIDTH, WORLD_WIDTH)));
    }

    #[test]
    fn test_narrow_search_on_far_edge() {
        let mut t = four_corners();
        t.insert(kv("edge", WORLD_WIDTH, WORLD_WIDTH));

        let narrow = t.region_search(&Rect::new(WORLD_WIDTH, WORLD_WIDTH, 1, 1));
        assert_eq!(narrow.entries, vec![&kv("edge", WORLD_WIDTH, WORLD_WIDTH)]);
        assert_eq!(narrow.nodes_visited, 2);

        let outside = t.region_search(&Rect::new(WORLD_WIDTH + 1, WORLD_WIDTH + 1, 5, 5));
        assert!(outside.entries.is_empty());
        assert_eq!(outside.nodes_visited, 1);
    }
}
