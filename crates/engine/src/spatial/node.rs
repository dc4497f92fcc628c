//! PR quadtree nodes.
//!
//! Every operation takes the region the node covers as `(start, width)`;
//! nodes do not store their own bounds.

use std::collections::HashSet;

use protocol::{KeyValueEntry, Point, Rect};
use tracing::trace;

/// A leaf splits once it holds more distinct points than this.
pub const LEAF_CAPACITY: usize = 3;

/// One of the four children of an internal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    /// Child order used for storage, traversal and dumps.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Quadrant of the region `[start, start + width)` that `point` routes to.
    ///
    /// North is `y` in `[start.y, start.y + width / 2)` and west is `x` in
    /// `[start.x, start.x + width / 2)`; anything else is south or east.
    #[inline]
    pub fn of(point: &Point, start: Point, width: i32) -> Self {
        let half = (width / 2) as i64;
        let (px, py) = (point.x() as i64, point.y() as i64);
        let (sx, sy) = (start.x() as i64, start.y() as i64);
        let north = py >= sy && py < sy + half;
        let west = px >= sx && px < sx + half;
        match (north, west) {
            (true, true) => Quadrant::NorthWest,
            (true, false) => Quadrant::NorthEast,
            (false, true) => Quadrant::SouthWest,
            (false, false) => Quadrant::SouthEast,
        }
    }

    /// Top-left corner of this quadrant given the parent's origin and the
    /// child width.
    #[inline]
    pub fn origin(self, start: Point, half: i32) -> Point {
        match self {
            Quadrant::NorthWest => start,
            Quadrant::NorthEast => start.offset(half, 0),
            Quadrant::SouthWest => start.offset(0, half),
            Quadrant::SouthEast => start.offset(half, half),
        }
    }

    /// Exclusive far corner of the region routed to this quadrant, given the
    /// parent's origin, the child width and the parent's routed far corner.
    ///
    /// South and east children inherit the parent's far edge, so they also
    /// cover points that lie on the outer boundary of the world.
    #[inline]
    pub fn end(self, start: Point, half: i32, end: Point) -> Point {
        let mid = start.offset(half, half);
        match self {
            Quadrant::NorthWest => mid,
            Quadrant::NorthEast => Point::new(end.x(), mid.y()),
            Quadrant::SouthWest => Point::new(mid.x(), end.y()),
            Quadrant::SouthEast => end,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Quadtree node.
///
/// `Empty` carries no payload, so every empty region shares the same
/// representation and costs no allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuadNode<K> {
    /// Region holds nothing.
    Empty,
    /// Entries in insertion order.
    Leaf(Vec<KeyValueEntry<K, Point>>),
    /// Four owned children, indexed by [`Quadrant`].
    Internal(Box<[QuadNode<K>; 4]>),
}

impl<K> Default for QuadNode<K> {
    fn default() -> Self {
        QuadNode::Empty
    }
}

impl<K> QuadNode<K> {
    fn new_internal() -> Self {
        QuadNode::Internal(Box::new([
            QuadNode::Empty,
            QuadNode::Empty,
            QuadNode::Empty,
            QuadNode::Empty,
        ]))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, QuadNode::Empty)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, QuadNode::Leaf(_))
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, QuadNode::Internal(_))
    }

    /// Child in `quadrant`, if this is an internal node.
    pub fn child(&self, quadrant: Quadrant) -> Option<&QuadNode<K>> {
        match self {
            QuadNode::Internal(children) => Some(&children[quadrant.index()]),
            _ => None,
        }
    }

    /// Entries held directly by this node. Only leaves hold entries.
    pub fn entries(&self) -> &[KeyValueEntry<K, Point>] {
        match self {
            QuadNode::Leaf(entries) => entries,
            _ => &[],
        }
    }

    fn into_entries(self) -> Vec<KeyValueEntry<K, Point>> {
        match self {
            QuadNode::Leaf(entries) => entries,
            _ => Vec::new(),
        }
    }

    /// Insert `entry` into the region `[start, start + width)` and return the
    /// node that now covers it.
    pub fn insert(self, entry: KeyValueEntry<K, Point>, start: Point, width: i32) -> Self {
        match self {
            QuadNode::Empty => QuadNode::Leaf(Vec::new()).insert(entry, start, width),
            QuadNode::Leaf(mut entries) => {
                let duplicate = entries.iter().any(|held| held.value() == entry.value());
                entries.push(entry);

                // A width-1 region cannot be subdivided further.
                if duplicate || width <= 1 || distinct_points(&entries) <= LEAF_CAPACITY {
                    return QuadNode::Leaf(entries);
                }

                trace!(x = start.x(), y = start.y(), width, "quadtree leaf split");
                entries
                    .into_iter()
                    .fold(Self::new_internal(), |node, held| node.insert(held, start, width))
            }
            QuadNode::Internal(mut children) => {
                let quadrant = Quadrant::of(entry.value(), start, width);
                let half = width / 2;
                let child = &mut children[quadrant.index()];
                *child = std::mem::take(child).insert(entry, quadrant.origin(start, half), half);
                QuadNode::Internal(children)
            }
        }
    }

    /// Remove the first entry located at `point`, pushing it onto `removed`.
    pub fn remove_by_value(
        self,
        point: &Point,
        start: Point,
        width: i32,
        removed: &mut Vec<KeyValueEntry<K, Point>>,
    ) -> Self {
        self.remove_where(point, start, width, &|entry| entry.value() == point, removed)
    }

    /// Remove the first entry at `point` accepted by `matches`.
    pub(crate) fn remove_where<F>(
        self,
        point: &Point,
        start: Point,
        width: i32,
        matches: &F,
        removed: &mut Vec<KeyValueEntry<K, Point>>,
    ) -> Self
    where
        F: Fn(&KeyValueEntry<K, Point>) -> bool,
    {
        match self {
            QuadNode::Empty => QuadNode::Empty,
            QuadNode::Leaf(mut entries) => {
                if let Some(pos) = entries.iter().position(|entry| matches(entry)) {
                    removed.push(entries.remove(pos));
                }
                if entries.is_empty() {
                    QuadNode::Empty
                } else {
                    QuadNode::Leaf(entries)
                }
            }
            QuadNode::Internal(mut children) => {
                let quadrant = Quadrant::of(point, start, width);
                let half = width / 2;
                let child = &mut children[quadrant.index()];
                *child = std::mem::take(child).remove_where(
                    point,
                    quadrant.origin(start, half),
                    half,
                    matches,
                    removed,
                );
                Self::reduce(children, start, width)
            }
        }
    }

    /// Collapse an internal node whose children no longer justify it.
    fn reduce(children: Box<[QuadNode<K>; 4]>, start: Point, width: i32) -> Self {
        // An internal child always holds more than LEAF_CAPACITY distinct points.
        if children.iter().any(QuadNode::is_internal) {
            return QuadNode::Internal(children);
        }

        let held = children.iter().map(|child| child.entries().len()).sum::<usize>();
        if held == 0 {
            trace!(x = start.x(), y = start.y(), width, "quadtree internal emptied");
            return QuadNode::Empty;
        }

        let distinct: HashSet<&Point> = children
            .iter()
            .flat_map(|child| child.entries())
            .map(KeyValueEntry::value)
            .collect();
        if distinct.len() > LEAF_CAPACITY {
            return QuadNode::Internal(children);
        }

        trace!(x = start.x(), y = start.y(), width, "quadtree internal collapsed to leaf");
        let children: [QuadNode<K>; 4] = *children;
        children
            .into_iter()
            .flat_map(QuadNode::into_entries)
            .fold(QuadNode::Empty, |node, entry| node.insert(entry, start, width))
    }

    /// Append every point held by more than one entry, once each.
    pub fn duplicates(&self, out: &mut Vec<Point>) {
        match self {
            QuadNode::Empty => {}
            QuadNode::Leaf(entries) => {
                let mut seen = HashSet::new();
                let mut reported = HashSet::new();
                for entry in entries {
                    let point = *entry.value();
                    if !seen.insert(point) && reported.insert(point) {
                        out.push(point);
                    }
                }
            }
            QuadNode::Internal(children) => {
                for child in children.iter() {
                    child.duplicates(out);
                }
            }
        }
    }

    /// Collect entries inside `rect`. Returns the number of nodes visited.
    ///
    /// `end` is the exclusive far corner of every point routed to this node.
    pub fn region_search<'a>(
        &'a self,
        rect: &Rect,
        start: Point,
        width: i32,
        end: Point,
        out: &mut Vec<&'a KeyValueEntry<K, Point>>,
    ) -> usize {
        match self {
            QuadNode::Empty => 1,
            QuadNode::Leaf(entries) => {
                out.extend(entries.iter().filter(|entry| rect.contains_point(entry.value())));
                1
            }
            QuadNode::Internal(children) => {
                let half = width / 2;
                let mut visited = 1;
                for quadrant in Quadrant::ALL {
                    let origin = quadrant.origin(start, half);
                    let child_end = quadrant.end(start, half, end);
                    let routed = Rect::new(
                        origin.x(),
                        origin.y(),
                        child_end.x() - origin.x(),
                        child_end.y() - origin.y(),
                    );
                    if routed.overlaps(rect) {
                        visited += children[quadrant.index()].region_search(rect, origin, half, child_end, out);
                    }
                }
                visited
            }
        }
    }
}

impl<K: std::fmt::Display> QuadNode<K> {
    /// Write an indented description of this subtree. Returns the number of
    /// nodes printed.
    pub fn dump(&self, level: usize, start: Point, width: i32, out: &mut String) -> usize {
        let indent = "  ".repeat(level);
        out.push_str(&format!("{indent}Node at {start}, {width}"));
        match self {
            QuadNode::Empty => {
                out.push_str(": Empty\n");
                1
            }
            QuadNode::Leaf(entries) => {
                out.push_str(":\n");
                for entry in entries {
                    out.push_str(&format!("{indent}({entry})\n"));
                }
                1
            }
            QuadNode::Internal(children) => {
                out.push_str(": Internal\n");
                let half = width / 2;
                1 + Quadrant::ALL
                    .iter()
                    .map(|&q| children[q.index()].dump(level + 1, q.origin(start, half), half, out))
                    .sum::<usize>()
            }
        }
    }
}

fn distinct_points<K>(entries: &[KeyValueEntry<K, Point>]) -> usize {
    entries.iter().map(KeyValueEntry::value).collect::<HashSet<_>>().len()
}
