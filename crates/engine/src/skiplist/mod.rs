//! Skip list keyed multimap.
//!
//! Nodes live in a slab (`Vec<Option<SkipNode>>`) and link to each other by
//! slot index. Each node carries one forward link per level it was drawn
//! for; the head carries one per level currently in use.

use std::borrow::Borrow;
use std::fmt::{self, Display};

use protocol::KeyValueEntry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Forward link: slot index of the next node on a level, or `None` at the end.
type Link = Option<usize>;

/// Position during a traversal: the head sentinel or a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pos {
    Head,
    Node(usize),
}

#[derive(Debug)]
struct SkipNode<K, V> {
    entry: KeyValueEntry<K, V>,
    forward: Vec<Link>,
}

/// Ordered multimap backed by a randomized skip list.
///
/// Entries are ordered by key. Entries sharing a key sit next to each other,
/// most recently inserted first.
pub struct SkipList<K, V> {
    /// Head sentinel links; `head.len()` is the head's depth.
    head: Vec<Link>,
    nodes: Vec<Option<SkipNode<K, V>>>,
    /// Vacated slots in `nodes`, reused by later inserts.
    free: Vec<usize>,
    len: usize,
    /// Highest level drawn so far; `None` until the first insert.
    max_level: Option<usize>,
    rng: StdRng,
}

impl<K, V> SkipList<K, V> {
    /// Create an empty list whose level draws are seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create an empty list with reproducible level draws.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            head: vec![None],
            nodes: Vec::new(),
            free: Vec::new(),
            len: 0,
            max_level: None,
            rng,
        }
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest level index present at the head, `None` before any insert.
    #[inline]
    pub fn max_level(&self) -> Option<usize> {
        self.max_level
    }

    /// Lowest ordered entry.
    pub fn first(&self) -> Option<&KeyValueEntry<K, V>> {
        self.head[0].map(|idx| &self.node(idx).entry)
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head[0],
        }
    }

    #[inline]
    fn node(&self, idx: usize) -> &SkipNode<K, V> {
        match &self.nodes[idx] {
            Some(node) => node,
            None => unreachable!("skip list link to vacated slot {idx}"),
        }
    }

    #[inline]
    fn links(&self, at: Pos) -> &[Link] {
        match at {
            Pos::Head => &self.head,
            Pos::Node(idx) => &self.node(idx).forward,
        }
    }

    #[inline]
    fn next(&self, at: Pos, level: usize) -> Link {
        self.links(at)[level]
    }

    fn set_next(&mut self, at: Pos, level: usize, link: Link) {
        match at {
            Pos::Head => self.head[level] = link,
            Pos::Node(idx) => match &mut self.nodes[idx] {
                Some(node) => node.forward[level] = link,
                None => unreachable!("skip list link to vacated slot {idx}"),
            },
        }
    }

    /// Draw a level by fair coin flips: keep going while heads.
    fn random_level(&mut self) -> usize {
        let mut level = 0;
        while self.rng.random_bool(0.5) {
            level += 1;
        }
        level
    }

    /// Replace the head with one deep enough for `level`, carrying over the
    /// existing links.
    fn grow_head(&mut self, level: usize) {
        let mut head = vec![None; (level + 1).max(self.head.len())];
        head[..self.head.len()].copy_from_slice(&self.head);
        trace!(from = self.head.len(), to = head.len(), "skip list head grown");
        self.head = head;
    }

    fn alloc(&mut self, node: SkipNode<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }

    /// Unlink `target` on every level where `update[level]` points at it and
    /// release its slot.
    fn unlink(&mut self, update: &[Pos], target: usize) -> KeyValueEntry<K, V> {
        let forward = self.node(target).forward.clone();
        for (level, &after) in forward.iter().enumerate() {
            if self.next(update[level], level) == Some(target) {
                self.set_next(update[level], level, after);
            }
        }

        let node = match self.nodes[target].take() {
            Some(node) => node,
            None => unreachable!("skip list link to vacated slot {target}"),
        };
        self.free.push(target);
        self.len -= 1;
        node.entry
    }

    /// Second pass from the head: for every level, the node whose link on
    /// that level points at `target`.
    fn pointers_to(&self, target: usize) -> Vec<Pos> {
        let mut update = vec![Pos::Head; self.head.len()];
        let mut at = Pos::Head;
        loop {
            for (level, &link) in self.links(at).iter().enumerate() {
                if link == Some(target) {
                    update[level] = at;
                }
            }
            match self.next(at, 0) {
                Some(idx) if idx != target => at = Pos::Node(idx),
                _ => break,
            }
        }
        update
    }
}

impl<K: Ord, V> SkipList<K, V> {
    /// For every level, the last position whose key is strictly less than
    /// `key`.
    fn predecessors<Q>(&self, key: &Q) -> Vec<Pos>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = vec![Pos::Head; self.head.len()];
        let mut at = Pos::Head;
        for level in (0..self.head.len()).rev() {
            while let Some(idx) = self.next(at, level) {
                let k: &Q = self.node(idx).entry.key().borrow();
                if k < key {
                    at = Pos::Node(idx);
                } else {
                    break;
                }
            }
            update[level] = at;
        }
        update
    }

    /// All entries with `key`, newest first. Empty when the key is absent.
    pub fn search<Q>(&self, key: &Q) -> Vec<&KeyValueEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let update = self.predecessors(key);
        let mut found = Vec::new();
        let mut cur = self.next(update[0], 0);
        while let Some(idx) = cur {
            let node = self.node(idx);
            let k: &Q = node.entry.key().borrow();
            if k != key {
                break;
            }
            found.push(&node.entry);
            cur = node.forward[0];
        }
        found
    }

    /// Insert an entry ahead of any existing entries with an equal key.
    pub fn insert(&mut self, entry: KeyValueEntry<K, V>) {
        let level = self.random_level();
        if self.max_level.is_none_or(|max| level > max) {
            self.grow_head(level);
            self.max_level = Some(level);
        }

        let update = self.predecessors(entry.key());
        let forward = (0..=level).map(|l| self.next(update[l], l)).collect();
        let idx = self.alloc(SkipNode { entry, forward });
        for (l, &at) in update.iter().enumerate().take(level + 1) {
            self.set_next(at, l, Some(idx));
        }
        self.len += 1;
    }

    /// Remove the newest entry with `key`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<KeyValueEntry<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let update = self.predecessors(key);
        let target = self.next(update[0], 0)?;
        let k: &Q = self.node(target).entry.key().borrow();
        if k != key {
            return None;
        }
        Some(self.unlink(&update, target))
    }
}

impl<K, V: PartialEq> SkipList<K, V> {
    /// Remove the first entry, in key order, whose value equals `value`.
    pub fn remove_by_value(&mut self, value: &V) -> Option<KeyValueEntry<K, V>> {
        let mut cur = self.head[0];
        let target = loop {
            let idx = cur?;
            let node = self.node(idx);
            if node.entry.value() == value {
                break idx;
            }
            cur = node.forward[0];
        };

        let update = self.pointers_to(target);
        Some(self.unlink(&update, target))
    }
}

impl<K: Ord, V: PartialEq> SkipList<K, V> {
    /// Remove the newest entry equal to `entry` in both key and value.
    pub fn remove_entry(&mut self, entry: &KeyValueEntry<K, V>) -> Option<KeyValueEntry<K, V>> {
        let mut update = self.predecessors(entry.key());

        // Walk the run of equal keys on level 0.
        let mut cur = self.next(update[0], 0);
        let target = loop {
            let idx = cur?;
            let node = self.node(idx);
            if node.entry.key() != entry.key() {
                return None;
            }
            if node.entry.value() == entry.value() {
                break idx;
            }
            cur = node.forward[0];
        };

        // Predecessors on upper levels may sit inside the run.
        for level in 0..self.node(target).forward.len() {
            let mut at = update[level];
            while let Some(idx) = self.next(at, level) {
                if idx == target {
                    break;
                }
                at = Pos::Node(idx);
            }
            update[level] = at;
        }
        Some(self.unlink(&update, target))
    }
}

impl<K: Display, V: Display> SkipList<K, V> {
    /// Diagnostic listing of the head and every node on level 0.
    pub fn dump(&self) -> String {
        let mut out = String::from("SkipList dump:");
        out.push_str(&format!("\nNode has depth {}, Value (null)", self.head.len()));
        let mut cur = self.head[0];
        while let Some(idx) = cur {
            let node = self.node(idx);
            out.push_str(&format!("\nNode has depth {}, Value ({})", node.forward.len(), node.entry));
            cur = node.forward[0];
        }
        out.push_str(&format!("\nSkipList size is: {}", self.len));
        out
    }
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SkipList<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.len)
            .field("max_level", &self.max_level)
            .finish()
    }
}

/// Forward iterator over a [`SkipList`] in ascending key order.
#[derive(Debug)]
pub struct Iter<'a, K, V> {
    list: &'a SkipList<K, V>,
    next: Link,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a KeyValueEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?);
        self.next = node.forward[0];
        Some(&node.entry)
    }
}

impl<'a, K, V> IntoIterator for &'a SkipList<K, V> {
    type Item = &'a KeyValueEntry<K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
