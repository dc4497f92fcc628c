//! Key/value records.

use std::cmp::Ordering;
use std::fmt;

/// Immutable `(key, value)` record.
///
/// Equality compares both halves. Ordering inside the indexes is by key only,
/// via [`KeyValueEntry::cmp_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyValueEntry<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValueEntry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: Ord, V> KeyValueEntry<K, V> {
    /// Compare two entries by key alone.
    #[inline]
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for KeyValueEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.key, self.value)
    }
}
