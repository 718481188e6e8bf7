#![forbid(unsafe_code)]

//! Monotonic record of which fields have been changed.
//!
//! # Invariants
//!
//! 1. Once a key is marked it stays marked; there is no unmark operation.
//! 2. An unmarked key is absent: [`TouchedSet::get`] returns `None`, not
//!    `Some(false)`.

use std::fmt;
use std::hash::Hash;

use ahash::AHashMap;

/// Set of touched keys, exposed as a key -> `true` mapping.
#[derive(Clone, PartialEq, Eq)]
pub struct TouchedSet<K: Eq + Hash> {
    keys: AHashMap<K, bool>,
}

impl<K: Eq + Hash> TouchedSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            keys: AHashMap::new(),
        }
    }

    /// Mark `key`. Returns `true` if it was not marked before.
    pub fn mark(&mut self, key: K) -> bool {
        self.keys.insert(key, true).is_none()
    }

    /// Whether `key` has been marked.
    #[must_use]
    pub fn is_touched(&self, key: &K) -> bool {
        self.keys.contains_key(key)
    }

    /// `Some(true)` for a marked key, `None` otherwise.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<bool> {
        self.keys.get(key).copied()
    }

    /// Iterate marked keys in unspecified order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.keys.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Eq + Hash> Default for TouchedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for TouchedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys.keys()).finish()
    }
}

impl<K: Eq + Hash> FromIterator<K> for TouchedSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for key in iter {
            set.mark(key);
        }
        set
    }
}
