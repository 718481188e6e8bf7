#![forbid(unsafe_code)]

//! Composite values: the aggregate state a field binder slices into fields.
//!
//! A [`Composite`] is either a keyed map or an ordered list. The container
//! kind is part of the type, so copy-on-write is dispatched at compile time
//! rather than by inspecting the value.
//!
//! # Invariants
//!
//! 1. [`Composite::with_field`] never mutates `self`; it returns a clone with
//!    exactly one key changed.
//! 2. Every key present before a successful write is present after it, with
//!    its value unchanged unless it is the written key.
//! 3. Lists have no holes: writing at `index == len` appends, writing past
//!    that is [`FieldError::IndexOutOfRange`].
//! 4. Maps insert on write to an absent key.
//!
//! # Structural Sharing
//!
//! With the `hamt` feature, `im::HashMap`, `im::OrdMap`, and `im::Vector`
//! implement [`Composite`]. Their clones share every untouched entry with
//! the original, so a field write costs `O(log n)` instead of a full copy.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

use crate::error::FieldError;

/// Shape of a composite container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    /// Keyed by arbitrary keys (field names).
    Map,
    /// Keyed by position.
    List,
}

/// An aggregate form value addressable one key at a time.
pub trait Composite: Clone + 'static {
    /// Field address (field name for maps, index for lists).
    type Key: Clone + Eq + Hash + Debug + 'static;
    /// Value stored under each key.
    type Value: Clone + 'static;

    /// Container shape.
    const KIND: CompositeKind;

    /// Borrow the value at `key`, if present.
    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Write `value` at `key` in place.
    fn set(&mut self, key: Self::Key, value: Self::Value) -> Result<(), FieldError>;

    /// Number of keys.
    fn len(&self) -> usize;

    /// Whether the composite holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy-on-write: clone `self` and write one key into the clone.
    fn with_field(&self, key: Self::Key, value: Self::Value) -> Result<Self, FieldError> {
        let mut clone = self.clone();
        clone.set(key, value)?;
        Ok(clone)
    }
}

impl<V: Clone + 'static> Composite for Vec<V> {
    type Key = usize;
    type Value = V;

    const KIND: CompositeKind = CompositeKind::List;

    fn get(&self, key: &usize) -> Option<&V> {
        self.as_slice().get(*key)
    }

    fn set(&mut self, key: usize, value: V) -> Result<(), FieldError> {
        let len = Vec::len(self);
        match key {
            i if i < len => self[i] = value,
            i if i == len => self.push(value),
            index => return Err(FieldError::IndexOutOfRange { index, len }),
        }
        Ok(())
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<K, V> Composite for BTreeMap<K, V>
where
    K: Clone + Ord + Hash + Debug + 'static,
    V: Clone + 'static,
{
    type Key = K;
    type Value = V;

    const KIND: CompositeKind = CompositeKind::Map;

    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Result<(), FieldError> {
        self.insert(key, value);
        Ok(())
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

impl<K, V, S> Composite for HashMap<K, V, S>
where
    K: Clone + Eq + Hash + Debug + 'static,
    V: Clone + 'static,
    S: BuildHasher + Clone + 'static,
{
    type Key = K;
    type Value = V;

    const KIND: CompositeKind = CompositeKind::Map;

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn set(&mut self, key: K, value: V) -> Result<(), FieldError> {
        self.insert(key, value);
        Ok(())
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

#[cfg(feature = "hamt")]
mod hamt {
    use super::*;

    impl<V: Clone + 'static> Composite for im::Vector<V> {
        type Key = usize;
        type Value = V;

        const KIND: CompositeKind = CompositeKind::List;

        fn get(&self, key: &usize) -> Option<&V> {
            im::Vector::get(self, *key)
        }

        fn set(&mut self, key: usize, value: V) -> Result<(), FieldError> {
            let len = im::Vector::len(self);
            match key {
                i if i < len => {
                    im::Vector::set(self, i, value);
                }
                i if i == len => self.push_back(value),
                index => return Err(FieldError::IndexOutOfRange { index, len }),
            }
            Ok(())
        }

        fn len(&self) -> usize {
            im::Vector::len(self)
        }
    }

    impl<K, V> Composite for im::HashMap<K, V>
    where
        K: Clone + Eq + Hash + Debug + 'static,
        V: Clone + 'static,
    {
        type Key = K;
        type Value = V;

        const KIND: CompositeKind = CompositeKind::Map;

        fn get(&self, key: &K) -> Option<&V> {
            im::HashMap::get(self, key)
        }

        fn set(&mut self, key: K, value: V) -> Result<(), FieldError> {
            self.insert(key, value);
            Ok(())
        }

        fn len(&self) -> usize {
            im::HashMap::len(self)
        }
    }

    impl<K, V> Composite for im::OrdMap<K, V>
    where
        K: Clone + Ord + Hash + Debug + 'static,
        V: Clone + 'static,
    {
        type Key = K;
        type Value = V;

        const KIND: CompositeKind = CompositeKind::Map;

        fn get(&self, key: &K) -> Option<&V> {
            im::OrdMap::get(self, key)
        }

        fn set(&mut self, key: K, value: V) -> Result<(), FieldError> {
            self.insert(key, value);
            Ok(())
        }

        fn len(&self) -> usize {
            im::OrdMap::len(self)
        }
    }
}
