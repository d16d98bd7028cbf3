//! Identity strategies: the rule deciding when two elements are "the same".
//!
//! A [`SmartSet`](crate::SmartSet) delegates all uniqueness decisions to an
//! [`Identity`] strategy chosen at construction:
//!
//! - [`KeyedIdentity`]: derives a scalar key from each element and keeps a
//!   key→position index, giving O(1)-average lookup, insert, and delete.
//! - [`ComparatorIdentity`]: applies a pairwise equality predicate with an
//!   O(n) linear scan; no index is possible without a key.
//!
//! The strategy owns every piece of bookkeeping tied to element positions,
//! so the container can stay agnostic of how identity is decided.

use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::sync::Arc;

/// The identity mechanism behind a [`SmartSet`](crate::SmartSet).
///
/// Implementations locate elements by identity and maintain whatever
/// positional bookkeeping they need across inserts, removals, and
/// reorderings. The container upholds one calling convention: after any
/// operation, the bookkeeping describes exactly the current `items` slice.
///
/// Cloning a strategy must deep-copy its mutable bookkeeping (the
/// copy-on-write discipline relies on it); the identity *function* itself
/// may be shared.
pub trait Identity<T>: Clone {
    /// Returns the position of the element sharing `candidate`'s identity,
    /// if one is present.
    fn find_identity(&self, items: &[T], candidate: &T) -> Option<usize>;

    /// Records the identity of the freshly appended `items[position]`.
    ///
    /// Called exactly once per append, after the element is in place.
    fn insert_new(&mut self, items: &[T], position: usize);

    /// Removes `items[position]` from the sequence and repairs any
    /// positional bookkeeping.
    ///
    /// The removal policy (order-preserving or not) is strategy-specific;
    /// see the implementors for their guarantees.
    fn remove_at(&mut self, items: &mut Vec<T>, position: usize);

    /// Drops all identity bookkeeping.
    fn clear(&mut self);

    /// Rebuilds the bookkeeping from scratch after the sequence has been
    /// reordered wholesale (for example by a sort).
    fn reindex(&mut self, items: &[T]);
}

/// Key-function identity with an auxiliary position index.
///
/// Identity is the scalar key derived by the supplied function. A
/// `FxHashMap<K, usize>` maps each key to the element's current position,
/// giving O(1)-average `find_identity`, `insert_new`, and `remove_at`.
///
/// Removal is a **swap-remove**: the last element of the sequence moves
/// into the freed slot and its index entry is re-pointed. This keeps
/// deletion O(1) at the cost of insertion order — a `SmartSet` using this
/// strategy does not preserve element order across removals.
///
/// # Examples
///
/// ```rust
/// use smartset::{KeyedIdentity, SmartSet};
///
/// let mut set = SmartSet::new(KeyedIdentity::new(|word: &&str| word.len()));
/// set.add("one");
/// set.add("two"); // same length, same identity: ignored
/// set.add("three");
/// assert_eq!(set.len(), 2);
/// ```
pub struct KeyedIdentity<T, K> {
    key_of: Arc<dyn Fn(&T) -> K>,
    index: FxHashMap<K, usize>,
}

impl<T, K> KeyedIdentity<T, K> {
    /// Creates a keyed identity from a key-derivation function.
    pub fn new<F>(key_of: F) -> Self
    where
        F: Fn(&T) -> K + 'static,
    {
        Self {
            key_of: Arc::new(key_of),
            index: FxHashMap::default(),
        }
    }

    /// Derives the key of an element.
    #[inline]
    #[must_use]
    pub fn key_of(&self, element: &T) -> K {
        (self.key_of)(element)
    }
}

impl<T, K: Clone> Clone for KeyedIdentity<T, K> {
    fn clone(&self) -> Self {
        Self {
            key_of: Arc::clone(&self.key_of),
            index: self.index.clone(),
        }
    }
}

impl<T, K: Clone + Eq + Hash> Identity<T> for KeyedIdentity<T, K> {
    #[inline]
    fn find_identity(&self, _items: &[T], candidate: &T) -> Option<usize> {
        self.index.get(&(self.key_of)(candidate)).copied()
    }

    fn insert_new(&mut self, items: &[T], position: usize) {
        self.index.insert((self.key_of)(&items[position]), position);
    }

    fn remove_at(&mut self, items: &mut Vec<T>, position: usize) {
        let removed_key = (self.key_of)(&items[position]);
        items.swap_remove(position);
        self.index.remove(&removed_key);

        // The former last element now lives at `position`; re-point it.
        if let Some(moved) = items.get(position) {
            self.index.insert((self.key_of)(moved), position);
        }
    }

    fn clear(&mut self) {
        self.index.clear();
    }

    fn reindex(&mut self, items: &[T]) {
        self.index.clear();
        self.index.reserve(items.len());
        for (position, element) in items.iter().enumerate() {
            self.index.insert((self.key_of)(element), position);
        }
    }
}

/// Pairwise-comparator identity.
///
/// Identity is a caller-supplied equality predicate; every lookup is an
/// O(n) linear scan over the sequence. The predicate receives the stored
/// element first and the candidate second.
///
/// Removal is an order-preserving splice (`Vec::remove`) — with no derived
/// key there is no index entry to re-point, so the swap-remove shortcut of
/// [`KeyedIdentity`] is not available, and insertion order survives
/// deletions instead.
///
/// # Examples
///
/// ```rust
/// use smartset::{ComparatorIdentity, SmartSet};
///
/// let mut set = SmartSet::new(ComparatorIdentity::new(|a: &String, b: &String| {
///     a.eq_ignore_ascii_case(b)
/// }));
/// set.add("Rust".to_string());
/// set.add("rust".to_string()); // equal under the predicate: ignored
/// assert_eq!(set.len(), 1);
/// ```
pub struct ComparatorIdentity<T> {
    equivalent: Arc<dyn Fn(&T, &T) -> bool>,
}

impl<T> ComparatorIdentity<T> {
    /// Creates a comparator identity from an equality predicate.
    pub fn new<F>(equivalent: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self {
            equivalent: Arc::new(equivalent),
        }
    }

    /// Applies the equality predicate to a pair of elements.
    #[inline]
    #[must_use]
    pub fn equivalent(&self, stored: &T, candidate: &T) -> bool {
        (self.equivalent)(stored, candidate)
    }
}

impl<T> Clone for ComparatorIdentity<T> {
    fn clone(&self) -> Self {
        Self {
            equivalent: Arc::clone(&self.equivalent),
        }
    }
}

impl<T> Identity<T> for ComparatorIdentity<T> {
    fn find_identity(&self, items: &[T], candidate: &T) -> Option<usize> {
        items
            .iter()
            .position(|element| (self.equivalent)(element, candidate))
    }

    #[inline]
    fn insert_new(&mut self, _items: &[T], _position: usize) {}

    fn remove_at(&mut self, items: &mut Vec<T>, position: usize) {
        items.remove(position);
    }

    #[inline]
    fn clear(&mut self) {}

    #[inline]
    fn reindex(&mut self, _items: &[T]) {}
}
