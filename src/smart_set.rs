//! The `SmartSet` container.
//!
//! This module provides [`SmartSet`], an insertion-ordered collection with
//! set semantics: membership is decided by a pluggable
//! [`Identity`] strategy, and no two stored elements ever share an
//! identity. On top of the set contract the container exposes
//! array-flavored traversal (map/filter/fold), grouping helpers, and full
//! set algebra.
//!
//! # Mutation protocol
//!
//! Each instance carries a mutation discipline fixed at construction:
//! *in-place* (the default) or *copy-on-write*. Every mutating operation
//! resolves its effective mode as call-site override first, instance
//! default second, and reports the outcome through
//! [`Mutation`]: [`Mutation::InPlace`] when the receiver itself was
//! modified, [`Mutation::Fresh`] carrying an independent result container
//! otherwise. A fresh container deep-copies the element sequence and the
//! key index; only the identity function behind its `Arc` is shared.
//!
//! # Examples
//!
//! ```rust
//! use smartset::KeyedSmartSet;
//!
//! let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
//! set.add(1);
//! set.add(2);
//! set.add(1); // duplicate identity: ignored
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.to_vec(), vec![1, 2]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ComparisonError;
use crate::identity::{ComparatorIdentity, Identity, KeyedIdentity};
use crate::mutation::{AddOptions, MutateOptions, Mutation};

/// A `SmartSet` whose identity mechanism is a key-derivation function
/// backed by a position index (O(1)-average membership).
pub type KeyedSmartSet<T, K> = SmartSet<T, KeyedIdentity<T, K>>;

/// A `SmartSet` whose identity mechanism is a pairwise equality predicate
/// (O(n) linear-scan membership).
pub type ComparatorSmartSet<T> = SmartSet<T, ComparatorIdentity<T>>;

/// An insertion-ordered, uniqueness-enforcing collection with pluggable
/// identity and a per-instance mutation discipline.
///
/// # Type Parameters
///
/// * `T` - The element type. Must implement `Clone` (fresh containers and
///   most derived containers hold copies of the elements).
/// * `I` - The [`Identity`] strategy deciding when two elements are "the
///   same". See [`KeyedIdentity`] and [`ComparatorIdentity`].
///
/// # Invariants
///
/// - No two elements in the sequence share an identity.
/// - (Keyed strategy) for every element at position `i`, the key index
///   maps its key to exactly `i`, after every mutating operation.
/// - A copy-on-write instance is never mutated by any operation.
///
/// # Examples
///
/// ```rust
/// use smartset::KeyedSmartSet;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct User {
///     id: u32,
///     name: &'static str,
/// }
///
/// let users = KeyedSmartSet::from_items(
///     [
///         User { id: 1, name: "Alice" },
///         User { id: 2, name: "Bob" },
///         User { id: 1, name: "Alicia" }, // first-seen wins
///     ],
///     smartset::KeyedIdentity::new(|user: &User| user.id),
/// );
///
/// assert_eq!(users.len(), 2);
/// assert_eq!(users.as_slice()[0].name, "Alice");
/// ```
pub struct SmartSet<T, I: Identity<T>> {
    items: Vec<T>,
    identity: I,
    mutable: bool,
}

impl<T: Clone, I: Identity<T>> SmartSet<T, I> {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Creates an empty set with the in-place mutation discipline.
    #[must_use]
    pub fn new(identity: I) -> Self {
        Self::with_mode(identity, true)
    }

    /// Creates an empty set with the copy-on-write discipline: every
    /// mutating call leaves the receiver untouched and returns
    /// [`Mutation::Fresh`].
    #[must_use]
    pub fn new_immutable(identity: I) -> Self {
        Self::with_mode(identity, false)
    }

    fn with_mode(mut identity: I, mutable: bool) -> Self {
        identity.clear();
        Self {
            items: Vec::new(),
            identity,
            mutable,
        }
    }

    /// Bulk-constructs an in-place-mode set, deduplicating as it goes.
    ///
    /// Semantics are identical to sequential [`add`](Self::add) calls: the
    /// first occurrence of each identity wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{KeyedIdentity, SmartSet};
    ///
    /// let set = SmartSet::from_items([3, 1, 4, 1, 5, 9, 2, 6, 5], KeyedIdentity::new(|n: &i32| *n));
    /// assert_eq!(set.to_vec(), vec![3, 1, 4, 5, 9, 2, 6]);
    /// ```
    #[must_use]
    pub fn from_items<Items>(items: Items, identity: I) -> Self
    where
        Items: IntoIterator<Item = T>,
    {
        let mut set = Self::new(identity);
        set.extend_in_place(items);
        set
    }

    /// Bulk-constructs a copy-on-write-mode set.
    ///
    /// The result is populated directly, element by element, rather than
    /// through repeated copy-on-write `add` calls — one container is
    /// built, not one clone per item. Dedup semantics are the same
    /// first-seen-wins rule as [`from_items`](Self::from_items).
    #[must_use]
    pub fn from_items_immutable<Items>(items: Items, identity: I) -> Self
    where
        Items: IntoIterator<Item = T>,
    {
        let mut set = Self::new_immutable(identity);
        set.extend_in_place(items);
        set
    }

    /// Returns `true` if this instance follows the copy-on-write
    /// discipline.
    #[inline]
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        !self.mutable
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the set holds an element sharing `element`'s
    /// identity.
    ///
    /// # Complexity
    ///
    /// O(1) average for the keyed strategy, O(n) for the comparator
    /// strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
    /// set.add(7);
    /// assert!(set.contains(&7));
    /// assert!(!set.contains(&8));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.identity.find_identity(&self.items, element).is_some()
    }

    /// Returns a reference to the stored element sharing `element`'s
    /// identity, if any.
    ///
    /// Useful with the keyed strategy, where a probe value only needs the
    /// key-relevant fields populated.
    #[inline]
    #[must_use]
    pub fn get(&self, element: &T) -> Option<&T> {
        self.identity
            .find_identity(&self.items, element)
            .map(|position| &self.items[position])
    }

    /// Returns the elements as a slice, in current sequence order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns a copy of the elements, in current sequence order.
    #[inline]
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    /// Returns an iterator over references to the elements, in current
    /// sequence order.
    ///
    /// The borrow checker enforces the iteration contract: the set cannot
    /// be mutated while an iterator borrowed from it is alive.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> SmartSetIterator<'_, T> {
        SmartSetIterator {
            inner: self.items.iter(),
        }
    }

    // =========================================================================
    // Mutation protocol
    // =========================================================================

    /// Adds an element under the instance's default options.
    ///
    /// On an identity hit the existing element wins (no replacement) and
    /// the insert is a no-op; on a miss the element is appended. See
    /// [`add_with`](Self::add_with) for the `replace` and `mutable`
    /// overrides.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
    /// set.add(1);
    /// set.add(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, element: T) -> Mutation<Self> {
        self.add_with(element, AddOptions::default())
    }

    /// Adds an element with per-call options.
    ///
    /// `options.replace` (default `false`) controls whether an identity
    /// hit replaces the stored element in place. `options.mutable`
    /// overrides the instance's mutation discipline for this call only.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{AddOptions, KeyedSmartSet};
    ///
    /// #[derive(Clone)]
    /// struct User {
    ///     id: u32,
    ///     name: &'static str,
    /// }
    ///
    /// let mut set = KeyedSmartSet::keyed(|user: &User| user.id);
    /// set.add(User { id: 1, name: "Alice" });
    /// set.add_with(User { id: 1, name: "Alicia" }, AddOptions::new().replace(true));
    ///
    /// assert_eq!(set.len(), 1);
    /// assert_eq!(set.as_slice()[0].name, "Alicia");
    /// ```
    pub fn add_with(&mut self, element: T, options: AddOptions) -> Mutation<Self> {
        let replace = options.replace.unwrap_or(false);
        if self.effective(options.mutable) {
            self.add_in_place(element, replace);
            Mutation::InPlace(())
        } else {
            let mut fresh = self.clone();
            fresh.add_in_place(element, replace);
            Mutation::Fresh(fresh)
        }
    }

    /// Removes the element sharing `element`'s identity, under the
    /// instance's default options.
    ///
    /// With the keyed strategy this is a swap-remove: the last element
    /// fills the freed slot and its index entry is re-pointed, so the
    /// operation is O(1) average but sequence order is not preserved. The
    /// comparator strategy splices and preserves order.
    ///
    /// The in-place path reports whether a matching element was found;
    /// the copy-on-write path returns the clone either way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
    /// set.add(1);
    /// set.add(2);
    /// set.add(3);
    ///
    /// assert_eq!(set.remove(&1).removed(), Some(true));
    /// assert_eq!(set.to_vec(), vec![3, 2]); // swap-remove moved 3 forward
    /// assert_eq!(set.remove(&9).removed(), Some(false));
    /// ```
    pub fn remove(&mut self, element: &T) -> Mutation<Self, bool> {
        self.remove_with(element, MutateOptions::default())
    }

    /// Removes an element with a per-call mutability override.
    pub fn remove_with(&mut self, element: &T, options: MutateOptions) -> Mutation<Self, bool> {
        if self.effective(options.mutable) {
            let found = self.remove_in_place(element);
            Mutation::InPlace(found)
        } else {
            let mut fresh = self.clone();
            fresh.remove_in_place(element);
            Mutation::Fresh(fresh)
        }
    }

    /// Empties the set under the instance's default options.
    pub fn clear(&mut self) -> Mutation<Self> {
        self.clear_with(MutateOptions::default())
    }

    /// Empties the set with a per-call mutability override.
    ///
    /// The copy-on-write path returns a fresh empty set with the same
    /// identity mechanism and discipline; the receiver keeps its contents.
    pub fn clear_with(&mut self, options: MutateOptions) -> Mutation<Self> {
        if self.effective(options.mutable) {
            self.clear_in_place();
            Mutation::InPlace(())
        } else {
            Mutation::Fresh(self.fresh_empty())
        }
    }

    /// Sorts the sequence with a total-order comparator, under the
    /// instance's default options.
    ///
    /// The keyed strategy rebuilds its entire position index afterwards,
    /// since every position may have changed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
    /// set.add(3);
    /// set.add(1);
    /// set.add(2);
    ///
    /// set.sort_by(|a, b| a.cmp(b));
    /// assert_eq!(set.to_vec(), vec![1, 2, 3]);
    /// assert!(set.contains(&3)); // index is consistent after the sort
    /// ```
    pub fn sort_by<F>(&mut self, compare: F) -> Mutation<Self>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.sort_by_with(compare, MutateOptions::default())
    }

    /// Sorts with a total-order comparator and a per-call mutability
    /// override.
    pub fn sort_by_with<F>(&mut self, mut compare: F, options: MutateOptions) -> Mutation<Self>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if self.effective(options.mutable) {
            self.sort_in_place(&mut compare);
            Mutation::InPlace(())
        } else {
            let mut fresh = self.clone();
            fresh.sort_in_place(&mut compare);
            Mutation::Fresh(fresh)
        }
    }

    /// Sorts with a partial comparator, failing cleanly when some pair of
    /// elements cannot be ordered.
    ///
    /// The sort runs on a scratch copy of the sequence first, so a failing
    /// comparator leaves the container — including the key index — exactly
    /// as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError`] if the comparator returns `None` for
    /// any pair it is asked to order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{KeyedSmartSet, MutateOptions};
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &f64| n.to_bits());
    /// set.add(2.0);
    /// set.add(1.0);
    ///
    /// set.try_sort_by(|a, b| a.partial_cmp(b), MutateOptions::default())
    ///     .unwrap();
    /// assert_eq!(set.to_vec(), vec![1.0, 2.0]);
    ///
    /// set.add(f64::NAN);
    /// let result = set.try_sort_by(|a, b| a.partial_cmp(b), MutateOptions::default());
    /// assert!(result.is_err());
    /// assert_eq!(set.as_slice()[0], 1.0); // untouched by the failed sort
    /// ```
    pub fn try_sort_by<F>(
        &mut self,
        compare: F,
        options: MutateOptions,
    ) -> Result<Mutation<Self>, ComparisonError>
    where
        F: Fn(&T, &T) -> Option<Ordering>,
    {
        let mut incomparable = false;
        let mut scratch = self.items.clone();
        scratch.sort_by(|left, right| {
            compare(left, right).unwrap_or_else(|| {
                incomparable = true;
                Ordering::Equal
            })
        });
        if incomparable {
            return Err(ComparisonError {
                operation: "try_sort_by",
            });
        }

        if self.effective(options.mutable) {
            self.items = scratch;
            self.identity.reindex(&self.items);
            Ok(Mutation::InPlace(()))
        } else {
            let mut fresh = self.fresh_empty();
            fresh.items = scratch;
            fresh.identity.reindex(&fresh.items);
            Ok(Mutation::Fresh(fresh))
        }
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Returns the union of this set with another.
    ///
    /// Elements of `other` not already present (by this set's identity)
    /// are appended in `other`'s order. In-place mode accumulates into the
    /// receiver; copy-on-write mode accumulates into a clone. Earlier-seen
    /// elements always win over later duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{KeyedIdentity, SmartSet};
    ///
    /// let mut left = SmartSet::from_items([1, 2], KeyedIdentity::new(|n: &i32| *n));
    /// let right = SmartSet::from_items([2, 3], KeyedIdentity::new(|n: &i32| *n));
    ///
    /// left.union(&right);
    /// assert_eq!(left.to_vec(), vec![1, 2, 3]);
    /// ```
    pub fn union<J: Identity<T>>(&mut self, other: &SmartSet<T, J>) -> Mutation<Self> {
        if self.mutable {
            self.extend_in_place(other.as_slice().iter().cloned());
            Mutation::InPlace(())
        } else {
            let mut fresh = self.clone();
            fresh.extend_in_place(other.as_slice().iter().cloned());
            Mutation::Fresh(fresh)
        }
    }

    /// Returns the intersection of this set with another: the elements of
    /// self also present in `other` (by `other`'s membership test).
    ///
    /// **In-place mode is destructive**: the receiver is cleared and then
    /// repopulated with the result, as two explicit steps. This mirrors
    /// the original contract of the container; use a copy-on-write
    /// instance (or [`filtered_intersection`](Self::filtered_intersection)
    /// with an always-true predicate) when the receiver must survive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{KeyedIdentity, SmartSet};
    ///
    /// let mut left = SmartSet::from_items([1, 2, 3], KeyedIdentity::new(|n: &i32| *n));
    /// let right = SmartSet::from_items([2, 3, 4], KeyedIdentity::new(|n: &i32| *n));
    ///
    /// left.intersection(&right);
    /// assert_eq!(left.to_vec(), vec![2, 3]); // receiver replaced with the result
    /// ```
    pub fn intersection<J: Identity<T>>(&mut self, other: &SmartSet<T, J>) -> Mutation<Self> {
        let mut result = self.fresh_empty();
        for element in &self.items {
            if other.contains(element) {
                result.add_in_place(element.clone(), false);
            }
        }
        self.resolve_destructive(result)
    }

    /// Returns the difference of this set with another: the elements of
    /// self NOT present in `other`.
    ///
    /// Follows the same destructive clear-then-repopulate policy as
    /// [`intersection`](Self::intersection) when the receiver is in
    /// in-place mode.
    pub fn difference<J: Identity<T>>(&mut self, other: &SmartSet<T, J>) -> Mutation<Self> {
        let mut result = self.fresh_empty();
        for element in &self.items {
            if !other.contains(element) {
                result.add_in_place(element.clone(), false);
            }
        }
        self.resolve_destructive(result)
    }

    /// Returns the symmetric difference: elements in exactly one of the
    /// two sets. Always a fresh container; neither operand is mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{KeyedIdentity, SmartSet};
    ///
    /// let left = SmartSet::from_items([1, 2], KeyedIdentity::new(|n: &i32| *n));
    /// let right = SmartSet::from_items([2, 3], KeyedIdentity::new(|n: &i32| *n));
    ///
    /// let exclusive = left.symmetric_difference(&right);
    /// assert_eq!(exclusive.to_vec(), vec![1, 3]);
    /// ```
    #[must_use]
    pub fn symmetric_difference<J: Identity<T>>(&self, other: &SmartSet<T, J>) -> Self {
        let mut result = self.fresh_empty();
        for element in &self.items {
            if !other.contains(element) {
                result.add_in_place(element.clone(), false);
            }
        }
        for element in other.as_slice() {
            if !self.contains(element) {
                result.add_in_place(element.clone(), false);
            }
        }
        result
    }

    /// Alias for [`symmetric_difference`](Self::symmetric_difference).
    #[must_use]
    pub fn xor<J: Identity<T>>(&self, other: &SmartSet<T, J>) -> Self {
        self.symmetric_difference(other)
    }

    /// Alias for [`difference`](Self::difference): the set without the
    /// given elements.
    pub fn without<J: Identity<T>>(&mut self, other: &SmartSet<T, J>) -> Mutation<Self> {
        self.difference(other)
    }

    /// Alias for [`intersection`](Self::intersection): the set restricted
    /// to the given elements.
    pub fn with_only<J: Identity<T>>(&mut self, other: &SmartSet<T, J>) -> Mutation<Self> {
        self.intersection(other)
    }

    /// Returns a fresh set of the elements present in both sets that also
    /// satisfy `predicate`. Never mutates either operand.
    #[must_use]
    pub fn filtered_intersection<J, F>(&self, other: &SmartSet<T, J>, mut predicate: F) -> Self
    where
        J: Identity<T>,
        F: FnMut(&T) -> bool,
    {
        let mut result = self.fresh_empty();
        for element in &self.items {
            if other.contains(element) && predicate(element) {
                result.add_in_place(element.clone(), false);
            }
        }
        result
    }

    /// Returns `true` if every element of this set is present in `other`.
    #[must_use]
    pub fn is_subset_of<J: Identity<T>>(&self, other: &SmartSet<T, J>) -> bool {
        self.items.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is present in this set.
    #[must_use]
    pub fn is_superset_of<J: Identity<T>>(&self, other: &SmartSet<T, J>) -> bool {
        other.is_subset_of(self)
    }

    /// Returns `true` if the two sets share at least one element.
    /// Short-circuits on the first match.
    #[must_use]
    pub fn overlaps<J: Identity<T>>(&self, other: &SmartSet<T, J>) -> bool {
        self.items.iter().any(|element| other.contains(element))
    }

    // =========================================================================
    // Traversal & functional views
    // =========================================================================

    /// Calls `action` once per element, in sequence order.
    pub fn for_each<F: FnMut(&T)>(&self, action: F) {
        self.items.iter().for_each(action);
    }

    /// Returns the results of applying `transform` to every element.
    #[must_use]
    pub fn map<U, F: FnMut(&T) -> U>(&self, transform: F) -> Vec<U> {
        self.items.iter().map(transform).collect()
    }

    /// Returns copies of the elements satisfying `predicate`.
    ///
    /// See [`reject`](Self::reject) for the inverse that rebuilds a
    /// container instead of a `Vec`.
    #[must_use]
    pub fn filter<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Vec<T> {
        self.items
            .iter()
            .filter(|element| predicate(element))
            .cloned()
            .collect()
    }

    /// Returns the first element satisfying `predicate`, if any.
    #[must_use]
    pub fn find<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Option<&T> {
        self.items.iter().find(|element| predicate(element))
    }

    /// Returns `true` if at least one element satisfies `predicate`.
    #[must_use]
    pub fn any<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> bool {
        self.items.iter().any(|element| predicate(element))
    }

    /// Returns `true` if every element satisfies `predicate`.
    #[must_use]
    pub fn all<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> bool {
        self.items.iter().all(|element| predicate(element))
    }

    /// Folds every element into an accumulator, in sequence order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
    /// set.add(1);
    /// set.add(2);
    /// set.add(3);
    ///
    /// assert_eq!(set.fold(0, |sum, n| sum + n), 6);
    /// ```
    #[must_use]
    pub fn fold<U, F: FnMut(U, &T) -> U>(&self, initial: U, combine: F) -> U {
        self.items.iter().fold(initial, combine)
    }

    /// Maps each element to zero or more outputs and accumulates them all
    /// into one fresh container under a newly supplied identity.
    ///
    /// The output type may differ from the input type; the result inherits
    /// this set's mutation discipline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::{KeyedIdentity, KeyedSmartSet};
    ///
    /// let mut sentences = KeyedSmartSet::keyed(|s: &&str| *s);
    /// sentences.add("a b");
    /// sentences.add("b c");
    ///
    /// let words = sentences.flat_map(
    ///     |sentence| sentence.split(' ').collect::<Vec<_>>(),
    ///     KeyedIdentity::new(|word: &&str| *word),
    /// );
    /// assert_eq!(words.to_vec(), vec!["a", "b", "c"]);
    /// ```
    #[must_use]
    pub fn flat_map<U, J, F, Outputs>(&self, transform: F, identity: J) -> SmartSet<U, J>
    where
        U: Clone,
        J: Identity<U>,
        F: FnMut(&T) -> Outputs,
        Outputs: IntoIterator<Item = U>,
    {
        self.flat_map_with(transform, identity, MutateOptions::default())
    }

    /// [`flat_map`](Self::flat_map) with a mutability override for the
    /// resulting container.
    #[must_use]
    pub fn flat_map_with<U, J, F, Outputs>(
        &self,
        mut transform: F,
        identity: J,
        options: MutateOptions,
    ) -> SmartSet<U, J>
    where
        U: Clone,
        J: Identity<U>,
        F: FnMut(&T) -> Outputs,
        Outputs: IntoIterator<Item = U>,
    {
        let mut result =
            SmartSet::with_mode(identity, options.mutable.unwrap_or(self.mutable));
        for element in &self.items {
            for mapped in transform(element) {
                result.add_in_place(mapped, false);
            }
        }
        result
    }

    /// Partitions the elements into per-key containers.
    ///
    /// The returned pairs preserve first-seen key order; each group
    /// preserves within-group insertion order and carries this set's
    /// identity mechanism and discipline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
    /// for n in [1, 2, 3, 4, 5] {
    ///     set.add(n);
    /// }
    ///
    /// let by_parity = set.group_by(|n| n % 2);
    /// assert_eq!(by_parity[0].0, 1); // odd seen first
    /// assert_eq!(by_parity[0].1.to_vec(), vec![1, 3, 5]);
    /// assert_eq!(by_parity[1].1.to_vec(), vec![2, 4]);
    /// ```
    #[must_use]
    pub fn group_by<G, F>(&self, mut grouping: F) -> Vec<(G, Self)>
    where
        G: Clone + Eq + Hash,
        F: FnMut(&T) -> G,
    {
        let mut groups: Vec<(G, Self)> = Vec::new();
        let mut positions: FxHashMap<G, usize> = FxHashMap::default();

        for element in &self.items {
            let group_key = grouping(element);
            let position = if let Some(&existing) = positions.get(&group_key) {
                existing
            } else {
                groups.push((group_key.clone(), self.fresh_empty()));
                positions.insert(group_key, groups.len() - 1);
                groups.len() - 1
            };
            groups[position].1.add_in_place(element.clone(), false);
        }

        groups
    }

    /// Splits the elements into exactly two containers:
    /// `(matching, non_matching)`, each preserving original relative
    /// order.
    #[must_use]
    pub fn partition<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> (Self, Self) {
        let mut matching = self.fresh_empty();
        let mut non_matching = self.fresh_empty();
        for element in &self.items {
            let target = if predicate(element) {
                &mut matching
            } else {
                &mut non_matching
            };
            target.add_in_place(element.clone(), false);
        }
        (matching, non_matching)
    }

    /// The inverse of [`filter`](Self::filter): a fresh container, rebuilt
    /// from scratch with this set's identity and discipline, holding only
    /// the elements that do NOT satisfy `predicate`.
    #[must_use]
    pub fn reject<F: FnMut(&T) -> bool>(&self, mut predicate: F) -> Self {
        let mut result = self.fresh_empty();
        for element in &self.items {
            if !predicate(element) {
                result.add_in_place(element.clone(), false);
            }
        }
        result
    }

    /// Deduplicates by a secondary key, independent of the container's own
    /// identity mechanism. First occurrence of each secondary key wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smartset::KeyedSmartSet;
    ///
    /// let mut words = KeyedSmartSet::keyed(|w: &&str| *w);
    /// for word in ["apple", "avocado", "banana"] {
    ///     words.add(word);
    /// }
    ///
    /// let by_initial = words.unique_by(|w| w.chars().next());
    /// assert_eq!(by_initial.to_vec(), vec!["apple", "banana"]);
    /// ```
    #[must_use]
    pub fn unique_by<G, F>(&self, mut secondary_key: F) -> Self
    where
        G: Eq + Hash,
        F: FnMut(&T) -> G,
    {
        let mut seen: FxHashSet<G> = FxHashSet::default();
        let mut result = self.fresh_empty();
        for element in &self.items {
            if seen.insert(secondary_key(element)) {
                result.add_in_place(element.clone(), false);
            }
        }
        result
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resolves the effective mutability: call-site override first,
    /// instance default second.
    const fn effective(&self, override_flag: Option<bool>) -> bool {
        match override_flag {
            Some(flag) => flag,
            None => self.mutable,
        }
    }

    /// An empty set with this set's identity mechanism (bookkeeping
    /// cleared) and mutation discipline.
    fn fresh_empty(&self) -> Self {
        let mut identity = self.identity.clone();
        identity.clear();
        Self {
            items: Vec::new(),
            identity,
            mutable: self.mutable,
        }
    }

    fn add_in_place(&mut self, element: T, replace: bool) {
        match self.identity.find_identity(&self.items, &element) {
            Some(position) => {
                if replace {
                    self.items[position] = element;
                }
            }
            None => {
                self.items.push(element);
                let position = self.items.len() - 1;
                self.identity.insert_new(&self.items, position);
            }
        }
    }

    fn remove_in_place(&mut self, element: &T) -> bool {
        match self.identity.find_identity(&self.items, element) {
            Some(position) => {
                self.identity.remove_at(&mut self.items, position);
                true
            }
            None => false,
        }
    }

    fn clear_in_place(&mut self) {
        self.items.clear();
        self.identity.clear();
    }

    fn sort_in_place<F: FnMut(&T, &T) -> Ordering>(&mut self, compare: &mut F) {
        self.items.sort_by(|left, right| compare(left, right));
        self.identity.reindex(&self.items);
    }

    fn extend_in_place<Items: IntoIterator<Item = T>>(&mut self, items: Items) {
        for element in items {
            self.add_in_place(element, false);
        }
    }

    /// Applies the destructive policy shared by `intersection` and
    /// `difference`: on the in-place path, clear the receiver, then
    /// bulk-insert the result's contents; on the copy-on-write path,
    /// return the result untouched.
    fn resolve_destructive(&mut self, result: Self) -> Mutation<Self> {
        if self.mutable {
            self.clear_in_place();
            self.extend_in_place(result.items);
            Mutation::InPlace(())
        } else {
            Mutation::Fresh(result)
        }
    }
}

impl<T: Clone, K: Clone + Eq + Hash> SmartSet<T, KeyedIdentity<T, K>> {
    /// Creates an empty in-place-mode set keyed by `key_of`.
    ///
    /// Shorthand for `SmartSet::new(KeyedIdentity::new(key_of))`.
    #[must_use]
    pub fn keyed<F>(key_of: F) -> Self
    where
        F: Fn(&T) -> K + 'static,
    {
        Self::new(KeyedIdentity::new(key_of))
    }

    /// Creates an empty copy-on-write-mode set keyed by `key_of`.
    #[must_use]
    pub fn keyed_immutable<F>(key_of: F) -> Self
    where
        F: Fn(&T) -> K + 'static,
    {
        Self::new_immutable(KeyedIdentity::new(key_of))
    }
}

impl<T: Clone> SmartSet<T, ComparatorIdentity<T>> {
    /// Creates an empty in-place-mode set deduplicated by the pairwise
    /// equality predicate `equivalent`.
    ///
    /// Shorthand for `SmartSet::new(ComparatorIdentity::new(equivalent))`.
    #[must_use]
    pub fn comparing<F>(equivalent: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self::new(ComparatorIdentity::new(equivalent))
    }

    /// Creates an empty copy-on-write-mode set deduplicated by the
    /// pairwise equality predicate `equivalent`.
    #[must_use]
    pub fn comparing_immutable<F>(equivalent: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self::new_immutable(ComparatorIdentity::new(equivalent))
    }
}

/// Deep copy: the element sequence and all identity bookkeeping are
/// independently owned; only the identity function itself is shared.
impl<T: Clone, I: Identity<T>> Clone for SmartSet<T, I> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            identity: self.identity.clone(),
            mutable: self.mutable,
        }
    }
}

impl<T: fmt::Debug, I: Identity<T>> fmt::Debug for SmartSet<T, I> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.items.iter()).finish()
    }
}

impl<T: fmt::Display, I: Identity<T>> fmt::Display for SmartSet<T, I> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for element in &self.items {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "}}")
    }
}

/// Set equality: same size and mutual membership, independent of
/// insertion order. The two operands may use different identity
/// strategies; each side's membership is tested with `other`'s mechanism,
/// matching the behavior of the binary algebra operations.
impl<T: Clone, I: Identity<T>, J: Identity<T>> PartialEq<SmartSet<T, J>> for SmartSet<T, I> {
    fn eq(&self, other: &SmartSet<T, J>) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }
}

impl<T: Clone, I: Identity<T>> Eq for SmartSet<T, I> {}

/// Iterator over references to the elements of a [`SmartSet`], in
/// sequence order.
pub struct SmartSetIterator<'a, T> {
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for SmartSetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for SmartSetIterator<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Owning iterator over the elements of a [`SmartSet`], in sequence
/// order.
pub struct SmartSetIntoIterator<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Iterator for SmartSetIntoIterator<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for SmartSetIntoIterator<T> {
    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a, T: Clone, I: Identity<T>> IntoIterator for &'a SmartSet<T, I> {
    type Item = &'a T;
    type IntoIter = SmartSetIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone, I: Identity<T>> IntoIterator for SmartSet<T, I> {
    type Item = T;
    type IntoIter = SmartSetIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        SmartSetIntoIterator {
            inner: self.items.into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn numbers(elements: &[i32]) -> KeyedSmartSet<i32, i32> {
        SmartSet::from_items(elements.iter().copied(), KeyedIdentity::new(|n: &i32| *n))
    }

    fn numbers_immutable(elements: &[i32]) -> KeyedSmartSet<i32, i32> {
        SmartSet::from_items_immutable(elements.iter().copied(), KeyedIdentity::new(|n: &i32| *n))
    }

    #[rstest]
    fn test_new_creates_empty_mutable_set() {
        let set = KeyedSmartSet::keyed(|n: &i32| *n);
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.is_immutable());
    }

    #[rstest]
    fn test_new_immutable_flags_discipline() {
        let set = KeyedSmartSet::keyed_immutable(|n: &i32| *n);
        assert!(set.is_immutable());
    }

    #[rstest]
    fn test_from_items_first_seen_wins() {
        let set = numbers(&[3, 1, 3, 2, 1]);
        assert_eq!(set.to_vec(), vec![3, 1, 2]);
    }

    #[rstest]
    fn test_from_items_immutable_populates_directly() {
        let set = numbers_immutable(&[1, 2, 2, 3]);
        assert!(set.is_immutable());
        assert_eq!(set.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_add_appends_and_indexes() {
        let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
        set.add(5);
        set.add(7);
        assert!(set.contains(&5));
        assert!(set.contains(&7));
        assert_eq!(set.to_vec(), vec![5, 7]);
    }

    #[rstest]
    fn test_add_duplicate_is_noop_without_replace() {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair(i32, &'static str);

        let mut set = KeyedSmartSet::keyed(|pair: &Pair| pair.0);
        set.add(Pair(1, "first"));
        set.add(Pair(1, "second"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].1, "first");
    }

    #[rstest]
    fn test_add_with_replace_swaps_stored_element() {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair(i32, &'static str);

        let mut set = KeyedSmartSet::keyed(|pair: &Pair| pair.0);
        set.add(Pair(1, "first"));
        set.add_with(Pair(1, "second"), AddOptions::new().replace(true));

        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].1, "second");
    }

    #[rstest]
    fn test_add_copy_on_write_leaves_receiver_untouched() {
        let mut set = numbers_immutable(&[1]);
        let extended = set.add(2).unwrap_fresh();

        assert_eq!(set.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(extended.is_immutable());
    }

    #[rstest]
    fn test_add_with_mutable_override_mutates_immutable_instance() {
        let mut set = numbers_immutable(&[1]);
        let outcome = set.add_with(2, AddOptions::new().mutable(true));

        assert!(outcome.is_in_place());
        assert_eq!(set.len(), 2);
    }

    #[rstest]
    fn test_remove_swap_remove_relocates_last_element() {
        let mut set = numbers(&[1, 2, 3, 4]);
        assert_eq!(set.remove(&2).removed(), Some(true));

        assert_eq!(set.to_vec(), vec![1, 4, 3]);
        // Index must still resolve every element after the relocation.
        for n in [1, 3, 4] {
            assert!(set.contains(&n));
        }
        assert!(!set.contains(&2));
    }

    #[rstest]
    fn test_remove_absent_reports_false() {
        let mut set = numbers(&[1]);
        assert_eq!(set.remove(&9).removed(), Some(false));
        assert_eq!(set.len(), 1);
    }

    #[rstest]
    fn test_remove_copy_on_write_returns_clone_even_on_miss() {
        let mut set = numbers_immutable(&[1, 2]);
        let clone = set.remove(&9).unwrap_fresh();

        assert_eq!(clone.len(), 2);
        assert_eq!(set.len(), 2);
    }

    #[rstest]
    fn test_clear_empties_sequence_and_index() {
        let mut set = numbers(&[1, 2, 3]);
        set.clear();

        assert!(set.is_empty());
        assert!(!set.contains(&1));
        set.add(1);
        assert_eq!(set.to_vec(), vec![1]);
    }

    #[rstest]
    fn test_clear_with_override_returns_fresh_and_keeps_receiver() {
        let mut set = numbers(&[1, 2]);
        let fresh = set
            .clear_with(MutateOptions::new().mutable(false))
            .unwrap_fresh();

        assert!(fresh.is_empty());
        assert_eq!(set.len(), 2);
    }

    #[rstest]
    fn test_sort_by_reorders_and_reindexes() {
        let mut set = numbers(&[3, 1, 2]);
        set.sort_by(|a, b| a.cmp(b));

        assert_eq!(set.to_vec(), vec![1, 2, 3]);
        // A remove after the sort exercises the rebuilt index.
        set.remove(&1);
        assert_eq!(set.to_vec(), vec![3, 2]);
        assert!(set.contains(&2) && set.contains(&3));
    }

    #[rstest]
    fn test_sort_by_copy_on_write_sorts_clone_only() {
        let mut set = numbers_immutable(&[3, 1, 2]);
        let sorted = set.sort_by(|a, b| a.cmp(b)).unwrap_fresh();

        assert_eq!(set.to_vec(), vec![3, 1, 2]);
        assert_eq!(sorted.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_try_sort_by_failure_is_atomic() {
        let mut set = KeyedSmartSet::keyed(|n: &f64| n.to_bits());
        set.add(2.5);
        set.add(f64::NAN);
        set.add(1.5);
        let before = set.len();

        let result = set.try_sort_by(|a, b| a.partial_cmp(b), MutateOptions::default());

        assert_eq!(
            result.unwrap_err(),
            ComparisonError {
                operation: "try_sort_by"
            }
        );
        assert_eq!(set.len(), before);
        assert_eq!(set.as_slice()[0], 2.5);
        assert!(set.contains(&1.5)); // index untouched
    }

    #[rstest]
    fn test_try_sort_by_success_reindexes() {
        let mut set = numbers(&[2, 1]);
        let outcome = set
            .try_sort_by(|a, b| a.partial_cmp(b), MutateOptions::default())
            .unwrap();

        assert!(outcome.is_in_place());
        assert_eq!(set.to_vec(), vec![1, 2]);
        assert!(set.contains(&2));
    }

    #[rstest]
    fn test_union_accumulates_into_mutable_receiver() {
        let mut left = numbers(&[1, 2]);
        let right = numbers(&[2, 3]);

        let outcome = left.union(&right);

        assert!(outcome.is_in_place());
        assert_eq!(left.to_vec(), vec![1, 2, 3]);
        assert_eq!(right.to_vec(), vec![2, 3]);
    }

    #[rstest]
    fn test_union_copy_on_write_clones_receiver() {
        let mut left = numbers_immutable(&[1, 2]);
        let right = numbers(&[2, 3]);

        let union = left.union(&right).unwrap_fresh();

        assert_eq!(left.len(), 2);
        assert_eq!(union.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_intersection_is_destructive_on_mutable_receiver() {
        let mut left = numbers(&[1, 2, 3]);
        let right = numbers(&[2, 3, 4]);

        let outcome = left.intersection(&right);

        assert!(outcome.is_in_place());
        assert_eq!(left.to_vec(), vec![2, 3]);
    }

    #[rstest]
    fn test_difference_is_destructive_on_mutable_receiver() {
        let mut left = numbers(&[1, 2, 3]);
        let right = numbers(&[2, 3]);

        left.difference(&right);

        assert_eq!(left.to_vec(), vec![1]);
    }

    #[rstest]
    fn test_intersection_copy_on_write_preserves_receiver() {
        let mut left = numbers_immutable(&[1, 2, 3]);
        let right = numbers(&[2, 4]);

        let intersection = left.intersection(&right).unwrap_fresh();

        assert_eq!(left.len(), 3);
        assert_eq!(intersection.to_vec(), vec![2]);
    }

    #[rstest]
    fn test_symmetric_difference_never_mutates() {
        let left = numbers(&[1, 2]);
        let right = numbers(&[2, 3]);

        let exclusive = left.symmetric_difference(&right);

        assert_eq!(exclusive.to_vec(), vec![1, 3]);
        assert_eq!(left.to_vec(), vec![1, 2]);
        assert_eq!(right.to_vec(), vec![2, 3]);
        assert_eq!(left.xor(&right), exclusive);
    }

    #[rstest]
    fn test_aliases_match_their_operations() {
        let mut without_receiver = numbers_immutable(&[1, 2, 3]);
        let mut difference_receiver = numbers_immutable(&[1, 2, 3]);
        let other = numbers(&[2]);

        assert_eq!(
            without_receiver.without(&other).unwrap_fresh(),
            difference_receiver.difference(&other).unwrap_fresh()
        );

        let mut with_only_receiver = numbers_immutable(&[1, 2, 3]);
        let restricted = with_only_receiver.with_only(&other).unwrap_fresh();
        assert_eq!(restricted.to_vec(), vec![2]);
    }

    #[rstest]
    fn test_filtered_intersection_applies_predicate() {
        let left = numbers(&[1, 2, 3, 4]);
        let right = numbers(&[2, 3, 4, 5]);

        let even_common = left.filtered_intersection(&right, |n| n % 2 == 0);

        assert_eq!(even_common.to_vec(), vec![2, 4]);
        assert_eq!(left.to_vec(), vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn test_subset_superset_overlaps() {
        let small = numbers(&[1, 2]);
        let large = numbers(&[1, 2, 3]);
        let disjoint = numbers(&[9]);

        assert!(small.is_subset_of(&large));
        assert!(!large.is_subset_of(&small));
        assert!(large.is_superset_of(&small));
        assert!(small.overlaps(&large));
        assert!(!small.overlaps(&disjoint));
    }

    #[rstest]
    fn test_equality_is_order_independent() {
        let forward = numbers(&[1, 2]);
        let backward = numbers(&[2, 1]);
        let different = numbers(&[1, 3]);

        assert_eq!(forward, backward);
        assert_ne!(forward, different);
    }

    #[rstest]
    fn test_equality_across_identity_strategies() {
        let keyed = numbers(&[1, 2]);
        let compared =
            SmartSet::from_items([2, 1], ComparatorIdentity::new(|a: &i32, b: &i32| a == b));

        assert_eq!(keyed, compared);
    }

    #[rstest]
    fn test_comparator_variant_preserves_order_on_remove() {
        let mut set = SmartSet::from_items(
            [1, 2, 3, 4],
            ComparatorIdentity::new(|a: &i32, b: &i32| a == b),
        );

        set.remove(&2);

        assert_eq!(set.to_vec(), vec![1, 3, 4]);
    }

    #[rstest]
    fn test_comparator_variant_dedups_by_predicate() {
        let mut set = ComparatorSmartSet::comparing(|a: &String, b: &String| {
            a.eq_ignore_ascii_case(b)
        });
        set.add("Rust".to_string());
        set.add("RUST".to_string());
        set.add("Go".to_string());

        assert_eq!(set.len(), 2);
        assert!(set.contains(&"rust".to_string()));
    }

    #[rstest]
    fn test_get_returns_stored_element() {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair(i32, &'static str);

        let mut set = KeyedSmartSet::keyed(|pair: &Pair| pair.0);
        set.add(Pair(1, "stored"));

        assert_eq!(set.get(&Pair(1, "probe")), Some(&Pair(1, "stored")));
        assert_eq!(set.get(&Pair(2, "probe")), None);
    }

    #[rstest]
    fn test_traversal_helpers() {
        let set = numbers(&[1, 2, 3, 4]);

        assert_eq!(set.map(|n| n * 10), vec![10, 20, 30, 40]);
        assert_eq!(set.filter(|n| n % 2 == 0), vec![2, 4]);
        assert_eq!(set.find(|n| *n > 2), Some(&3));
        assert!(set.any(|n| *n == 4));
        assert!(!set.all(|n| *n > 1));
        assert_eq!(set.fold(0, |sum, n| sum + n), 10);

        let mut visited = Vec::new();
        set.for_each(|n| visited.push(*n));
        assert_eq!(visited, vec![1, 2, 3, 4]);
    }

    #[rstest]
    fn test_flat_map_changes_element_type_and_dedups() {
        let set = numbers(&[1, 2]);

        let doubled_strings = set.flat_map(
            |n| vec![n.to_string(), n.to_string()],
            KeyedIdentity::new(|s: &String| s.clone()),
        );

        assert_eq!(doubled_strings.to_vec(), vec!["1".to_string(), "2".to_string()]);
        assert!(!doubled_strings.is_immutable());
    }

    #[rstest]
    fn test_flat_map_with_overrides_result_discipline() {
        let set = numbers(&[1]);
        let result = set.flat_map_with(
            |n| [*n],
            KeyedIdentity::new(|n: &i32| *n),
            MutateOptions::new().mutable(false),
        );
        assert!(result.is_immutable());
    }

    #[rstest]
    fn test_group_by_preserves_first_seen_key_order() {
        let set = numbers(&[5, 2, 7, 4, 9]);
        let groups = set.group_by(|n| n % 2);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 1);
        assert_eq!(groups[0].1.to_vec(), vec![5, 7, 9]);
        assert_eq!(groups[1].0, 0);
        assert_eq!(groups[1].1.to_vec(), vec![2, 4]);
    }

    #[rstest]
    fn test_partition_splits_in_order() {
        let set = numbers(&[1, 2, 3, 4, 5]);
        let (even, odd) = set.partition(|n| n % 2 == 0);

        assert_eq!(even.to_vec(), vec![2, 4]);
        assert_eq!(odd.to_vec(), vec![1, 3, 5]);
    }

    #[rstest]
    fn test_reject_is_inverse_of_filter() {
        let set = numbers(&[1, 2, 3, 4]);
        let rejected = set.reject(|n| n % 2 == 0);

        assert_eq!(rejected.to_vec(), vec![1, 3]);
        assert_eq!(rejected.len() + set.filter(|n| n % 2 == 0).len(), set.len());
    }

    #[rstest]
    fn test_unique_by_secondary_key_first_wins() {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair(i32, &'static str);

        let set = SmartSet::from_items(
            [Pair(1, "a"), Pair(2, "a"), Pair(3, "b")],
            KeyedIdentity::new(|pair: &Pair| pair.0),
        );

        let by_label = set.unique_by(|pair| pair.1);
        assert_eq!(by_label.to_vec(), vec![Pair(1, "a"), Pair(3, "b")]);
    }

    #[rstest]
    fn test_iteration_yields_sequence_order() {
        let set = numbers(&[3, 1, 2]);

        let borrowed: Vec<i32> = set.iter().copied().collect();
        assert_eq!(borrowed, vec![3, 1, 2]);
        assert_eq!(set.iter().len(), 3);

        let owned: Vec<i32> = set.into_iter().collect();
        assert_eq!(owned, vec![3, 1, 2]);
    }

    #[rstest]
    fn test_debug_and_display_render_all_elements() {
        let set = numbers(&[1, 2]);
        assert_eq!(format!("{set:?}"), "{1, 2}");
        assert_eq!(format!("{set}"), "{1, 2}");
    }

    #[rstest]
    fn test_clone_is_deep() {
        let original = numbers(&[1, 2]);
        let mut cloned = original.clone();
        cloned.add(3);
        cloned.remove(&1);

        assert_eq!(original.to_vec(), vec![1, 2]);
        assert!(original.contains(&1));
    }
}
