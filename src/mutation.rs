//! The mutation protocol: per-call options and operation outcomes.
//!
//! Every mutating operation on a [`SmartSet`](crate::SmartSet) resolves an
//! *effective* mutability mode — the call-site override when one is given,
//! the instance default otherwise — and reports what it did through
//! [`Mutation`]:
//!
//! - [`Mutation::InPlace`]: the receiver itself was mutated (in-place
//!   discipline). For `remove` this carries the membership signal.
//! - [`Mutation::Fresh`]: copy-on-write discipline; the receiver was left
//!   untouched and the variant carries the independent result container.
//!
//! # Examples
//!
//! ```rust
//! use smartset::{KeyedSmartSet, MutateOptions};
//!
//! let mut set = KeyedSmartSet::keyed(|n: &i32| *n);
//! set.add(1);
//!
//! // Instance default is in-place; override this one call to copy-on-write.
//! let snapshot = set
//!     .clear_with(MutateOptions::new().mutable(false))
//!     .unwrap_fresh();
//! assert!(snapshot.is_empty());
//! assert_eq!(set.len(), 1); // receiver untouched
//! ```

/// Options accepted by [`add_with`](crate::SmartSet::add_with).
///
/// Unset fields fall back to the operation defaults: `replace` defaults to
/// `false` (first-seen element wins on an identity hit) and `mutable`
/// defaults to the instance's mutation discipline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// When `true`, an identity hit replaces the stored element in place.
    pub replace: Option<bool>,
    /// Per-call override of the instance's mutation discipline.
    pub mutable: Option<bool>,
}

impl AddOptions {
    /// Creates options with every field unset.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            replace: None,
            mutable: None,
        }
    }

    /// Sets the `replace` override.
    #[inline]
    #[must_use]
    pub const fn replace(mut self, replace: bool) -> Self {
        self.replace = Some(replace);
        self
    }

    /// Sets the `mutable` override.
    #[inline]
    #[must_use]
    pub const fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = Some(mutable);
        self
    }
}

/// Options accepted by the mutating operations that only take a
/// mutability override (`remove_with`, `clear_with`, `sort_by_with`,
/// `try_sort_by`, `flat_map_with`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutateOptions {
    /// Per-call override of the instance's mutation discipline.
    pub mutable: Option<bool>,
}

impl MutateOptions {
    /// Creates options with the override unset.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { mutable: None }
    }

    /// Sets the `mutable` override.
    #[inline]
    #[must_use]
    pub const fn mutable(mut self, mutable: bool) -> Self {
        self.mutable = Some(mutable);
        self
    }
}

/// The outcome of a mutating operation.
///
/// `S` is the container type; `R` is the in-place report value (`()` for
/// most operations, `bool` for `remove`, which reports whether a matching
/// element was found on the in-place fast path).
///
/// Call sites operating under the copy-on-write discipline must consume
/// the [`Fresh`](Self::Fresh) value — dropping it discards the result of
/// the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<S, R = ()> {
    /// The receiver was mutated in place.
    InPlace(R),
    /// The receiver was untouched; this value holds the result container.
    Fresh(S),
}

impl<S, R> Mutation<S, R> {
    /// Returns `true` if the receiver was mutated in place.
    #[inline]
    #[must_use]
    pub const fn is_in_place(&self) -> bool {
        matches!(self, Self::InPlace(_))
    }

    /// Returns `true` if the operation produced a fresh container.
    #[inline]
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }

    /// Returns the fresh container, or `None` if the receiver was mutated
    /// in place.
    #[inline]
    #[must_use]
    pub fn fresh(self) -> Option<S> {
        match self {
            Self::InPlace(_) => None,
            Self::Fresh(set) => Some(set),
        }
    }

    /// Returns the in-place report value, or `None` if the operation
    /// produced a fresh container.
    #[inline]
    #[must_use]
    pub fn in_place(self) -> Option<R> {
        match self {
            Self::InPlace(report) => Some(report),
            Self::Fresh(_) => None,
        }
    }

    /// Returns the fresh container.
    ///
    /// # Panics
    ///
    /// Panics if the receiver was mutated in place. Intended for call
    /// sites that know the effective mode was copy-on-write.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn unwrap_fresh(self) -> S {
        match self {
            Self::InPlace(_) => {
                panic!("called `Mutation::unwrap_fresh` on an `InPlace` outcome")
            }
            Self::Fresh(set) => set,
        }
    }
}

impl<S> Mutation<S, bool> {
    /// Returns the membership signal of an in-place removal, or `None` if
    /// the operation produced a fresh container.
    #[inline]
    #[must_use]
    pub const fn removed(&self) -> Option<bool> {
        match self {
            Self::InPlace(found) => Some(*found),
            Self::Fresh(_) => None,
        }
    }
}
