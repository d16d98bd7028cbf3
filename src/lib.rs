//! # smartset
//!
//! A generic, key-addressed collection that behaves like a set (unique
//! membership decided by a derived key or a custom equality predicate)
//! while exposing ordered-array ergonomics and full set algebra.
//!
//! ## Overview
//!
//! [`SmartSet`] stores elements in insertion order and guarantees that no
//! two stored elements share an *identity*. The identity mechanism is
//! pluggable via the [`Identity`] trait and ships in two flavors:
//!
//! - [`KeyedIdentity`]: identity is a scalar key derived from each element
//!   by a caller-supplied function, backed by a key→position index for
//!   O(1)-average lookup, insert, and delete.
//! - [`ComparatorIdentity`]: identity is a caller-supplied pairwise
//!   equality predicate, with O(n) linear-scan lookup (no index is
//!   possible without a key).
//!
//! Both strategies expose the identical operation surface through
//! [`SmartSet`]; only the internal mechanism and its complexity differ.
//!
//! ## Mutation disciplines
//!
//! Every container carries a mutation discipline fixed at construction and
//! overridable per call:
//!
//! - **In-place** (the default): mutating operations modify the receiver
//!   and report [`Mutation::InPlace`].
//! - **Copy-on-write**: mutating operations leave the receiver untouched
//!   and return an independent clone carrying the change as
//!   [`Mutation::Fresh`]. The clone shares no mutable backing storage with
//!   the original; only the identity *function* behind an `Arc` is shared.
//!
//! ## Time complexity
//!
//! | Operation             | Keyed              | Comparator   |
//! |-----------------------|--------------------|--------------|
//! | `contains` / `get`    | O(1) average       | O(n)         |
//! | `add`                 | O(1) average       | O(n)         |
//! | `remove`              | O(1) average       | O(n)         |
//! | `sort_by`             | O(n log n)         | O(n log n)   |
//! | `union(other)`        | O(m) average       | O(n · m)     |
//! | `intersection`        | O(n) average       | O(n · m)     |
//! | `iter`                | O(1) + O(n)        | O(1) + O(n)  |
//!
//! The keyed `remove` is a swap-remove: the last element fills the freed
//! slot, so deletion does not preserve insertion order. The comparator
//! variant removes by splice and preserves order.
//!
//! ## Example
//!
//! ```rust
//! use smartset::{AddOptions, KeyedSmartSet};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! let mut users = KeyedSmartSet::keyed(|user: &User| user.id);
//! users.add(User { id: 1, name: "Alice".into() });
//! users.add(User { id: 2, name: "Bob".into() });
//!
//! // Same identity: first-seen wins unless `replace` is requested.
//! users.add(User { id: 1, name: "Alicia".into() });
//! assert_eq!(users.len(), 2);
//! assert_eq!(users.get(&User { id: 1, name: String::new() }).unwrap().name, "Alice");
//!
//! users.add_with(
//!     User { id: 1, name: "Alicia".into() },
//!     AddOptions::new().replace(true),
//! );
//! assert_eq!(users.get(&User { id: 1, name: String::new() }).unwrap().name, "Alicia");
//! ```
//!
//! Copy-on-write mode:
//!
//! ```rust
//! use smartset::KeyedSmartSet;
//!
//! let mut base = KeyedSmartSet::keyed_immutable(|n: &i32| *n)
//!     .add(1)
//!     .unwrap_fresh();
//! let extended = base.add(2).unwrap_fresh();
//!
//! assert_eq!(base.len(), 1); // original untouched
//! assert_eq!(extended.len(), 2);
//! assert!(extended.contains(&1) && extended.contains(&2));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod identity;
pub mod mutation;
pub mod smart_set;

pub use error::{ComparisonError, SmartSetError};
pub use identity::{ComparatorIdentity, Identity, KeyedIdentity};
pub use mutation::{AddOptions, Mutation, MutateOptions};
pub use smart_set::{
    ComparatorSmartSet, KeyedSmartSet, SmartSet, SmartSetIntoIterator, SmartSetIterator,
};

/// Prelude module for convenient imports.
///
/// Re-exports the types needed for everyday use of the crate.
///
/// # Usage
///
/// ```rust
/// use smartset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ComparisonError, SmartSetError};
    pub use crate::identity::{ComparatorIdentity, Identity, KeyedIdentity};
    pub use crate::mutation::{AddOptions, Mutation, MutateOptions};
    pub use crate::smart_set::{ComparatorSmartSet, KeyedSmartSet, SmartSet};
}
