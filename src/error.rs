//! Error types for `SmartSet` operations.
//!
//! The container's semantics require almost no failure paths: absent
//! elements yield `false`/`None` results, and algebra against an empty
//! operand is a defined no-op. The one operation that can fail is
//! [`SmartSet::try_sort_by`](crate::SmartSet::try_sort_by), when the
//! supplied comparator cannot order a pair of elements.

/// Represents a comparator that failed to produce a total order.
///
/// Returned by [`SmartSet::try_sort_by`](crate::SmartSet::try_sort_by)
/// when the partial comparator yields no [`Ordering`](std::cmp::Ordering)
/// for some pair of elements (for example, `partial_cmp` over floats
/// encountering a NaN). The failed sort is atomic: the container and its
/// key index are left exactly as they were before the call.
///
/// # Examples
///
/// ```rust
/// use smartset::ComparisonError;
///
/// let error = ComparisonError {
///     operation: "try_sort_by",
/// };
/// assert_eq!(
///     format!("{}", error),
///     "try_sort_by: comparator produced no ordering for a pair of elements"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonError {
    /// The name of the operation during which the comparator failed.
    pub operation: &'static str,
}

impl std::fmt::Display for ComparisonError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}: comparator produced no ordering for a pair of elements",
            self.operation
        )
    }
}

impl std::error::Error for ComparisonError {}

/// Represents errors that can occur when operating on a `SmartSet`.
///
/// This enum provides a unified error type for the crate. Currently it
/// only contains `Comparison`, but it is designed to be extensible for
/// future error kinds.
///
/// # Examples
///
/// ```rust
/// use smartset::{ComparisonError, SmartSetError};
///
/// let error = SmartSetError::Comparison(ComparisonError {
///     operation: "try_sort_by",
/// });
/// println!("{}", error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartSetError {
    /// A sort comparator failed to produce a total order.
    Comparison(ComparisonError),
}

impl std::fmt::Display for SmartSetError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comparison(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for SmartSetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Comparison(error) => Some(error),
        }
    }
}

impl From<ComparisonError> for SmartSetError {
    fn from(error: ComparisonError) -> Self {
        Self::Comparison(error)
    }
}
