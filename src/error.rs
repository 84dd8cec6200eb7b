//! Error types for the heapkit library.
//!
//! ## Key Components
//!
//! - [`Error`]: The closed set of failures returned by [`IndexedHeap`] and
//!   [`BoundedMap`] operations.
//! - [`ComparisonError`]: Returned by a [`Comparator`] that cannot order two
//!   values (e.g. a NaN under [`PartialMinOrder`]).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use heapkit::ds::IndexedHeap;
//! use heapkit::error::Error;
//!
//! let mut heap: IndexedHeap<u32> = IndexedHeap::new();
//! assert_eq!(heap.pop(), Err(Error::Empty));
//!
//! heap.push(7).unwrap();
//! assert_eq!(heap.push(7), Err(Error::AlreadyPresent));
//! assert_eq!(heap.remove(&8), Err(Error::NotFound));
//! ```
//!
//! [`IndexedHeap`]: crate::ds::IndexedHeap
//! [`BoundedMap`]: crate::policy::bounded_map::BoundedMap
//! [`Comparator`]: crate::traits::Comparator
//! [`PartialMinOrder`]: crate::ds::PartialMinOrder

use std::fmt;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Failure kinds returned by heap and map operations.
///
/// Every error is reported synchronously to the immediate caller and nothing
/// is retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The operation requires at least one stored element.
    Empty,
    /// The target item is not stored in the heap.
    NotFound,
    /// The target key is not stored in the map.
    KeyNotFound,
    /// An equal item (or key) is already stored.
    AlreadyPresent,
    /// Raw positional access past the end of the heap array.
    IndexOutOfRange { index: usize, len: usize },
    /// The comparator could not order two values.
    ComparisonFailure(ComparisonError),
}

impl Error {
    /// Returns `true` for [`Error::ComparisonFailure`].
    #[inline]
    pub fn is_comparison_failure(&self) -> bool {
        matches!(self, Error::ComparisonFailure(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty => f.write_str("the heap is empty"),
            Error::NotFound => f.write_str("the given item was not found in the heap"),
            Error::KeyNotFound => f.write_str("the given key is not present"),
            Error::AlreadyPresent => f.write_str("the given item is already present"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index out of range: {} >= {}", index, len)
            },
            Error::ComparisonFailure(err) => write!(f, "failed to compare values: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ComparisonFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ComparisonError> for Error {
    #[inline]
    fn from(err: ComparisonError) -> Self {
        Error::ComparisonFailure(err)
    }
}

// ---------------------------------------------------------------------------
// ComparisonError
// ---------------------------------------------------------------------------

/// Error returned by a comparator that cannot order its operands.
///
/// Carries a human-readable reason. Converts into
/// [`Error::ComparisonFailure`] so comparator calls propagate with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonError(String);

impl ComparisonError {
    /// Creates a new `ComparisonError` with the given reason.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the failure reason.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ComparisonError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal container invariants are violated.
///
/// Produced by `check_invariants` methods
/// (e.g. [`IndexedHeap::check_invariants`](crate::ds::IndexedHeap::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
