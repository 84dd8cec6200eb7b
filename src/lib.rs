//! heapkit: an indexed binary heap and a capacity-bounded map built on it.
//!
//! - [`ds::IndexedHeap`]: binary heap of unique items with a position index,
//!   so any stored item can be removed in O(log n).
//! - [`policy::bounded_map::BoundedMap`]: hash map with a maximum size that
//!   evicts the entry whose value sits on top of an `IndexedHeap`.
//!
//! Ordering comes from a fallible [`traits::Comparator`]. A comparator error
//! aborts the operation in progress and leaves the container as it was.
//!
//! ```
//! use heapkit::prelude::*;
//!
//! let mut top_scores = BoundedMap::new(3);
//! for (player, score) in [("ann", 40), ("bob", 75), ("cat", 60), ("dan", 90)] {
//!     top_scores.set(player, score).unwrap();
//! }
//! assert!(!top_scores.contains_key("ann"));
//! assert_eq!(top_scores.peek_extremum_key(), Ok(&"cat"));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
