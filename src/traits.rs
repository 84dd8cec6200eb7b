//! # Capability Seams
//!
//! The containers in this crate are generic over three small capabilities
//! supplied by their owner:
//!
//! ```text
//!   ┌─────────────────────────────┐   ┌─────────────────────────────┐
//!   │       Comparator<T>         │   │   HeapHooks<T>              │
//!   │                             │   │   MapHooks<K, V>            │
//!   │  less(&a, &b)               │   │                             │
//!   │    → Result<bool, CmpErr>   │   │  on_added(..)               │
//!   │                             │   │  on_removed(..)             │
//!   └──────────────┬──────────────┘   └──────────────┬──────────────┘
//!                  │                                 │
//!                  ▼                                 ▼
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │   IndexedHeap<T, C, H>            BoundedMap<K, V, C, H>        │
//!   │   (ordering decisions)            (lifecycle notifications)     │
//!   └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Comparator
//!
//! `less(a, b) == true` means `a` belongs closer to the top of the heap than
//! `b`. The relation must be irreflexive and transitive; violating that is a
//! logic error that the containers do not detect. A comparator may refuse to
//! order two values by returning a [`ComparisonError`]. The containers abort
//! the operation in progress and restore their previous state.
//!
//! ## Hooks
//!
//! Hooks are invoked exactly once per logical insertion and exactly once per
//! logical removal (explicit removal, pop, capacity eviction, displacement by
//! replace, clear). They receive borrowed values; the owner acquires or
//! releases any external resource tied to an item from inside the hook.
//! `()` implements both hook traits as no-ops.
//!
//! ## Example Usage
//!
//! ```
//! use heapkit::builder::IndexedHeapBuilder;
//! use heapkit::ds::{IndexedHeap, MinOrder};
//! use heapkit::traits::HeapHooks;
//!
//! #[derive(Default)]
//! struct Live(i64);
//!
//! impl HeapHooks<u32> for Live {
//!     fn on_added(&mut self, _item: &u32) {
//!         self.0 += 1;
//!     }
//!     fn on_removed(&mut self, _item: &u32) {
//!         self.0 -= 1;
//!     }
//! }
//!
//! let mut heap: IndexedHeap<u32, MinOrder, Live> =
//!     IndexedHeapBuilder::new().hooks(Live::default()).build();
//! heap.push(3).unwrap();
//! heap.push(1).unwrap();
//! heap.pop().unwrap();
//! assert_eq!(heap.hooks().0, 1);
//! ```

use crate::error::ComparisonError;

/// Fallible strict-weak ordering used to arrange heap items.
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if `a` should sit above `b` in the heap.
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError>;
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    #[inline]
    fn less(&self, a: &T, b: &T) -> Result<bool, ComparisonError> {
        (**self).less(a, b)
    }
}

/// Lifecycle notifications for items stored in an [`IndexedHeap`](crate::ds::IndexedHeap).
pub trait HeapHooks<T> {
    /// Called after `item` has been stored.
    #[inline]
    fn on_added(&mut self, item: &T) {
        let _ = item;
    }

    /// Called after `item` has left the heap.
    #[inline]
    fn on_removed(&mut self, item: &T) {
        let _ = item;
    }
}

impl<T> HeapHooks<T> for () {}

/// Lifecycle notifications for entries stored in a
/// [`BoundedMap`](crate::policy::bounded_map::BoundedMap).
pub trait MapHooks<K, V> {
    /// Called after `key` has been stored with `value`.
    #[inline]
    fn on_added(&mut self, key: &K, value: &V) {
        let _ = (key, value);
    }

    /// Called after the `key`/`value` pair has left the map.
    #[inline]
    fn on_removed(&mut self, key: &K, value: &V) {
        let _ = (key, value);
    }
}

impl<K, V> MapHooks<K, V> for () {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reversed;

    impl Comparator<i32> for Reversed {
        fn less(&self, a: &i32, b: &i32) -> Result<bool, ComparisonError> {
            Ok(a > b)
        }
    }

    #[test]
    fn comparator_by_reference_delegates() {
        fn check<C: Comparator<i32>>(cmp: C) {
            assert_eq!(cmp.less(&2, &1), Ok(true));
            assert_eq!(cmp.less(&1, &2), Ok(false));
        }
        check(&Reversed);
    }

    #[test]
    fn unit_hooks_are_noops() {
        HeapHooks::<u8>::on_added(&mut (), &1);
        HeapHooks::<u8>::on_removed(&mut (), &1);
        MapHooks::<&str, u8>::on_added(&mut (), &"a", &1);
        MapHooks::<&str, u8>::on_removed(&mut (), &"a", &1);
    }
}
