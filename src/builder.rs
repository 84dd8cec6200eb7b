//! Builders for [`IndexedHeap`] and [`BoundedMap`].
//!
//! Each knob has a default, so a builder can be built straight away:
//!
//! | Knob         | `IndexedHeapBuilder` | `BoundedMapBuilder` |
//! |--------------|----------------------|---------------------|
//! | capacity     | `usize::MAX`         | required            |
//! | comparator   | [`MinOrder`]         | [`MinOrder`]        |
//! | hooks        | `()`                 | `()`                |
//! | unchecked    | `false`              | `false`             |
//!
//! ## Example
//!
//! ```rust
//! use heapkit::builder::{BoundedMapBuilder, IndexedHeapBuilder};
//! use heapkit::ds::MaxOrder;
//!
//! let mut heap = IndexedHeapBuilder::new()
//!     .capacity(2)
//!     .comparator(MaxOrder)
//!     .build::<u32>();
//! heap.push(1).unwrap();
//! heap.push(5).unwrap();
//! assert_eq!(heap.peek_top(), Ok(&5));
//!
//! let mut map = BoundedMapBuilder::new(1).build::<&str, u32>();
//! map.set("a", 3).unwrap();
//! assert_eq!(map.set("b", 4), Ok(Some(("a", 3))));
//! ```

use std::hash::Hash;

use crate::ds::indexed_heap::IndexedHeap;
use crate::ds::order::MinOrder;
use crate::policy::bounded_map::BoundedMap;
use crate::traits::{Comparator, HeapHooks, MapHooks};

/// Builder for [`IndexedHeap`].
#[derive(Debug, Clone)]
pub struct IndexedHeapBuilder<C = MinOrder, H = ()> {
    capacity: usize,
    unchecked: bool,
    comparator: C,
    hooks: H,
}

impl IndexedHeapBuilder {
    /// Creates a builder for an unbounded min-heap.
    pub fn new() -> Self {
        Self {
            capacity: usize::MAX,
            unchecked: false,
            comparator: MinOrder,
            hooks: (),
        }
    }
}

impl Default for IndexedHeapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, H> IndexedHeapBuilder<C, H> {
    /// Sets the maximum number of stored items.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Skips duplicate checks on insertion.
    pub fn unchecked(mut self, unchecked: bool) -> Self {
        self.unchecked = unchecked;
        self
    }

    /// Replaces the comparator.
    pub fn comparator<C2>(self, comparator: C2) -> IndexedHeapBuilder<C2, H> {
        IndexedHeapBuilder {
            capacity: self.capacity,
            unchecked: self.unchecked,
            comparator,
            hooks: self.hooks,
        }
    }

    /// Replaces the lifecycle hooks.
    pub fn hooks<H2>(self, hooks: H2) -> IndexedHeapBuilder<C, H2> {
        IndexedHeapBuilder {
            capacity: self.capacity,
            unchecked: self.unchecked,
            comparator: self.comparator,
            hooks,
        }
    }

    /// Builds the heap.
    pub fn build<T>(self) -> IndexedHeap<T, C, H>
    where
        T: Eq + Hash + Clone,
        C: Comparator<T>,
        H: HeapHooks<T>,
    {
        let mut heap = IndexedHeap::with_parts(self.capacity, self.comparator, self.hooks);
        heap.set_unchecked(self.unchecked);
        heap
    }
}

/// Builder for [`BoundedMap`].
#[derive(Debug, Clone)]
pub struct BoundedMapBuilder<C = MinOrder, H = ()> {
    capacity: usize,
    unchecked: bool,
    comparator: C,
    hooks: H,
}

impl BoundedMapBuilder {
    /// Creates a builder for a map of at most `capacity` entries that evicts
    /// the smallest value first.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            unchecked: false,
            comparator: MinOrder,
            hooks: (),
        }
    }
}

impl<C, H> BoundedMapBuilder<C, H> {
    /// Skips duplicate-key checks on insertion.
    pub fn unchecked(mut self, unchecked: bool) -> Self {
        self.unchecked = unchecked;
        self
    }

    /// Replaces the value comparator.
    pub fn comparator<C2>(self, comparator: C2) -> BoundedMapBuilder<C2, H> {
        BoundedMapBuilder {
            capacity: self.capacity,
            unchecked: self.unchecked,
            comparator,
            hooks: self.hooks,
        }
    }

    /// Replaces the lifecycle hooks.
    pub fn hooks<H2>(self, hooks: H2) -> BoundedMapBuilder<C, H2> {
        BoundedMapBuilder {
            capacity: self.capacity,
            unchecked: self.unchecked,
            comparator: self.comparator,
            hooks,
        }
    }

    /// Builds the map.
    ///
    /// # Type Parameters
    ///
    /// - `K`: Key type, must be `Eq + Hash + Clone`
    /// - `V`: Value type, must be `Clone` and ordered by the comparator
    pub fn build<K, V>(self) -> BoundedMap<K, V, C, H>
    where
        K: Eq + Hash + Clone,
        V: Clone,
        C: Comparator<V>,
        H: MapHooks<K, V>,
    {
        let mut map = BoundedMap::with_parts(self.capacity, self.comparator, self.hooks);
        map.set_unchecked(self.unchecked);
        map
    }
}
