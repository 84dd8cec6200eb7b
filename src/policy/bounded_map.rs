//! # Bounded Map
//!
//! A hash map with a maximum number of entries. When an insertion would push
//! the map past its capacity, the entry whose *value* sits on top of an
//! [`IndexedHeap`] is evicted.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                        BoundedMap<K, V, C, H>                            │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  entries: FxHashMap<K, V>                                          │ │
//!   │   │                                                                    │ │
//!   │   │  ┌─────────┬──────────┐                                            │ │
//!   │   │  │   Key   │  Value   │                                            │ │
//!   │   │  ├─────────┼──────────┤                                            │ │
//!   │   │  │   "a"   │   10     │                                            │ │
//!   │   │  │   "c"   │    7     │                                            │ │
//!   │   │  └─────────┴──────────┘                                            │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  order: IndexedHeap<Entry<K, V>, ByValue<C>>                       │ │
//!   │   │                                                                    │ │
//!   │   │          ("c", 7)   ← top: evicted next                            │ │
//!   │   │           /                                                        │ │
//!   │   │     ("a", 10)                                                      │ │
//!   │   │                                                                    │ │
//!   │   │  Entries are identified by key; the comparator sees values only.   │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   capacity (held by the heap)                                            │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Operations
//!
//! | Method              | Complexity | Description                                |
//! |---------------------|------------|--------------------------------------------|
//! | `set(k, v)`         | O(log n)   | Insert new key, may evict the top entry    |
//! | `set_or_replace`    | O(log n)   | Upsert; a failed replace restores old value|
//! | `get(&k)`           | O(1)       | Borrow a value                             |
//! | `remove(&k)`        | O(log n)   | Remove from map and heap                   |
//! | `peek_extremum_key` | O(1)       | Key of the entry evicted next              |
//! | `peak_key`          | O(n/2)*    | Key at the opposite end of the order       |
//! | `set_capacity(n)`   | O(k log n) | Evict until `len <= n`                     |
//!
//! \* Cached between mutations that do not disturb it
//!
//! ## Example Usage
//!
//! ```
//! use heapkit::error::Error;
//! use heapkit::policy::bounded_map::BoundedMap;
//!
//! // Keep the two largest scores; the smallest value is evicted.
//! let mut scores = BoundedMap::new(2);
//! scores.set("a", 10).unwrap();
//! scores.set("b", 5).unwrap();
//! assert_eq!(scores.set("c", 7), Ok(Some(("b", 5))));
//!
//! assert_eq!(scores.get(&"a"), Ok(&10));
//! assert_eq!(scores.get(&"b"), Err(Error::KeyNotFound));
//! assert_eq!(scores.peek_extremum_key(), Ok(&"c"));
//! ```
//!
//! ## Thread Safety
//!
//! `BoundedMap` is not thread-safe. Callers must serialize access.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::ds::indexed_heap::{IndexedHeap, PushOutcome};
use crate::ds::order::{ByValue, MinOrder};
use crate::error::{ComparisonError, Error, InvariantError};
use crate::traits::{Comparator, MapHooks};

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::BoundedMapMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::BoundedMapMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{MapMetricsReadRecorder, MapMetricsRecorder, MetricsSnapshotProvider};

/// Heap element of a [`BoundedMap`]: a key/value pair identified by its key.
///
/// `Eq` and `Hash` look at the key only, so values need neither.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

impl<K: Hash, V> Hash for Entry<K, V> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.key.hash(state);
    }
}

impl<K, V> Borrow<K> for Entry<K, V> {
    fn borrow(&self) -> &K {
        &self.key
    }
}

impl<K, V, C: Comparator<V>> Comparator<Entry<K, V>> for ByValue<C> {
    #[inline]
    fn less(&self, a: &Entry<K, V>, b: &Entry<K, V>) -> Result<bool, ComparisonError> {
        self.0.less(&a.value, &b.value)
    }
}

/// Capacity-bounded map that evicts by value order.
///
/// # Type Parameters
///
/// - `K`: Key type (`Eq + Hash + Clone`)
/// - `V`: Value type (`Clone`; a copy lives in the heap)
/// - `C`: [`Comparator`] over values; the top value is evicted first
///   (default [`MinOrder`]: smallest value evicted)
/// - `H`: [`MapHooks`] notified on insertion and removal (default `()`)
#[derive(Debug)]
pub struct BoundedMap<K, V, C = MinOrder, H = ()> {
    entries: FxHashMap<K, V>,
    order: IndexedHeap<Entry<K, V>, ByValue<C>>,
    hooks: H,
    unchecked: bool,
    #[cfg(feature = "metrics")]
    metrics: BoundedMapMetrics,
}

impl<K, V> BoundedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + Ord,
{
    /// Creates an empty map holding at most `capacity` entries, evicting the
    /// smallest value first.
    pub fn new(capacity: usize) -> Self {
        Self::with_parts(capacity, MinOrder, ())
    }
}

impl<K, V, C> BoundedMap<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Comparator<V>,
{
    /// Creates an empty map whose eviction order is set by `comparator`.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::MaxOrder;
    /// use heapkit::policy::bounded_map::BoundedMap;
    ///
    /// // Evict the largest value first.
    /// let mut map = BoundedMap::with_comparator(1, MaxOrder);
    /// map.set(1, 100).unwrap();
    /// assert_eq!(map.set(2, 50), Ok(Some((1, 100))));
    /// ```
    pub fn with_comparator(capacity: usize, comparator: C) -> Self {
        Self::with_parts(capacity, comparator, ())
    }
}

impl<K, V, C, H> BoundedMap<K, V, C, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Comparator<V>,
    H: MapHooks<K, V>,
{
    /// Creates an empty map from its capacity, comparator and hooks.
    pub fn with_parts(capacity: usize, comparator: C, hooks: H) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: IndexedHeap::with_parts(capacity, ByValue(comparator), ()),
            hooks,
            unchecked: false,
            #[cfg(feature = "metrics")]
            metrics: BoundedMapMetrics::default(),
        }
    }

    /// Returns the number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.order.capacity()
    }

    /// Returns the value comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        self.order.comparator().inner()
    }

    #[inline]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    #[inline]
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    #[inline]
    pub fn is_unchecked(&self) -> bool {
        self.unchecked
    }

    /// Enables or disables unchecked mode.
    ///
    /// Unchecked mode skips the duplicate-key lookup in [`set`](Self::set).
    /// Setting a key that is already stored then leaves the map in an
    /// unspecified (but memory-safe) state that
    /// [`check_invariants`](Self::check_invariants) reports.
    pub fn set_unchecked(&mut self, unchecked: bool) {
        self.unchecked = unchecked;
        self.order.set_unchecked(unchecked);
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Borrows the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key) {
            Some(value) => {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_get_hit();
                Ok(value)
            },
            None => {
                #[cfg(feature = "metrics")]
                (&self.metrics).record_get_miss();
                Err(Error::KeyNotFound)
            },
        }
    }

    /// Inserts a new key.
    ///
    /// If the map is full, the entry on top of the value order among the
    /// current entries *and* the new one is evicted and returned. A new value
    /// tied with the top evicts the resident entry. Only a value strictly
    /// ahead of the top is evicted on arrival, in which case the map is
    /// unchanged and the hooks see it added and removed.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::policy::bounded_map::BoundedMap;
    ///
    /// let mut map = BoundedMap::new(2);
    /// map.set("a", 5).unwrap();
    /// map.set("b", 7).unwrap();
    /// assert_eq!(map.set("c", 5), Ok(Some(("a", 5))));
    /// assert_eq!(map.set("d", 1), Ok(Some(("d", 1))));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyPresent`] if `key` is stored; use
    ///   [`set_or_replace`](Self::set_or_replace) to overwrite
    /// - [`Error::ComparisonFailure`] if the comparator fails; the map is left
    ///   unchanged
    pub fn set(&mut self, key: K, value: V) -> Result<Option<(K, V)>, Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if !self.unchecked && self.entries.contains_key(&key) {
            return Err(Error::AlreadyPresent);
        }

        let outcome = self
            .order
            .push_displacing(Entry::new(key.clone(), value.clone()))
            .map_err(|err| self.failed(err))?;

        self.hooks.on_added(&key, &value);
        #[cfg(feature = "metrics")]
        if outcome.is_stored() {
            self.metrics.record_insert_new();
        }

        let evicted = match outcome {
            PushOutcome::Inserted => {
                self.entries.insert(key, value);
                None
            },
            PushOutcome::Rejected(entry) => Some(entry.into_pair()),
            PushOutcome::Displaced(entry) => {
                self.entries.remove(&entry.key);
                self.entries.insert(key, value);
                Some(entry.into_pair())
            },
        };

        if let Some((evicted_key, evicted_value)) = &evicted {
            tracing::trace!(capacity = self.capacity(), "bounded map evicted top entry");
            self.hooks.on_removed(evicted_key, evicted_value);
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
        Ok(evicted)
    }

    /// Inserts or overwrites `key`, returning the previous value if any.
    ///
    /// Overwriting is a single transaction: the old entry is swapped for the
    /// new one inside its heap slot and re-sifted. If the comparator fails,
    /// the old value is back in place before the error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::policy::bounded_map::BoundedMap;
    ///
    /// let mut map = BoundedMap::new(2);
    /// map.set("a", 1).unwrap();
    /// map.set("b", 2).unwrap();
    /// assert_eq!(map.set_or_replace("a", 3), Ok(Some(1)));
    /// assert_eq!(map.peek_extremum_key(), Ok(&"b"));
    /// ```
    pub fn set_or_replace(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        if !self.entries.contains_key(&key) {
            return self.set(key, value).map(|_| None);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let old = self
            .order
            .update(Entry::new(key.clone(), value.clone()))
            .map_err(|err| self.failed(err))?;
        self.entries.insert(key, value.clone());

        let (key, old_value) = old.into_pair();
        self.hooks.on_added(&key, &value);
        self.hooks.on_removed(&key, &old_value);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_update();
        Ok(Some(old_value))
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// - [`Error::KeyNotFound`] if `key` is not stored
    /// - [`Error::ComparisonFailure`] if the comparator fails while repairing
    ///   the heap; the entry stays stored
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let (stored, _) = self.entries.get_key_value(key).ok_or(Error::KeyNotFound)?;
        let entry = match self.order.remove(stored) {
            Ok(entry) => entry,
            Err(err) => return Err(self.failed(err)),
        };
        self.entries.remove::<K>(entry.key());

        let (key, value) = entry.into_pair();
        self.hooks.on_removed(&key, &value);
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();
        Ok(value)
    }

    /// Returns the key of the entry that would be evicted next.
    #[inline]
    pub fn peek_extremum_key(&self) -> Result<&K, Error> {
        self.order.peek_top().map(Entry::key)
    }

    /// Returns the key at the opposite end of the value order (the key of the
    /// largest value under the default comparator).
    pub fn peak_key(&mut self) -> Result<&K, Error> {
        self.order.peek_extremum().map(Entry::key)
    }

    /// Sets the maximum number of entries, evicting from the top of the value
    /// order until the map fits.
    ///
    /// # Errors
    ///
    /// [`Error::ComparisonFailure`] stops the shrink. Entries already evicted
    /// stay evicted and the previous capacity is kept.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), Error> {
        if self.entries.len() > capacity {
            tracing::debug!(
                len = self.entries.len(),
                capacity,
                "shrinking bounded map to new capacity"
            );
        }

        while self.entries.len() > capacity {
            let entry = match self.order.pop() {
                Ok(entry) => entry,
                Err(err) => return Err(self.failed(err)),
            };
            self.entries.remove(&entry.key);
            self.hooks.on_removed(&entry.key, &entry.value);
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
        self.order.set_capacity(capacity)
    }

    /// Removes every entry, notifying the hooks once per entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(len = self.entries.len(), "clearing bounded map");
        }
        for (key, value) in self.entries.drain() {
            self.hooks.on_removed(&key, &value);
        }
        self.order.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Iterates over entries in hash map order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Returns a snapshot of the keys in hash map order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.keys().cloned().collect()
    }

    /// Returns a snapshot of the values in hash map order.
    pub fn values(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }

    /// Returns a snapshot of the entries in hash map order.
    pub fn items(&self) -> Vec<(K, V)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn failed(&mut self, err: Error) -> Error {
        #[cfg(feature = "metrics")]
        if err.is_comparison_failure() {
            self.metrics.record_comparison_failure();
        }
        err
    }
}

impl<K, V, C, H> BoundedMap<K, V, C, H>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
    C: Comparator<V>,
    H: MapHooks<K, V>,
{
    /// Verifies that the map and its heap hold the same key/value pairs and
    /// that the heap's own invariants hold.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_invariants()?;
        if self.entries.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "map holds {} entries, heap holds {}",
                self.entries.len(),
                self.order.len()
            )));
        }
        for entry in self.order.iter() {
            match self.entries.get(&entry.key) {
                Some(value) if *value == entry.value => {},
                Some(_) => return Err(InvariantError::new("heap value differs from map value")),
                None => return Err(InvariantError::new("heap entry missing from map")),
            }
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
impl<K, V, C, H> BoundedMap<K, V, C, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Comparator<V>,
    H: MapHooks<K, V>,
{
    pub fn metrics_snapshot(&self) -> BoundedMapMetricsSnapshot {
        BoundedMapMetricsSnapshot {
            get_calls: self.metrics.get_calls.get(),
            get_hits: self.metrics.get_hits.get(),
            get_misses: self.metrics.get_misses.get(),
            insert_calls: self.metrics.insert_calls,
            insert_new: self.metrics.insert_new,
            insert_updates: self.metrics.insert_updates,
            evicted_entries: self.metrics.evicted_entries,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            comparison_failures: self.metrics.comparison_failures,
            clears: self.metrics.clears,
            map_len: self.entries.len(),
            capacity: self.order.capacity(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, C, H> MetricsSnapshotProvider<BoundedMapMetricsSnapshot> for BoundedMap<K, V, C, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Comparator<V>,
    H: MapHooks<K, V>,
{
    fn snapshot(&self) -> BoundedMapMetricsSnapshot {
        self.metrics_snapshot()
    }
}



#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Map and heap agree after any mix of set/replace/remove.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_map_and_heap_agree(
            capacity in 0usize..16,
            ops in prop::collection::vec((0u8..3, 0u8..24, any::<i16>()), 0..200)
        ) {
            let mut map = BoundedMap::new(capacity);
            for (op, key, value) in ops {
                let _ = match op {
                    0 => map.set(key, value).map(|_| ()),
                    1 => map.set_or_replace(key, value).map(|_| ()),
                    _ => map.remove(&key).map(|_| ()),
                };
                prop_assert!(map.len() <= capacity);
                prop_assert!(map.check_invariants().is_ok());
            }
        }

        /// With k+1 distinct keys, the evicted key holds the smallest value.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_evicts_minimum(values in prop::collection::hash_set(any::<i32>(), 2..40)) {
            let values: Vec<i32> = values.into_iter().collect();
            let capacity = values.len() - 1;
            let mut map = BoundedMap::new(capacity);
            let mut evicted = None;
            for (key, &value) in values.iter().enumerate() {
                if let Some(pair) = map.set(key, value).unwrap() {
                    evicted = Some(pair);
                }
            }
            let min = values.iter().copied().min().unwrap();
            prop_assert_eq!(evicted.map(|(_, value)| value), Some(min));
            prop_assert!(map.values().iter().all(|&value| value > min));
        }
    }
}
