//! Binary heap with a position index for O(log n) arbitrary removal.
//!
//! A standard binary heap answers "remove this item" with an O(n) scan for
//! the item followed by an O(log n) repair. `IndexedHeap` keeps a hash index
//! from every stored item to its array slot, so the scan disappears and
//! removal costs O(log n).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         IndexedHeap Layout                                  │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  items: Vec<T>   (heap-ordered by the comparator)                 │    │
//! │   │                                                                   │    │
//! │   │   slot:   0     1     2     3     4     5                         │    │
//! │   │         ┌─────┬─────┬─────┬─────┬─────┬─────┐                     │    │
//! │   │         │  1  │  3  │  2  │  8  │  5  │  4  │                     │    │
//! │   │         └─────┴─────┴─────┴─────┴─────┴─────┘                     │    │
//! │   │           top         └──── leaf level [len/2, len) ────┘         │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! │                                                                             │
//! │   ┌───────────────────────────────────────────────────────────────────┐    │
//! │   │  index: FxHashMap<T, usize>   (items[index[x]] == x)              │    │
//! │   │                                                                   │    │
//! │   │    1 → 0   3 → 1   2 → 2   8 → 3   5 → 4   4 → 5                  │    │
//! │   └───────────────────────────────────────────────────────────────────┘    │
//! │                                                                             │
//! │   capacity: usize::MAX      last: Some(4)      peak: Some(8)               │
//! └─────────────────────────────────────────────────────────────────────────────┘
//!
//! Remove Flow
//! ───────────
//!   remove(3):                     (slot 1)
//!     1. swap slot 1 with the last slot, truncate
//!     2. sift the moved item up; if it did not move, sift it down
//!     3. every swap rewrites both index entries
//!
//! Rollback
//! ────────
//!   Every swap made by a sift is journaled. If the comparator fails part way,
//!   the journal is replayed backwards and the pre-sift step is undone, so the
//!   heap is exactly as it was before the call.
//! ```
//!
//! ## Operations
//!
//! | Operation        | Description                                 | Complexity |
//! |------------------|---------------------------------------------|------------|
//! | `push`           | Insert; at capacity acts as `pushpop`       | O(log n)   |
//! | `pop`            | Remove and return the top                   | O(log n)   |
//! | `pushpop`        | Push then pop, fused                        | O(log n)   |
//! | `replace`        | Pop then push, fused                        | O(log n)   |
//! | `remove`         | Remove an arbitrary item                    | O(log n)   |
//! | `update`         | Swap a stored item for an equal one in place| O(log n)   |
//! | `peek_top`       | Borrow the top                              | O(1)       |
//! | `peek_extremum`  | Borrow the opposite end (cached)            | O(n/2), O(1) cached |
//! | `get_last`       | Most recent surviving insertion             | O(1)       |
//! | `get`            | Raw positional access                       | O(1)       |
//! | `set_capacity`   | Shrink by popping, then record capacity     | O(k log n) |
//!
//! ## Example Usage
//!
//! ```
//! use heapkit::ds::IndexedHeap;
//!
//! let mut heap: IndexedHeap<u32> = IndexedHeap::new();
//! for value in [5, 3, 8, 1] {
//!     heap.push(value).unwrap();
//! }
//!
//! assert_eq!(heap.peek_top(), Ok(&1));
//! assert_eq!(heap.peek_extremum(), Ok(&8));
//!
//! heap.remove(&3).unwrap();
//! assert_eq!(heap.pop(), Ok(1));
//! assert_eq!(heap.pop(), Ok(5));
//! assert_eq!(heap.pop(), Ok(8));
//! ```
//!
//! ## Thread Safety
//!
//! `IndexedHeap` is not thread-safe. Callers must serialize access.
//!
//! ## Implementation Notes
//!
//! - Items must be unique under `Eq`/`Hash`; the index is keyed by the item
//! - Unchecked mode skips the duplicate lookup before insertion
//! - `check_invariants()` verifies the index and heap order on demand

use std::borrow::Borrow;
use std::hash::Hash;
use std::mem;

use rustc_hash::FxHashMap;

use crate::ds::order::MinOrder;
use crate::error::{ComparisonError, Error, InvariantError};
use crate::traits::{Comparator, HeapHooks};

#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::HeapMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::HeapMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{HeapMetricsRecorder, MetricsSnapshotProvider};

/// Result of [`IndexedHeap::push`].
///
/// A push into a full heap is resolved like [`IndexedHeap::pushpop`] (ties
/// going to the top, or to the newcomer for [`IndexedHeap::push_displacing`]); the
/// variants tell the caller which side of the exchange happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome<T> {
    /// The item was stored and nothing left the heap.
    Inserted,
    /// The heap was full; the item was stored and the previous top left.
    Displaced(T),
    /// The heap was full and the item would have been popped straight away;
    /// it is handed back and the heap is unchanged.
    Rejected(T),
}

impl<T> PushOutcome<T> {
    /// Returns `true` if the pushed item is now stored.
    #[inline]
    pub fn is_stored(&self) -> bool {
        !matches!(self, PushOutcome::Rejected(_))
    }

    /// Returns the item that did not end up in the heap, if any.
    #[inline]
    pub fn into_evicted(self) -> Option<T> {
        match self {
            PushOutcome::Inserted => None,
            PushOutcome::Displaced(item) | PushOutcome::Rejected(item) => Some(item),
        }
    }
}

/// Binary heap of unique items with O(log n) arbitrary removal.
///
/// # Type Parameters
///
/// - `T`: Item type (must be `Eq + Hash + Clone`; the index keeps a clone)
/// - `C`: [`Comparator`] deciding which item sits on top (default [`MinOrder`])
/// - `H`: [`HeapHooks`] notified on insertion and removal (default `()`)
///
/// # Example
///
/// ```
/// use heapkit::ds::{IndexedHeap, MaxOrder, PushOutcome};
///
/// // Keep the three smallest values seen: a bounded max-heap.
/// let mut heap = IndexedHeap::with_comparator(MaxOrder);
/// heap.set_capacity(3).unwrap();
///
/// for value in [7, 2, 9, 4, 1] {
///     heap.push(value).unwrap();
/// }
///
/// assert_eq!(heap.len(), 3);
/// assert_eq!(heap.peek_top(), Ok(&4));
/// assert_eq!(heap.push(8), Ok(PushOutcome::Rejected(8)));
/// ```
#[derive(Debug)]
pub struct IndexedHeap<T, C = MinOrder, H = ()> {
    items: Vec<T>,
    index: FxHashMap<T, usize>,
    capacity: usize,
    comparator: C,
    hooks: H,
    last: Option<T>,
    peak: Option<T>,
    journal: Vec<(usize, usize)>,
    unchecked: bool,
    #[cfg(feature = "metrics")]
    metrics: HeapMetrics,
}

impl<T> IndexedHeap<T>
where
    T: Eq + Hash + Clone + Ord,
{
    /// Creates an empty, unbounded min-heap.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::IndexedHeap;
    ///
    /// let heap: IndexedHeap<u64> = IndexedHeap::new();
    /// assert!(heap.is_empty());
    /// assert_eq!(heap.capacity(), usize::MAX);
    /// ```
    pub fn new() -> Self {
        Self::with_parts(usize::MAX, MinOrder, ())
    }

    /// Creates an empty min-heap that holds at most `capacity` items.
    ///
    /// Nothing is preallocated; see [`reserve`](Self::reserve).
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::{IndexedHeap, PushOutcome};
    ///
    /// let mut heap = IndexedHeap::with_capacity(2);
    /// heap.push(1).unwrap();
    /// heap.push(2).unwrap();
    /// assert_eq!(heap.push(3), Ok(PushOutcome::Displaced(1)));
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_parts(capacity, MinOrder, ())
    }
}

impl<T, C> IndexedHeap<T, C>
where
    T: Eq + Hash + Clone,
    C: Comparator<T>,
{
    /// Creates an empty, unbounded heap ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_parts(usize::MAX, comparator, ())
    }
}

impl<T, C, H> IndexedHeap<T, C, H>
where
    T: Eq + Hash + Clone,
    C: Comparator<T>,
    H: HeapHooks<T>,
{
    /// Creates an empty heap from its capacity, comparator and hooks.
    pub fn with_parts(capacity: usize, comparator: C, hooks: H) -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
            capacity,
            comparator,
            hooks,
            last: None,
            peak: None,
            journal: Vec::new(),
            unchecked: false,
            #[cfg(feature = "metrics")]
            metrics: HeapMetrics::default(),
        }
    }

    /// Returns the number of stored items.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no items are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the maximum number of stored items.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the lifecycle hooks.
    #[inline]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Returns the lifecycle hooks mutably.
    #[inline]
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Returns `true` if duplicate checks are skipped on insertion.
    #[inline]
    pub fn is_unchecked(&self) -> bool {
        self.unchecked
    }

    /// Enables or disables unchecked mode.
    ///
    /// In unchecked mode `push`, `pushpop` and `replace` skip the lookup that
    /// rejects duplicates. Inserting an item that is already stored then
    /// leaves the heap in an unspecified (but memory-safe) state that
    /// [`check_invariants`](Self::check_invariants) reports.
    pub fn set_unchecked(&mut self, unchecked: bool) {
        self.unchecked = unchecked;
    }

    /// Returns `true` if an item equal to `item` is stored.
    #[inline]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(item)
    }

    /// Returns the array slot currently holding `item`.
    #[inline]
    pub fn position<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(item).copied()
    }

    /// Returns the raw heap array.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterates over stored items in array order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the item at array slot `index`.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::IndexedHeap;
    /// use heapkit::error::Error;
    ///
    /// let mut heap = IndexedHeap::new();
    /// heap.push("only").unwrap();
    /// assert_eq!(heap.get(0), Ok(&"only"));
    /// assert_eq!(heap.get(1), Err(Error::IndexOutOfRange { index: 1, len: 1 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Borrows the top item.
    #[inline]
    pub fn peek_top(&self) -> Result<&T, Error> {
        self.items.first().ok_or(Error::Empty)
    }

    /// Borrows the item at the opposite end of the order (the maximum of a
    /// min-heap).
    ///
    /// The answer is cached. On a cache miss only the leaf level
    /// `[len / 2, len)` is scanned, since the opposite end can never have a
    /// child.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::IndexedHeap;
    ///
    /// let mut heap = IndexedHeap::new();
    /// heap.push(10).unwrap();
    /// heap.push(-10).unwrap();
    /// heap.push(100).unwrap();
    /// assert_eq!(heap.peek_extremum(), Ok(&100));
    ///
    /// heap.remove(&100).unwrap();
    /// assert_eq!(heap.peek_extremum(), Ok(&10));
    /// ```
    pub fn peek_extremum(&mut self) -> Result<&T, Error> {
        if self.items.is_empty() {
            return Err(Error::Empty);
        }

        if self.peak.is_none() {
            #[cfg(feature = "metrics")]
            self.metrics.record_extremum_scan();

            let len = self.items.len();
            let mut best = len / 2;
            for slot in (best + 1)..len {
                if self.comparator.less(&self.items[best], &self.items[slot])? {
                    best = slot;
                }
            }
            self.peak = Some(self.items[best].clone());
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_extremum_cache_hit();
        }

        self.peak.as_ref().ok_or(Error::Empty)
    }

    /// Returns the most recent insertion that is still stored.
    ///
    /// `Ok(None)` means the last inserted item has since left the heap.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::IndexedHeap;
    ///
    /// let mut heap = IndexedHeap::new();
    /// heap.push(6).unwrap();
    /// heap.push(3).unwrap();
    /// assert_eq!(heap.get_last(), Ok(Some(&3)));
    ///
    /// heap.remove(&3).unwrap();
    /// assert_eq!(heap.get_last(), Ok(None));
    /// ```
    pub fn get_last(&self) -> Result<Option<&T>, Error> {
        if self.items.is_empty() {
            return Err(Error::Empty);
        }
        Ok(self.last.as_ref())
    }

    /// Pushes `item`.
    ///
    /// When the heap is at capacity the push is resolved as
    /// [`pushpop`](Self::pushpop) and the outcome reports what left.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyPresent`] if an equal item is stored
    /// - [`Error::ComparisonFailure`] if the comparator fails; the heap is
    ///   left unchanged
    pub fn push(&mut self, item: T) -> Result<PushOutcome<T>, Error> {
        self.push_with(item, Ties::KeepTop)
    }

    /// Pushes `item`, evicting the current top on ties when at capacity.
    ///
    /// Behaves like [`push`](Self::push) below capacity. At capacity,
    /// `item` is rejected only if it strictly precedes the top; otherwise it
    /// displaces the top. This matches pushing into an unbounded heap and
    /// then popping, where an equal newcomer settles below the resident.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::{IndexedHeap, PushOutcome};
    ///
    /// let mut heap = IndexedHeap::with_capacity(1);
    /// heap.push((5, 'a')).unwrap();
    /// assert_eq!(heap.push_displacing((4, 'z')), Ok(PushOutcome::Rejected((4, 'z'))));
    /// assert_eq!(heap.push_displacing((5, 'b')), Ok(PushOutcome::Displaced((5, 'a'))));
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn push_displacing(&mut self, item: T) -> Result<PushOutcome<T>, Error> {
        self.push_with(item, Ties::DisplaceTop)
    }

    fn push_with(&mut self, item: T, ties: Ties) -> Result<PushOutcome<T>, Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_push_call();

        self.ensure_absent(&item)?;

        if self.items.len() >= self.capacity {
            let outcome = match self.exchange_top(item, ties)? {
                Exchange::Kept(item) => PushOutcome::Rejected(item),
                Exchange::Displaced(old) => {
                    tracing::trace!(capacity = self.capacity, "push at capacity displaced top");
                    PushOutcome::Displaced(old)
                },
            };
            #[cfg(feature = "metrics")]
            match &outcome {
                PushOutcome::Rejected(_) => self.metrics.record_push_rejected(),
                _ => self.metrics.record_push_displaced(),
            }
            return Ok(outcome);
        }

        self.journal.clear();
        let slot = self.items.len();
        self.index.insert(item.clone(), slot);
        self.items.push(item);

        let slot = match self.sift_up(slot) {
            Ok(slot) => slot,
            Err(err) => {
                self.unwind();
                if let Some(item) = self.items.pop() {
                    self.index.remove(&item);
                }
                return Err(self.failed(err));
            },
        };

        self.note_inserted(slot);
        self.hooks.on_added(&self.items[slot]);
        #[cfg(feature = "metrics")]
        self.metrics.record_push_inserted();
        Ok(PushOutcome::Inserted)
    }

    /// Removes and returns the top item.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`] if the heap is empty
    /// - [`Error::ComparisonFailure`] if the comparator fails; the heap is
    ///   left unchanged
    pub fn pop(&mut self) -> Result<T, Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_call();

        let top = self.take_top()?;
        self.forget(&top);
        self.hooks.on_removed(&top);
        Ok(top)
    }

    /// Pushes `item` and pops the top in one step.
    ///
    /// Returns `item` unchanged, without touching the heap, when the heap is
    /// empty or `item` would be popped first anyway (the current top is not
    /// strictly above it). Otherwise `item` takes the root slot and the old
    /// top is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use heapkit::ds::IndexedHeap;
    ///
    /// let mut heap = IndexedHeap::new();
    /// heap.push(1).unwrap();
    /// assert_eq!(heap.pushpop(2), Ok(1));
    /// assert_eq!(heap.pushpop(0), Ok(0));
    /// assert_eq!(heap.pop(), Ok(2));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyPresent`] if an equal item is stored
    /// - [`Error::ComparisonFailure`] if the comparator fails; the heap is
    ///   left unchanged
    pub fn pushpop(&mut self, item: T) -> Result<T, Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pushpop_call();

        self.ensure_absent(&item)?;
        match self.exchange_top(item, Ties::KeepTop)? {
            Exchange::Kept(item) | Exchange::Displaced(item) => Ok(item),
        }
    }

    /// Pops the top and pushes `item` in one step, unconditionally.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`] if the heap is empty
    /// - [`Error::AlreadyPresent`] if an equal item is stored
    /// - [`Error::ComparisonFailure`] if the comparator fails; the heap is
    ///   left unchanged
    pub fn replace(&mut self, item: T) -> Result<T, Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_replace_call();

        if self.items.is_empty() {
            return Err(Error::Empty);
        }
        self.ensure_absent(&item)?;
        self.replace_root(item)
    }

    /// Removes the stored item equal to `item` and returns it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no equal item is stored
    /// - [`Error::ComparisonFailure`] if the comparator fails; the heap is
    ///   left unchanged
    pub fn remove<Q>(&mut self, item: &Q) -> Result<T, Error>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let slot = *self.index.get(item).ok_or(Error::NotFound)?;
        let removed = self.take_slot(slot)?;
        self.forget(&removed);
        self.hooks.on_removed(&removed);
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();
        Ok(removed)
    }

    /// Replaces the stored item equal to `item` with `item` and returns the
    /// previous one.
    ///
    /// Useful when `Eq`/`Hash` look at an identity field while the comparator
    /// looks at a priority field: the priority changes, the identity does not.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no equal item is stored
    /// - [`Error::ComparisonFailure`] if the comparator fails; the previous
    ///   item is restored in its slot
    pub fn update(&mut self, item: T) -> Result<T, Error> {
        #[cfg(feature = "metrics")]
        self.metrics.record_update_call();

        let slot = *self.index.get(&item).ok_or(Error::NotFound)?;

        self.journal.clear();
        let old = mem::replace(&mut self.items[slot], item);
        self.index.remove(&old);
        self.index.insert(self.items[slot].clone(), slot);

        let settled = match self.resift(slot) {
            Ok(settled) => settled,
            Err(err) => {
                self.unwind();
                self.index.remove(&self.items[slot]);
                let _rejected = mem::replace(&mut self.items[slot], old);
                self.index.insert(self.items[slot].clone(), slot);
                return Err(self.failed(err));
            },
        };

        self.forget(&old);
        self.note_inserted(settled);
        self.hooks.on_added(&self.items[settled]);
        self.hooks.on_removed(&old);
        Ok(old)
    }

    /// Sets the maximum number of stored items, popping from the top until
    /// the heap fits.
    ///
    /// # Errors
    ///
    /// [`Error::ComparisonFailure`] stops the shrink. Items already popped
    /// stay popped and the previous capacity is kept.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), Error> {
        if self.items.len() > capacity {
            tracing::debug!(
                len = self.items.len(),
                capacity,
                "shrinking indexed heap to new capacity"
            );
        }

        while self.items.len() > capacity {
            let evicted = self.take_top()?;
            self.forget(&evicted);
            self.hooks.on_removed(&evicted);
            #[cfg(feature = "metrics")]
            self.metrics.record_capacity_eviction();
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Removes every item, notifying the hooks once per item.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            tracing::debug!(len = self.items.len(), "clearing indexed heap");
        }
        for item in self.items.drain(..) {
            self.hooks.on_removed(&item);
        }
        self.index.clear();
        self.last = None;
        self.peak = None;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Pops every item, returning them in pop order.
    ///
    /// # Errors
    ///
    /// [`Error::ComparisonFailure`] stops the drain; items popped so far are
    /// dropped.
    pub fn drain_sorted(&mut self) -> Result<Vec<T>, Error> {
        let mut sorted = Vec::with_capacity(self.items.len());
        while !self.items.is_empty() {
            sorted.push(self.pop()?);
        }
        Ok(sorted)
    }

    /// Reserves array and index space for at least `additional` more items.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
        self.index.reserve(additional);
    }

    /// Shrinks internal storage to fit current contents.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
        self.index.shrink_to_fit();
        self.journal.shrink_to_fit();
    }

    /// Returns an approximate memory footprint in bytes.
    pub fn approx_bytes(&self) -> usize {
        mem::size_of::<Self>()
            + self.items.capacity() * mem::size_of::<T>()
            + self.index.capacity() * mem::size_of::<(T, usize)>()
            + self.journal.capacity() * mem::size_of::<(usize, usize)>()
    }

    /// Verifies the position index, heap order and capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.items.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.items.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.items.len() {
            return Err(InvariantError::new(format!(
                "index holds {} entries for {} items",
                self.index.len(),
                self.items.len()
            )));
        }
        for (slot, item) in self.items.iter().enumerate() {
            if self.index.get(item) != Some(&slot) {
                return Err(InvariantError::new(format!(
                    "index does not point at slot {}",
                    slot
                )));
            }
        }
        for slot in 1..self.items.len() {
            let parent = (slot - 1) / 2;
            match self.comparator.less(&self.items[slot], &self.items[parent]) {
                Ok(false) => {},
                Ok(true) => {
                    return Err(InvariantError::new(format!(
                        "slot {} sorts above its parent {}",
                        slot, parent
                    )));
                },
                Err(err) => {
                    return Err(InvariantError::new(format!(
                        "comparator failed at slot {}: {}",
                        slot, err
                    )));
                },
            }
        }
        if let Some(last) = &self.last
            && !self.index.contains_key(last)
        {
            return Err(InvariantError::new("last item is no longer stored"));
        }
        if let Some(peak) = &self.peak
            && !self.index.contains_key(peak)
        {
            return Err(InvariantError::new("cached extremum is no longer stored"));
        }
        Ok(())
    }

    // -- internals --------------------------------------------------------

    fn ensure_absent(&self, item: &T) -> Result<(), Error> {
        if !self.unchecked && self.index.contains_key(item) {
            return Err(Error::AlreadyPresent);
        }
        Ok(())
    }

    /// Keeps `item` if it would be popped first, otherwise swaps it for the top.
    fn exchange_top(&mut self, item: T, ties: Ties) -> Result<Exchange<T>, Error> {
        let Some(top) = self.items.first() else {
            return Ok(Exchange::Kept(item));
        };
        let ordered = match ties {
            Ties::KeepTop => self.comparator.less(top, &item),
            Ties::DisplaceTop => self.comparator.less(&item, top).map(|first| !first),
        };
        let displace = ordered.map_err(|err| self.failed(err))?;
        if !displace {
            return Ok(Exchange::Kept(item));
        }
        self.replace_root(item).map(Exchange::Displaced)
    }

    fn replace_root(&mut self, item: T) -> Result<T, Error> {
        self.journal.clear();
        let old = mem::replace(&mut self.items[0], item);
        self.index.remove(&old);
        self.index.insert(self.items[0].clone(), 0);

        let settled = match self.sift_down(0) {
            Ok(settled) => settled,
            Err(err) => {
                self.unwind();
                self.index.remove(&self.items[0]);
                let _rejected = mem::replace(&mut self.items[0], old);
                self.index.insert(self.items[0].clone(), 0);
                return Err(self.failed(err));
            },
        };

        self.forget(&old);
        self.note_inserted(settled);
        self.hooks.on_added(&self.items[settled]);
        self.hooks.on_removed(&old);
        Ok(old)
    }

    /// Detaches the root without bookkeeping or hooks.
    fn take_top(&mut self) -> Result<T, Error> {
        if self.items.is_empty() {
            return Err(Error::Empty);
        }
        self.take_slot(0)
    }

    /// Detaches the item at `slot` and repairs the heap around the hole.
    fn take_slot(&mut self, slot: usize) -> Result<T, Error> {
        self.journal.clear();
        let last = self.items.len() - 1;
        self.swap_raw(slot, last);
        let Some(removed) = self.items.pop() else {
            return Err(Error::Empty);
        };
        self.index.remove(&removed);

        if slot < self.items.len()
            && let Err(err) = self.resift(slot)
        {
            self.unwind();
            self.index.insert(removed.clone(), last);
            self.items.push(removed);
            self.swap_raw(slot, last);
            return Err(self.failed(err));
        }
        Ok(removed)
    }

    /// Moves the item at `slot` up, or down if it did not move up.
    fn resift(&mut self, slot: usize) -> Result<usize, ComparisonError> {
        let settled = self.sift_up(slot)?;
        if settled != slot {
            return Ok(settled);
        }
        self.sift_down(slot)
    }

    fn sift_up(&mut self, mut slot: usize) -> Result<usize, ComparisonError> {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.comparator.less(&self.items[slot], &self.items[parent])? {
                break;
            }
            self.swap_logged(slot, parent);
            slot = parent;
        }
        Ok(slot)
    }

    fn sift_down(&mut self, mut slot: usize) -> Result<usize, ComparisonError> {
        let len = self.items.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < len && self.comparator.less(&self.items[right], &self.items[left])? {
                child = right;
            }
            if !self.comparator.less(&self.items[child], &self.items[slot])? {
                break;
            }
            self.swap_logged(slot, child);
            slot = child;
        }
        Ok(slot)
    }

    fn swap_logged(&mut self, a: usize, b: usize) {
        self.swap_raw(a, b);
        self.journal.push((a, b));
        #[cfg(feature = "metrics")]
        self.metrics.record_sift_swap();
    }

    fn swap_raw(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        if let Some(slot) = self.index.get_mut(&self.items[a]) {
            *slot = a;
        }
        if let Some(slot) = self.index.get_mut(&self.items[b]) {
            *slot = b;
        }
    }

    /// Replays the journal backwards, undoing every logged swap.
    fn unwind(&mut self) {
        let undone = self.journal.len();
        while let Some((a, b)) = self.journal.pop() {
            self.swap_raw(a, b);
        }
        tracing::trace!(undone, "rolled back indexed heap after comparison failure");
    }

    fn failed(&mut self, err: ComparisonError) -> Error {
        #[cfg(feature = "metrics")]
        self.metrics.record_comparison_failure();
        Error::ComparisonFailure(err)
    }

    fn note_inserted(&mut self, slot: usize) {
        let item = &self.items[slot];
        self.last = Some(item.clone());

        if self.items.len() == 1 {
            self.peak = Some(item.clone());
            return;
        }
        // A failed comparison only costs the cache, never the insertion.
        if let Some(peak) = &self.peak {
            match self.comparator.less(peak, item) {
                Ok(true) => self.peak = Some(item.clone()),
                Ok(false) => {},
                Err(_) => self.peak = None,
            }
        }
    }

    fn forget(&mut self, item: &T) {
        if self.last.as_ref() == Some(item) {
            self.last = None;
        }
        if self.peak.as_ref() == Some(item) {
            self.peak = None;
        }
    }
}

enum Exchange<T> {
    Kept(T),
    Displaced(T),
}

/// Which side wins a tie against the top when pushing at capacity.
#[derive(Clone, Copy)]
enum Ties {
    KeepTop,
    DisplaceTop,
}

impl<T, C, H> Default for IndexedHeap<T, C, H>
where
    T: Eq + Hash + Clone,
    C: Comparator<T> + Default,
    H: HeapHooks<T> + Default,
{
    fn default() -> Self {
        Self::with_parts(usize::MAX, C::default(), H::default())
    }
}

impl<'a, T, C, H> IntoIterator for &'a IndexedHeap<T, C, H> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(feature = "metrics")]
impl<T, C, H> IndexedHeap<T, C, H>
where
    T: Eq + Hash + Clone,
    C: Comparator<T>,
    H: HeapHooks<T>,
{
    pub fn metrics_snapshot(&self) -> HeapMetricsSnapshot {
        HeapMetricsSnapshot {
            push_calls: self.metrics.push_calls,
            push_inserted: self.metrics.push_inserted,
            push_displaced: self.metrics.push_displaced,
            push_rejected: self.metrics.push_rejected,
            pop_calls: self.metrics.pop_calls,
            pushpop_calls: self.metrics.pushpop_calls,
            replace_calls: self.metrics.replace_calls,
            update_calls: self.metrics.update_calls,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            sift_swaps: self.metrics.sift_swaps,
            comparison_failures: self.metrics.comparison_failures,
            extremum_scans: self.metrics.extremum_scans,
            extremum_cache_hits: self.metrics.extremum_cache_hits,
            capacity_evictions: self.metrics.capacity_evictions,
            clears: self.metrics.clears,
            heap_len: self.items.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<T, C, H> MetricsSnapshotProvider<HeapMetricsSnapshot> for IndexedHeap<T, C, H>
where
    T: Eq + Hash + Clone,
    C: Comparator<T>,
    H: HeapHooks<T>,
{
    fn snapshot(&self) -> HeapMetricsSnapshot {
        self.metrics_snapshot()
    }
}


#[cfg(all(test, feature = "metrics"))]
mod metrics_tests {
    use super::*;
    use crate::ds::order::FnOrder;

    #[test]
    fn counters_follow_push_outcomes() {
        let mut heap = IndexedHeap::with_capacity(2);
        heap.push(3).unwrap();
        heap.push(1).unwrap(); // one swap
        heap.push(0).unwrap(); // rejected
        heap.push(5).unwrap(); // displaces 1, one swap
        heap.pop().unwrap();
        heap.remove(&9).unwrap_err();
        heap.remove(&5).unwrap();
        heap.clear();

        let snapshot = heap.metrics_snapshot();
        assert_eq!(snapshot.push_calls, 4);
        assert_eq!(snapshot.push_inserted, 2);
        assert_eq!(snapshot.push_rejected, 1);
        assert_eq!(snapshot.push_displaced, 1);
        assert_eq!(snapshot.pop_calls, 1);
        assert_eq!(snapshot.remove_calls, 2);
        assert_eq!(snapshot.remove_found, 1);
        assert_eq!(snapshot.sift_swaps, 2);
        assert_eq!(snapshot.comparison_failures, 0);
        assert_eq!(snapshot.clears, 1);
        assert_eq!(snapshot.heap_len, 0);
        assert_eq!(snapshot.capacity, 2);
    }

    #[test]
    fn rollback_counts_failure_and_keeps_outcomes() {
        let mut heap = IndexedHeap::with_comparator(FnOrder::new(|a: &i32, b: &i32| {
            if *a < 0 || *b < 0 {
                return Err(ComparisonError::new("negative"));
            }
            Ok(a < b)
        }));
        heap.push(4).unwrap();
        heap.push(2).unwrap();
        assert!(heap.push(-1).is_err());
        heap.set_capacity(3).unwrap();

        let snapshot = heap.snapshot();
        assert_eq!(snapshot.push_calls, 3);
        assert_eq!(snapshot.push_inserted, 2);
        assert_eq!(snapshot.comparison_failures, 1);
        assert_eq!(snapshot.heap_len, 2);
        assert_eq!(snapshot.capacity, 3);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Popping everything yields a sorted sequence of the unique inputs.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_heap_sort(values in prop::collection::hash_set(-65_535i32..65_535, 0..200)) {
            let mut heap = IndexedHeap::new();
            for &value in &values {
                heap.push(value).unwrap();
            }
            let mut expected: Vec<i32> = values.into_iter().collect();
            expected.sort();
            prop_assert_eq!(heap.drain_sorted().unwrap(), expected);
        }

        /// Index and order invariants hold after random push/remove/pop mixes.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_invariants_after_ops(
            capacity in 1usize..40,
            ops in prop::collection::vec((0u8..4, 0i32..64), 0..200)
        ) {
            let mut heap = IndexedHeap::with_capacity(capacity);
            for (op, value) in ops {
                let _ = match op {
                    0 | 1 => heap.push(value).map(|_| ()),
                    2 => heap.remove(&value).map(|_| ()),
                    _ => heap.pop().map(|_| ()),
                };
                prop_assert!(heap.len() <= heap.capacity());
                prop_assert!(heap.check_invariants().is_ok());
            }
        }

        /// push(x) followed by remove(x) restores size, top and extremum.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_push_remove_round_trip(
            values in prop::collection::hash_set(0i32..1000, 1..60),
            extra in 1000i32..2000
        ) {
            let mut heap = IndexedHeap::new();
            for &value in &values {
                heap.push(value).unwrap();
            }
            let len = heap.len();
            let top = *heap.peek_top().unwrap();
            let peak = *heap.peek_extremum().unwrap();

            heap.push(extra).unwrap();
            heap.remove(&extra).unwrap();

            prop_assert_eq!(heap.len(), len);
            prop_assert_eq!(*heap.peek_top().unwrap(), top);
            prop_assert_eq!(*heap.peek_extremum().unwrap(), peak);
        }

        /// The cached extremum always agrees with a full scan.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_extremum_matches_max(
            ops in prop::collection::vec((any::<bool>(), 0i32..100), 1..150)
        ) {
            let mut heap = IndexedHeap::new();
            for (push, value) in ops {
                if push {
                    let _ = heap.push(value);
                } else {
                    let _ = heap.remove(&value);
                }
                if let Some(max) = heap.iter().max().copied() {
                    prop_assert_eq!(heap.peek_extremum().copied(), Ok(max));
                }
            }
        }
    }
}
