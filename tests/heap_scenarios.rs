// ==============================================
// INDEXED HEAP SCENARIOS (integration)
// ==============================================
//
// End-to-end behavior of IndexedHeap through the public API only: ordering,
// capacity handling, caches, hooks and comparator failures.

use std::cell::Cell;
use std::rc::Rc;

use heapkit::builder::IndexedHeapBuilder;
use heapkit::ds::{FnOrder, IndexedHeap, MaxOrder, PushOutcome};
use heapkit::error::{ComparisonError, Error};
use heapkit::traits::HeapHooks;

// ==============================================
// Ordering
// ==============================================

#[test]
fn pushes_then_pops_in_ascending_order() {
    let mut heap = IndexedHeap::new();
    for value in [5, 3, 8, 1] {
        heap.push(value).unwrap();
    }
    assert_eq!(heap.peek_top(), Ok(&1));

    let popped: Vec<i32> = std::iter::from_fn(|| heap.pop().ok()).collect();
    assert_eq!(popped, vec![1, 3, 5, 8]);
}

#[test]
fn removing_only_item_leaves_empty_heap() {
    let mut heap = IndexedHeap::new();
    heap.push("solo").unwrap();
    assert_eq!(heap.remove("solo"), Ok("solo"));
    assert_eq!(heap.len(), 0);
    assert_eq!(heap.peek_top(), Err(Error::Empty));
}

#[test]
fn pushpop_below_top_leaves_heap_untouched() {
    let mut heap = IndexedHeap::new();
    for value in [10, 20, 30] {
        heap.push(value).unwrap();
    }
    let before = heap.items().to_vec();

    assert_eq!(heap.pushpop(5), Ok(5));
    assert_eq!(heap.items(), before.as_slice());
    assert_eq!(heap.get_last(), Ok(Some(&30)));
}

#[test]
fn string_heap_accepts_borrowed_lookups() {
    let mut heap: IndexedHeap<String> = IndexedHeap::new();
    heap.push("pear".to_string()).unwrap();
    heap.push("apple".to_string()).unwrap();
    assert!(heap.contains("pear"));
    assert_eq!(heap.remove("pear").as_deref(), Ok("pear"));
    assert_eq!(heap.peek_top().map(String::as_str), Ok("apple"));
}

// ==============================================
// Capacity
// ==============================================

#[test]
fn shrinking_capacity_pops_from_top() {
    let mut heap = IndexedHeap::new();
    for value in [1, 2, 3] {
        heap.push(value).unwrap();
    }
    heap.set_capacity(1).unwrap();
    assert_eq!(heap.len(), 1);
    assert_eq!(heap.items(), &[3]);
    heap.check_invariants().unwrap();
}

#[test]
fn bounded_heap_keeps_largest_values() {
    let mut heap = IndexedHeap::with_capacity(3);
    let mut evicted = Vec::new();
    for value in [4, 9, 1, 7, 3, 8] {
        if let Some(item) = heap.push(value).unwrap().into_evicted() {
            evicted.push(item);
        }
    }
    evicted.sort();
    assert_eq!(evicted, vec![1, 3, 4]);
    assert_eq!(heap.drain_sorted(), Ok(vec![7, 8, 9]));
}

#[test]
fn push_at_capacity_distinguishes_displaced_and_rejected() {
    let mut heap = IndexedHeapBuilder::new()
        .capacity(1)
        .comparator(MaxOrder)
        .build::<u8>();
    assert_eq!(heap.push(5), Ok(PushOutcome::Inserted));
    assert_eq!(heap.push(9), Ok(PushOutcome::Rejected(9)));
    assert_eq!(heap.push(2), Ok(PushOutcome::Displaced(5)));
    assert_eq!(heap.items(), &[2]);
}

// ==============================================
// Hooks
// ==============================================

#[derive(Debug, Default)]
struct Balance {
    live: i64,
    events: usize,
}

impl HeapHooks<u32> for Balance {
    fn on_added(&mut self, _item: &u32) {
        self.live += 1;
        self.events += 1;
    }

    fn on_removed(&mut self, _item: &u32) {
        self.live -= 1;
        self.events += 1;
    }
}

#[test]
fn hooks_balance_matches_len() {
    let mut heap = IndexedHeapBuilder::new()
        .capacity(4)
        .hooks(Balance::default())
        .build::<u32>();

    for value in 0..10 {
        heap.push(value * 7 % 11).unwrap();
    }
    heap.remove(&heap.items()[1].clone()).unwrap();
    heap.pushpop(100).unwrap();
    heap.replace(50).unwrap();
    heap.pop().unwrap();
    heap.set_capacity(1).unwrap();
    assert_eq!(heap.hooks().live, heap.len() as i64);

    heap.clear();
    assert_eq!(heap.hooks().live, 0);
}

#[test]
fn rejected_push_fires_no_hooks() {
    let mut heap = IndexedHeapBuilder::new()
        .capacity(1)
        .hooks(Balance::default())
        .build::<u32>();
    heap.push(10).unwrap();
    let events = heap.hooks().events;
    assert_eq!(heap.push(1), Ok(PushOutcome::Rejected(1)));
    assert_eq!(heap.hooks().events, events);
}

// ==============================================
// Comparator failures
// ==============================================

#[test]
fn comparator_failure_rolls_back_every_operation() {
    let armed = Rc::new(Cell::new(false));
    let trip = armed.clone();
    let mut heap = IndexedHeap::with_comparator(FnOrder::new(move |a: &i64, b: &i64| {
        if trip.get() {
            Err(ComparisonError::new("comparator disabled"))
        } else {
            Ok(a < b)
        }
    }));
    for value in [8, 3, 5, 1, 9, 2, 7] {
        heap.push(value).unwrap();
    }
    let snapshot = heap.items().to_vec();
    let top = *heap.peek_top().unwrap();

    armed.set(true);
    assert!(heap.push(0).unwrap_err().is_comparison_failure());
    assert!(heap.pop().unwrap_err().is_comparison_failure());
    assert!(heap.pushpop(4).unwrap_err().is_comparison_failure());
    assert!(heap.replace(6).unwrap_err().is_comparison_failure());
    assert!(heap.remove(&3).unwrap_err().is_comparison_failure());
    assert!(heap.set_capacity(2).unwrap_err().is_comparison_failure());
    armed.set(false);

    assert_eq!(heap.items(), snapshot.as_slice());
    assert_eq!(heap.peek_top(), Ok(&top));
    assert_eq!(heap.capacity(), usize::MAX);
    heap.check_invariants().unwrap();
}

#[test]
fn comparison_failure_is_reported_with_source() {
    use std::error::Error as _;

    let mut heap = IndexedHeap::with_comparator(FnOrder::new(|_: &u8, _: &u8| {
        Err(ComparisonError::new("opaque values"))
    }));
    heap.push(1).unwrap();
    let err = heap.push(2).unwrap_err();
    assert_eq!(err.to_string(), "failed to compare values: opaque values");
    assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("opaque values"));
}
