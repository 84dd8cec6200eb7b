#![no_main]

use heapkit::ds::{IndexedHeap, MaxOrder};
use libfuzzer_sys::fuzz_target;

// Fuzz property-based tests for IndexedHeap
//
// Tests specific invariants and properties:
// - Pop order is sorted (min and max heaps)
// - push + remove restores size, top and extremum
// - get_last follows the surviving insertion
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let test_type = data[0] % 3;

    match test_type {
        0 => test_pop_order(&data[1..]),
        1 => test_push_remove_round_trip(&data[1..]),
        2 => test_last_inserted(&data[1..]),
        _ => unreachable!(),
    }
});

// Property: draining yields ascending order for a min-heap and descending for a max-heap
fn test_pop_order(data: &[u8]) {
    let mut min_heap = IndexedHeap::new();
    let mut max_heap = IndexedHeap::with_comparator(MaxOrder);
    for &byte in data {
        let _ = min_heap.push(byte);
        let _ = max_heap.push(byte);
    }

    let ascending = min_heap.drain_sorted().unwrap();
    assert!(ascending.windows(2).all(|pair| pair[0] < pair[1]));

    let descending = max_heap.drain_sorted().unwrap();
    assert!(descending.windows(2).all(|pair| pair[0] > pair[1]));
    assert_eq!(ascending.len(), descending.len());
}

// Property: push(x) then remove(x) leaves size, top and extremum unchanged
fn test_push_remove_round_trip(data: &[u8]) {
    let mut heap = IndexedHeap::new();
    for &byte in &data[1..] {
        let _ = heap.push(u16::from(byte));
    }
    if heap.is_empty() {
        return;
    }

    let extra = 256 + u16::from(data[0]);
    let len = heap.len();
    let top = *heap.peek_top().unwrap();
    let peak = *heap.peek_extremum().unwrap();

    heap.push(extra).unwrap();
    heap.remove(&extra).unwrap();

    assert_eq!(heap.len(), len);
    assert_eq!(*heap.peek_top().unwrap(), top);
    assert_eq!(*heap.peek_extremum().unwrap(), peak);
}

// Property: get_last is the last stored push until that item leaves
fn test_last_inserted(data: &[u8]) {
    let mut heap = IndexedHeap::new();
    let mut last = None;
    for &byte in data {
        if byte % 4 == 0 {
            if let Ok(top) = heap.pop() {
                if Some(top) == last {
                    last = None;
                }
            }
        } else if heap.push(byte).is_ok() {
            last = Some(byte);
        }

        match heap.get_last() {
            Ok(found) => assert_eq!(found.copied(), last),
            Err(_) => assert!(heap.is_empty()),
        }
    }
}
