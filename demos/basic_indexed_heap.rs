//! Example demonstrating IndexedHeap: ordering, arbitrary removal and
//! bounded top-k tracking.
//!
//! Run with: cargo run --example basic_indexed_heap

use heapkit::ds::{IndexedHeap, PushOutcome};
use heapkit::error::Error;

fn main() -> Result<(), Error> {
    println!("=== IndexedHeap Example ===\n");

    println!("1. Min-heap with arbitrary removal");
    let mut heap = IndexedHeap::new();
    for value in [5, 3, 8, 1, 9, 4] {
        heap.push(value)?;
    }
    println!("   top: {:?}", heap.peek_top()?);
    println!("   max: {:?} (leaf scan)", heap.peek_extremum()?);

    heap.remove(&8)?;
    println!("   removed 8, position of 9 is now {:?}", heap.position(&9));
    println!("   last inserted still stored: {:?}", heap.get_last()?);
    println!("   drained: {:?}", heap.drain_sorted()?);
    println!();

    println!("2. Top-3 largest values with a bounded heap");
    let mut top3 = IndexedHeap::with_capacity(3);
    for value in [42, 7, 19, 88, 3, 56] {
        match top3.push(value)? {
            PushOutcome::Inserted => println!("   {:>2} stored", value),
            PushOutcome::Displaced(old) => println!("   {:>2} stored, {} displaced", value, old),
            PushOutcome::Rejected(_) => println!("   {:>2} rejected", value),
        }
    }
    println!("   kept: {:?}", top3.drain_sorted()?);

    Ok(())
}
