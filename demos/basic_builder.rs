//! Example demonstrating the IndexedHeapBuilder and BoundedMapBuilder APIs.
//!
//! Run with: cargo run --example basic_builder

use heapkit::builder::{BoundedMapBuilder, IndexedHeapBuilder};
use heapkit::ds::{FnOrder, MaxOrder, PartialMinOrder};
use heapkit::error::{ComparisonError, Error};

fn main() -> Result<(), Error> {
    println!("=== Builder Examples ===\n");

    // Example 1: max-heap with a capacity
    println!("1. Bounded max-heap");
    let mut heap = IndexedHeapBuilder::new()
        .capacity(2)
        .comparator(MaxOrder)
        .build::<u32>();
    heap.push(10)?;
    heap.push(30)?;
    println!("   push 20 -> {:?} (smaller values are kept)", heap.push(20)?);
    println!("   top: {:?}", heap.peek_top()?);
    println!();

    // Example 2: partial order that refuses NaN
    println!("2. Floats with PartialMinOrder");
    let mut floats = IndexedHeapBuilder::new()
        .comparator(PartialMinOrder)
        .build::<OrderedBits>();
    floats.push(OrderedBits(2.5))?;
    floats.push(OrderedBits(0.5))?;
    match floats.push(OrderedBits(f64::NAN)) {
        Ok(_) => println!("   NaN stored"),
        Err(err) => println!("   NaN refused: {err}"),
    }
    println!("   len after refusal: {}", floats.len());
    println!();

    // Example 3: map evicting the longest string first
    println!("3. BoundedMap with a closure comparator");
    let by_len = FnOrder::new(|a: &String, b: &String| -> Result<bool, ComparisonError> {
        Ok(a.len() > b.len())
    });
    let mut words = BoundedMapBuilder::new(2).comparator(by_len).build::<u8, String>();
    words.set(1, "tiny".to_string())?;
    words.set(2, "enormous".to_string())?;
    let evicted = words.set(3, "mid".to_string())?;
    println!("   evicted: {:?}", evicted);

    Ok(())
}

/// `f64` wrapper hashed by bit pattern so it can be stored in a heap.
#[derive(Debug, Clone, Copy, PartialOrd)]
struct OrderedBits(f64);

impl PartialEq for OrderedBits {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedBits {}

impl std::hash::Hash for OrderedBits {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}
