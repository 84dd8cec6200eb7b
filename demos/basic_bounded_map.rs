//! Example demonstrating BoundedMap: value-ordered eviction, upserts and
//! lifecycle hooks.
//!
//! Run with: cargo run --example basic_bounded_map

use heapkit::ds::MinOrder;
use heapkit::error::Error;
use heapkit::policy::bounded_map::BoundedMap;
use heapkit::traits::MapHooks;

/// Prints every insertion and removal.
struct Announce;

impl MapHooks<&'static str, u32> for Announce {
    fn on_added(&mut self, key: &&'static str, value: &u32) {
        println!("   + {key} = {value}");
    }

    fn on_removed(&mut self, key: &&'static str, value: &u32) {
        println!("   - {key} = {value}");
    }
}

fn main() -> Result<(), Error> {
    println!("=== BoundedMap Example ===\n");

    println!("1. Keep the two highest scores (lowest score is evicted)");
    let mut scores: BoundedMap<&'static str, u32, MinOrder, Announce> =
        BoundedMap::with_parts(2, MinOrder, Announce);
    scores.set("a", 10)?;
    scores.set("b", 5)?;
    let evicted = scores.set("c", 7)?;
    println!("   evicted by capacity: {:?}", evicted);
    println!("   get(\"b\") -> {:?}", scores.get("b"));
    println!();

    println!("2. Upsert re-sorts the entry in place");
    let previous = scores.set_or_replace("a", 1)?;
    println!("   previous value of a: {:?}", previous);
    println!("   next to be evicted: {:?}", scores.peek_extremum_key()?);
    println!("   safest entry: {:?}", scores.peak_key()?);
    println!();

    println!("3. Shrinking the capacity evicts from the top");
    scores.set_capacity(1)?;
    println!("   remaining keys: {:?}", scores.keys());

    Ok(())
}
