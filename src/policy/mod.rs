pub mod bounded_map;

pub use bounded_map::{BoundedMap, Entry};
