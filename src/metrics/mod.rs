//! Optional counters for [`IndexedHeap`](crate::ds::IndexedHeap) and
//! [`BoundedMap`](crate::policy::bounded_map::BoundedMap).
//!
//! Compiled only with the `metrics` feature.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
