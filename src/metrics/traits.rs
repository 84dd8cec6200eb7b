//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and export are separate responsibilities, each
//! behind a small trait, so counters never leak into container logic.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────┐   ┌─────────────────────────────┐
//!   │    HeapMetricsRecorder      │   │     MapMetricsRecorder      │
//!   │  push/pop/remove/sift       │   │  insert/evict/remove/clear  │
//!   │  rollback/extremum scans    │   ├─────────────────────────────┤
//!   │                             │   │   MapMetricsReadRecorder    │
//!   │                             │   │  get hit/miss (&self)       │
//!   └──────────────┬──────────────┘   └──────────────┬──────────────┘
//!                  │                                 │
//!                  ▼                                 ▼
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters for [`IndexedHeap`](crate::ds::IndexedHeap).
pub trait HeapMetricsRecorder {
    fn record_push_call(&mut self);
    fn record_push_inserted(&mut self);
    fn record_push_displaced(&mut self);
    fn record_push_rejected(&mut self);
    fn record_pop_call(&mut self);
    fn record_pushpop_call(&mut self);
    fn record_replace_call(&mut self);
    fn record_update_call(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_sift_swap(&mut self);
    fn record_comparison_failure(&mut self);
    fn record_extremum_scan(&mut self);
    fn record_extremum_cache_hit(&mut self);
    fn record_capacity_eviction(&mut self);
    fn record_clear(&mut self);
}

/// Counters for [`BoundedMap`](crate::policy::bounded_map::BoundedMap).
pub trait MapMetricsRecorder {
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_comparison_failure(&mut self);
    fn record_clear(&mut self);
}

/// Read-path counters for `BoundedMap`, recorded through `&self`.
pub trait MapMetricsReadRecorder {
    fn record_get_hit(&self);
    fn record_get_miss(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
