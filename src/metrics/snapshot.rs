/// Point-in-time copy of [`IndexedHeap`](crate::ds::IndexedHeap) counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapMetricsSnapshot {
    pub push_calls: u64,
    pub push_inserted: u64,
    pub push_displaced: u64,
    pub push_rejected: u64,

    pub pop_calls: u64,
    pub pushpop_calls: u64,
    pub replace_calls: u64,
    pub update_calls: u64,
    pub remove_calls: u64,
    pub remove_found: u64,

    pub sift_swaps: u64,
    pub comparison_failures: u64, // each one rolled the heap back
    pub extremum_scans: u64,
    pub extremum_cache_hits: u64,
    pub capacity_evictions: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub heap_len: usize,
    pub capacity: usize,
}

/// Point-in-time copy of [`BoundedMap`](crate::policy::bounded_map::BoundedMap) counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoundedMapMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,

    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub comparison_failures: u64,
    pub clears: u64,

    pub map_len: usize,
    pub capacity: usize,
}
