use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{HeapMetricsRecorder, MapMetricsReadRecorder, MapMetricsRecorder};

#[derive(Debug, Default)]
pub struct HeapMetrics {
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
    pub comparison_failures: u64,
    pub extremum_scans: u64,
    pub extremum_cache_hits: u64,
    pub capacity_evictions: u64,
    pub clears: u64,
}

#[derive(Debug, Default)]
pub struct BoundedMapMetrics {
    pub get_calls: MetricsCell,
    pub get_hits: MetricsCell,
    pub get_misses: MetricsCell,
    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub comparison_failures: u64,
    pub clears: u64,
}

impl HeapMetricsRecorder for HeapMetrics {
    fn record_push_call(&mut self) {
        self.push_calls += 1;
    }

    fn record_push_inserted(&mut self) {
        self.push_inserted += 1;
    }

    fn record_push_displaced(&mut self) {
        self.push_displaced += 1;
    }

    fn record_push_rejected(&mut self) {
        self.push_rejected += 1;
    }

    fn record_pop_call(&mut self) {
        self.pop_calls += 1;
    }

    fn record_pushpop_call(&mut self) {
        self.pushpop_calls += 1;
    }

    fn record_replace_call(&mut self) {
        self.replace_calls += 1;
    }

    fn record_update_call(&mut self) {
        self.update_calls += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_sift_swap(&mut self) {
        self.sift_swaps += 1;
    }

    fn record_comparison_failure(&mut self) {
        self.comparison_failures += 1;
    }

    fn record_extremum_scan(&mut self) {
        self.extremum_scans += 1;
    }

    fn record_extremum_cache_hit(&mut self) {
        self.extremum_cache_hits += 1;
    }

    fn record_capacity_eviction(&mut self) {
        self.capacity_evictions += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl MapMetricsRecorder for BoundedMapMetrics {
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_comparison_failure(&mut self) {
        self.comparison_failures += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl MapMetricsReadRecorder for &BoundedMapMetrics {
    fn record_get_hit(&self) {
        self.get_calls.incr();
        self.get_hits.incr();
    }

    fn record_get_miss(&self) {
        self.get_calls.incr();
        self.get_misses.incr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_recorder_bumps_counters() {
        let mut metrics = HeapMetrics::default();
        metrics.record_push_call();
        metrics.record_push_inserted();
        metrics.record_sift_swap();
        metrics.record_sift_swap();
        assert_eq!(metrics.push_calls, 1);
        assert_eq!(metrics.push_inserted, 1);
        assert_eq!(metrics.sift_swaps, 2);
    }

    #[test]
    fn map_read_recorder_through_shared_reference() {
        let metrics = BoundedMapMetrics::default();
        (&metrics).record_get_hit();
        (&metrics).record_get_miss();
        (&metrics).record_get_miss();
        assert_eq!(metrics.get_calls.get(), 3);
        assert_eq!(metrics.get_hits.get(), 1);
        assert_eq!(metrics.get_misses.get(), 2);
    }
}
