use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::{BoundedMapMetricsSnapshot, HeapMetricsSnapshot};
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for heap and map metrics snapshots.
///
/// This exporter writes in the Prometheus text exposition format so it can be
/// scraped by Prometheus or forwarded to an OpenTelemetry collector.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_metric(&self, kind: &str, suffix: &str, value: u64) {
        let name = self.metric_name(suffix);
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_metric("counter", suffix, value);
    }

    fn write_gauge(&self, suffix: &str, value: u64) {
        self.write_metric("gauge", suffix, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<HeapMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &HeapMetricsSnapshot) {
        self.write_counter("push_calls_total", snapshot.push_calls);
        self.write_counter("push_inserted_total", snapshot.push_inserted);
        self.write_counter("push_displaced_total", snapshot.push_displaced);
        self.write_counter("push_rejected_total", snapshot.push_rejected);
        self.write_counter("pop_calls_total", snapshot.pop_calls);
        self.write_counter("pushpop_calls_total", snapshot.pushpop_calls);
        self.write_counter("replace_calls_total", snapshot.replace_calls);
        self.write_counter("update_calls_total", snapshot.update_calls);
        self.write_counter("remove_calls_total", snapshot.remove_calls);
        self.write_counter("remove_found_total", snapshot.remove_found);
        self.write_counter("sift_swaps_total", snapshot.sift_swaps);
        self.write_counter("comparison_failures_total", snapshot.comparison_failures);
        self.write_counter("extremum_scans_total", snapshot.extremum_scans);
        self.write_counter("extremum_cache_hits_total", snapshot.extremum_cache_hits);
        self.write_counter("capacity_evictions_total", snapshot.capacity_evictions);
        self.write_counter("clears_total", snapshot.clears);
        self.write_gauge("heap_len", snapshot.heap_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}

impl<W: Write + Send + Sync> MetricsExporter<BoundedMapMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &BoundedMapMetricsSnapshot) {
        self.write_counter("get_calls_total", snapshot.get_calls);
        self.write_counter("get_hits_total", snapshot.get_hits);
        self.write_counter("get_misses_total", snapshot.get_misses);
        self.write_counter("insert_calls_total", snapshot.insert_calls);
        self.write_counter("insert_new_total", snapshot.insert_new);
        self.write_counter("insert_updates_total", snapshot.insert_updates);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter("remove_calls_total", snapshot.remove_calls);
        self.write_counter("remove_found_total", snapshot.remove_found);
        self.write_counter("comparison_failures_total", snapshot.comparison_failures);
        self.write_counter("clears_total", snapshot.clears);
        self.write_gauge("map_len", snapshot.map_len as u64);
        self.write_gauge("capacity", snapshot.capacity as u64);
    }
}
