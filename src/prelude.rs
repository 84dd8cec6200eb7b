pub use crate::builder::{BoundedMapBuilder, IndexedHeapBuilder};
pub use crate::ds::{
    ByValue, FnOrder, IndexedHeap, MaxOrder, MinOrder, PartialMaxOrder, PartialMinOrder,
    PushOutcome,
};
pub use crate::error::{ComparisonError, Error, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::exporter::PrometheusTextExporter;
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{BoundedMapMetricsSnapshot, HeapMetricsSnapshot};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
pub use crate::policy::bounded_map::BoundedMap;
pub use crate::traits::{Comparator, HeapHooks, MapHooks};
