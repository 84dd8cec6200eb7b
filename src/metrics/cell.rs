use std::cell::Cell;

/// A counter that can be bumped through a shared reference.
///
/// Read-only container operations (`BoundedMap::get`) record through `&self`,
/// so their counters live in a `Cell`.
///
/// `MetricsCell` is `!Sync`, which keeps the owning container `!Sync` when the
/// `metrics` feature is on. Containers in this crate require external
/// serialization anyway.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get() + 1);
    }
}
