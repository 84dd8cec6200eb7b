pub mod indexed_heap;
pub mod order;

pub use indexed_heap::{IndexedHeap, PushOutcome};
pub use order::{ByValue, FnOrder, MaxOrder, MinOrder, PartialMaxOrder, PartialMinOrder};
