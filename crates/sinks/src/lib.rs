//! Cartflow - Sinks
//!
//! Trigger-driven output: on every time tick a [`ResultSink`] snapshots
//! its analytic's [`ResultSlot`](cartflow_runtime::ResultSlot), releases
//! the lock, and only then writes
//! the result file and the matching `times_*` latency file. An empty slot
//! is a warning, not an error - the analytic simply had no arrivals since
//! the last flush.

mod sink;

pub use sink::{ResultSink, SinkMetrics, SinkMetricsSnapshot};
