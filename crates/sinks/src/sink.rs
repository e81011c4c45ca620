//! Result sink
//!
//! One sink per analytic, bound to either the per-minute or the per-hour
//! flush trigger. The slot lock is held only for the take; encoding and
//! the rename happen after release so no merge task ever waits on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cartflow_codec::encode_file;
use cartflow_frame::Table;
use cartflow_runtime::ResultSlot;
use cartflow_triggers::Observer;

/// Counters for one result sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Snapshots written to disk
    pub flushes: AtomicU64,
    /// Ticks with nothing accumulated
    pub empty_ticks: AtomicU64,
    /// Failed writes
    pub write_errors: AtomicU64,
}

impl SinkMetrics {
    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            flushes: self.flushes.load(Ordering::Relaxed),
            empty_ticks: self.empty_ticks.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkMetricsSnapshot {
    pub flushes: u64,
    pub empty_ticks: u64,
    pub write_errors: u64,
}

/// Writes one analytic's accumulated result on every time tick
pub struct ResultSink {
    slot: Arc<ResultSlot>,
    result_path: PathBuf,
    latency_path: PathBuf,
    delimiter: char,
    metrics: Arc<SinkMetrics>,
}

impl ResultSink {
    /// Bind a slot to its output files
    ///
    /// `times_<file name>` next to the result file receives the latency
    /// samples collected since the previous flush.
    pub fn new(slot: Arc<ResultSlot>, result_path: PathBuf, delimiter: char) -> Self {
        let latency_path = match (result_path.parent(), result_path.file_name()) {
            (Some(parent), Some(name)) => {
                parent.join(format!("times_{}", name.to_string_lossy()))
            }
            _ => PathBuf::from(format!("times_{}", result_path.display())),
        };
        Self {
            slot,
            result_path,
            latency_path,
            delimiter,
            metrics: Arc::new(SinkMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    fn write(&self, table: &Table, path: &Path) {
        match encode_file(table, path, self.delimiter) {
            Ok(()) => {
                tracing::debug!(
                    analytic = self.slot.name(),
                    file = %path.display(),
                    rows = table.row_count(),
                    "flushed analytic"
                );
            }
            Err(error) => {
                tracing::error!(
                    analytic = self.slot.name(),
                    file = %path.display(),
                    %error,
                    "failed to write analytic"
                );
                self.metrics.write_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[async_trait]
impl Observer for ResultSink {
    /// Snapshot the slot and persist it
    async fn on_time_tick(&self) {
        let (result, latency) = self.slot.take();

        let Some(result) = result else {
            tracing::warn!(analytic = self.slot.name(), "no data to flush");
            self.metrics.empty_ticks.fetch_add(1, Ordering::Relaxed);
            return;
        };

        self.write(&result, &self.result_path);
        if let Some(latency) = latency {
            self.write(&latency, &self.latency_path);
        }
        self.metrics.flushes.fetch_add(1, Ordering::Relaxed);
    }

    // Request ticks are not a flush signal
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod tests;
