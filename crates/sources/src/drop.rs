//! Drop-directory ingestion
//!
//! On a time tick the source scans the reference and log directories; on a
//! request tick it scans the request directory. Every regular file whose
//! absolute path has not been observed before in this process is decoded
//! and pushed to its queue. Partially written files may decode short and
//! be re-ingested on a later tick; that is accepted behavior.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cartflow_codec::{DecodeOptions, decode_file};
use cartflow_frame::Table;
use cartflow_runtime::BoundedQueue;
use cartflow_triggers::Observer;

/// Configuration for the drop source
#[derive(Debug, Clone)]
pub struct DropSourceConfig {
    /// Reference CSV drops
    pub reference_dir: PathBuf,

    /// Event-log drops
    pub log_dir: PathBuf,

    /// Request drops, scanned on request ticks
    pub request_dir: PathBuf,

    /// File names expected in the reference directory; empty means all
    pub reference_files: Vec<String>,

    /// Cell separator of the dropped files
    pub delimiter: char,
}

/// Counters for the drop source
#[derive(Debug, Default)]
pub struct DropSourceMetrics {
    /// Files decoded and pushed
    pub files_ingested: AtomicU64,
    /// Rows across all ingested files
    pub rows_ingested: AtomicU64,
    /// Files skipped because decoding failed
    pub decode_errors: AtomicU64,
}

impl DropSourceMetrics {
    pub fn snapshot(&self) -> DropSourceSnapshot {
        DropSourceSnapshot {
            files_ingested: self.files_ingested.load(Ordering::Relaxed),
            rows_ingested: self.rows_ingested.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of drop source counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropSourceSnapshot {
    pub files_ingested: u64,
    pub rows_ingested: u64,
    pub decode_errors: u64,
}

/// Scans drop directories and feeds the source queues
pub struct DropSource {
    config: DropSourceConfig,
    reference_tx: Arc<BoundedQueue<Table>>,
    log_tx: Arc<BoundedQueue<Table>>,
    request_tx: Arc<BoundedQueue<Table>>,
    processed: Mutex<HashSet<PathBuf>>,
    metrics: Arc<DropSourceMetrics>,
}

impl DropSource {
    pub fn new(
        config: DropSourceConfig,
        reference_tx: Arc<BoundedQueue<Table>>,
        log_tx: Arc<BoundedQueue<Table>>,
        request_tx: Arc<BoundedQueue<Table>>,
    ) -> Self {
        Self {
            config,
            reference_tx,
            log_tx,
            request_tx,
            processed: Mutex::new(HashSet::new()),
            metrics: Arc::new(DropSourceMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<DropSourceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Regular files in `dir` not processed before, in name order
    ///
    /// The scan is non-recursive. A directory that cannot be listed logs a
    /// warning and yields nothing; startup validation already rejected
    /// genuinely missing directories.
    fn new_files(&self, dir: &Path, expected: &[String]) -> Vec<PathBuf> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(dir = %dir.display(), %error, "cannot list drop directory");
                return Vec::new();
            }
        };

        let processed = self.processed.lock().expect("processed set poisoned");
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| !processed.contains(path))
            .filter(|path| {
                expected.is_empty()
                    || path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| expected.iter().any(|e| e.as_str() == name))
            })
            .collect();
        files.sort();
        files
    }

    /// Decode every new file and push the tables onto `queue`
    async fn ingest(
        &self,
        files: Vec<PathBuf>,
        options: DecodeOptions,
        queue: &BoundedQueue<Table>,
    ) {
        for path in files {
            self.processed
                .lock()
                .expect("processed set poisoned")
                .insert(path.clone());

            let table = match decode_file(&path, &options) {
                Ok(table) => table,
                Err(error) => {
                    tracing::warn!(file = %path.display(), %error, "skipping file");
                    self.metrics.decode_errors.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            tracing::info!(
                file = %path.display(),
                rows = table.row_count(),
                "ingested drop file"
            );
            self.metrics.files_ingested.fetch_add(1, Ordering::Relaxed);
            self.metrics
                .rows_ingested
                .fetch_add(table.row_count() as u64, Ordering::Relaxed);

            if queue.push(table).await.is_err() {
                tracing::debug!("source queue closed, stopping ingest pass");
                return;
            }
        }
    }
}

#[async_trait]
impl Observer for DropSource {
    /// Scan the reference and log directories
    async fn on_time_tick(&self) {
        let reference = self.new_files(&self.config.reference_dir, &self.config.reference_files);
        let csv_options = DecodeOptions::with_delimiter(self.config.delimiter).stop_on_empty();
        self.ingest(reference, csv_options, &self.reference_tx)
            .await;

        let logs = self.new_files(&self.config.log_dir, &[]);
        let text_options = DecodeOptions::with_delimiter(self.config.delimiter);
        self.ingest(logs, text_options, &self.log_tx).await;
    }

    /// Scan the request directory
    async fn on_request_tick(&self) {
        let requests = self.new_files(&self.config.request_dir, &[]);
        let text_options = DecodeOptions::with_delimiter(self.config.delimiter);
        self.ingest(requests, text_options, &self.request_tx).await;
    }
}

#[cfg(test)]
#[path = "drop_test.rs"]
mod tests;
