//! Handler drain loop
//!
//! A `HandlerNode` wires one operator between an input queue and an
//! ordered list of output queues. Its `drain` pass pops while the input is
//! non-empty, applies the operator and fans the result out as one deep
//! copy per output queue. The assembler resubmits drain passes to the
//! worker pool on every ingest tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cartflow_frame::Table;
use cartflow_runtime::BoundedQueue;

use crate::Handler;

/// Per-node counters
#[derive(Debug, Default)]
pub struct NodeMetrics {
    /// Batches popped from the input queue
    pub batches_in: AtomicU64,
    /// Batches fanned out (counted once per input batch)
    pub batches_out: AtomicU64,
    /// Batches dropped because the operator failed
    pub batches_dropped: AtomicU64,
}

impl NodeMetrics {
    pub fn snapshot(&self) -> NodeMetricsSnapshot {
        NodeMetricsSnapshot {
            batches_in: self.batches_in.load(Ordering::Relaxed),
            batches_out: self.batches_out.load(Ordering::Relaxed),
            batches_dropped: self.batches_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of node counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMetricsSnapshot {
    pub batches_in: u64,
    pub batches_out: u64,
    pub batches_dropped: u64,
}

/// One operator between an input queue and its output queues
pub struct HandlerNode {
    label: String,
    handler: Box<dyn Handler>,
    input: Arc<BoundedQueue<Table>>,
    outputs: Vec<Arc<BoundedQueue<Table>>>,
    metrics: Arc<NodeMetrics>,
}

impl HandlerNode {
    pub fn new(
        label: impl Into<String>,
        handler: impl Handler + 'static,
        input: Arc<BoundedQueue<Table>>,
        outputs: Vec<Arc<BoundedQueue<Table>>>,
    ) -> Self {
        Self {
            label: label.into(),
            handler: Box::new(handler),
            input,
            outputs,
            metrics: Arc::new(NodeMetrics::default()),
        }
    }

    /// Stable label for logs ("filter:type=User" and the like)
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn metrics(&self) -> Arc<NodeMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Process everything currently buffered on the input queue
    ///
    /// Stops when the input is empty at the moment of the check, or when a
    /// queue reports the closed sentinel during teardown. Operator errors
    /// drop the offending batch and keep the pass alive.
    pub async fn drain(&self) {
        while !self.input.is_empty() {
            let Ok(table) = self.input.pop().await else {
                break;
            };
            self.metrics.batches_in.fetch_add(1, Ordering::Relaxed);

            let result = match self.handler.apply(table) {
                Ok(result) => result,
                Err(error) => {
                    tracing::warn!(
                        node = %self.label,
                        handler = self.handler.name(),
                        %error,
                        "operator failed, dropping batch"
                    );
                    self.metrics.batches_dropped.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            // Fan-out: one deep copy per downstream queue, then the
            // working table is released
            for output in &self.outputs {
                if output.push(result.clone()).await.is_err() {
                    tracing::debug!(node = %self.label, "output queue closed, stopping drain");
                    return;
                }
            }
            self.metrics.batches_out.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl std::fmt::Debug for HandlerNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerNode")
            .field("label", &self.label)
            .field("handler", &self.handler.name())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod tests;
