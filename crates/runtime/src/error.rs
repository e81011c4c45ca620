//! Runtime error types

use thiserror::Error;

/// Sentinel returned once a queue has been closed
///
/// Producers see it immediately; consumers see it after the remaining
/// buffered items have been drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue closed")]
pub struct QueueClosed;
