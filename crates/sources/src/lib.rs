//! Cartflow - Sources
//!
//! Ingress that turns raw telemetry into tables on the source queues.
//!
//! # Available Sources
//!
//! - **Drop** - scans the reference, log and request drop directories on
//!   trigger ticks and decodes new files
//! - **Report** - unary HTTP endpoint receiving timed log batches from the
//!   storefront simulator
//!
//! # Design Principles
//!
//! - **Observer-driven scanning**: the drop source does no timing of its
//!   own; the ingest and request triggers tell it when to look
//! - **Once per path**: a file is decoded the first time its path is seen
//!   and never again in this process; there is no lockfile protocol
//! - **Best effort**: per-file decode failures are logged and skipped, a
//!   bad report batch answers 400, and ingestion carries on

mod drop;
mod error;
mod report;

pub use drop::{DropSource, DropSourceConfig, DropSourceMetrics, DropSourceSnapshot};
pub use error::{Result, SourceError};
pub use report::{ReportRequest, ReportSource, ReportSourceConfig, ReportSourceMetrics};
