//! Report ingestion endpoint
//!
//! Unary HTTP surface for the storefront simulator: one POST per report
//! cycle carrying a millisecond timestamp and a batch of log lines, one
//! data row per line. The decoded table inherits the request's timestamp
//! and lands on the log queue; the response is an empty acknowledgement.
//!
//! # Endpoints
//!
//! - `POST /v1/report` - ingest a timed log batch
//! - `GET /health` - liveness check

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use cartflow_codec::{DecodeOptions, decode_lines};
use cartflow_frame::Table;
use cartflow_runtime::BoundedQueue;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SourceError};

/// Configuration for the report endpoint
#[derive(Debug, Clone)]
pub struct ReportSourceConfig {
    /// Bind address
    pub address: String,

    /// Bind port
    pub port: u16,

    /// Header applied to the batch's lines
    pub log_header: String,

    /// Cell separator inside each line
    pub delimiter: char,
}

impl ReportSourceConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// One report cycle from the simulator
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    /// Milliseconds since the epoch, taken at the sender
    pub timestamp: i64,

    /// One log line per element, trailing newline optional
    #[serde(default)]
    pub log: Vec<String>,
}

/// Empty acknowledgement
#[derive(Debug, Serialize)]
struct ReportAck {}

/// Counters for the report endpoint
#[derive(Debug, Default)]
pub struct ReportSourceMetrics {
    /// Requests received
    pub requests: AtomicU64,
    /// Rows decoded and pushed
    pub rows_ingested: AtomicU64,
    /// Requests rejected with a client error
    pub rejected: AtomicU64,
}

/// HTTP source receiving timed log batches
pub struct ReportSource {
    config: ReportSourceConfig,
    log_tx: Arc<BoundedQueue<Table>>,
    metrics: Arc<ReportSourceMetrics>,
}

/// Shared state for the route handlers
struct HandlerState {
    log_tx: Arc<BoundedQueue<Table>>,
    options: DecodeOptions,
    log_header: String,
    metrics: Arc<ReportSourceMetrics>,
}

impl ReportSource {
    pub fn new(config: ReportSourceConfig, log_tx: Arc<BoundedQueue<Table>>) -> Self {
        Self {
            config,
            log_tx,
            metrics: Arc::new(ReportSourceMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<ReportSourceMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Bind and serve until cancelled
    ///
    /// A bind failure is a startup error and surfaces to the caller; the
    /// process treats it as fatal (port conflicts exit non-zero).
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let bind_address = self.config.bind_address();
        let listener = TcpListener::bind(&bind_address)
            .await
            .map_err(|e| SourceError::Bind {
                address: bind_address.clone(),
                source: e,
            })?;

        tracing::info!(address = %bind_address, "report endpoint listening");

        let state = Arc::new(HandlerState {
            log_tx: self.log_tx,
            options: DecodeOptions::with_delimiter(self.config.delimiter),
            log_header: self.config.log_header,
            metrics: Arc::clone(&self.metrics),
        });

        let app = Router::new()
            .route("/v1/report", post(ingest_report))
            .route("/health", get(health_check))
            .with_state(state);

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move { cancel.cancelled().await });
        let result = server
            .await
            .map_err(|e| SourceError::Serve(e.to_string()));

        tracing::info!("report endpoint stopped");
        result
    }
}

/// POST /v1/report - decode a timed log batch onto the log queue
async fn ingest_report(
    State(state): State<Arc<HandlerState>>,
    Json(request): Json<ReportRequest>,
) -> Response {
    state.metrics.requests.fetch_add(1, Ordering::Relaxed);

    let mut table = match decode_lines(&state.log_header, &request.log, &state.options) {
        Ok(table) => table,
        Err(error) => {
            state.metrics.rejected.fetch_add(1, Ordering::Relaxed);
            return error_response(StatusCode::BAD_REQUEST, &error.to_string());
        }
    };
    table.set_timestamp_ms(request.timestamp);

    let rows = table.row_count();
    if state.log_tx.push(table).await.is_err() {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "shutting down");
    }

    state
        .metrics
        .rows_ingested
        .fetch_add(rows as u64, Ordering::Relaxed);
    tracing::debug!(rows, timestamp = request.timestamp, "report batch ingested");

    (StatusCode::OK, Json(ReportAck {})).into_response()
}

/// GET /health - liveness check
async fn health_check() -> Response {
    (StatusCode::OK, "ok").into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
