//! Cartflow Configuration
//!
//! TOML-based configuration loading with sensible defaults. A minimal
//! config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use cartflow_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[pipeline]\nworker_count = 4").unwrap();
//! assert_eq!(config.pipeline.worker_count, 4);
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [directories]
//! reference = "mock/files/csv"
//! log = "mock/files/log"
//! request = "mock/files/request"
//!
//! [output]
//! dir = "processed"
//! ```

mod error;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Queue capacities, worker count and the wire delimiter
    pub pipeline: PipelineConfig,

    /// Watched drop directories
    pub directories: DirectoriesConfig,

    /// Analytic output location
    pub output: OutputConfig,

    /// Tick cadences for ingestion and flushing
    pub triggers: TriggersConfig,

    /// Report ingestion endpoint
    pub rpc: RpcConfig,

    /// Log-batch decoding
    pub ingest: IngestConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid
    /// TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.input_queue_capacity == 0 {
            return Err(ConfigError::validation("input_queue_capacity must be > 0"));
        }
        if self.pipeline.output_queue_capacity == 0 {
            return Err(ConfigError::validation("output_queue_capacity must be > 0"));
        }
        if self.pipeline.worker_count == 0 {
            return Err(ConfigError::validation("worker_count must be > 0"));
        }
        if self.triggers.request_min_ms > self.triggers.request_max_ms {
            return Err(ConfigError::validation(
                "request_min_ms must not exceed request_max_ms",
            ));
        }
        if self.ingest.log_header.is_empty() {
            return Err(ConfigError::validation("log_header must not be empty"));
        }
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        Ok(config)
    }
}

/// Queue capacities, worker count and the wire delimiter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Capacity of the source-facing queues (reference, log, request)
    pub input_queue_capacity: usize,

    /// Capacity of every queue inside the analytics graph
    pub output_queue_capacity: usize,

    /// Number of pool workers running handler and merge passes
    pub worker_count: usize,

    /// Cell separator used for both input and output
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_queue_capacity: 100,
            output_queue_capacity: 100,
            worker_count: 10,
            delimiter: ';',
        }
    }
}

/// Watched drop directories
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DirectoriesConfig {
    /// Reference CSV drops (products, orders, stock, users)
    pub reference: PathBuf,

    /// Event-log drops
    pub log: PathBuf,

    /// Request drops, scanned on request ticks
    pub request: PathBuf,

    /// File names expected in the reference directory; empty means all
    pub reference_files: Vec<String>,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            reference: PathBuf::from("mock/files/csv"),
            log: PathBuf::from("mock/files/log"),
            request: PathBuf::from("mock/files/request"),
            reference_files: vec![
                "products.csv".into(),
                "orders.csv".into(),
                "stock.csv".into(),
                "users.csv".into(),
            ],
        }
    }
}

/// Analytic output location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one file per analytic plus `times_*` files
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("processed"),
        }
    }
}

/// Tick cadences, all in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TriggersConfig {
    /// Ingestion scan period
    pub ingest_period_ms: u64,

    /// Request trigger's sampled period, inclusive bounds
    pub request_min_ms: u64,
    pub request_max_ms: u64,

    /// Flush cadence for the per-minute analytics
    pub minute_flush_ms: u64,

    /// Flush cadence for the per-hour analytics
    pub hour_flush_ms: u64,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            ingest_period_ms: 1_000,
            request_min_ms: 1_000,
            request_max_ms: 3_000,
            minute_flush_ms: 60_000,
            hour_flush_ms: 3_600_000,
        }
    }
}

/// Report ingestion endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Whether the endpoint is started at all
    pub enabled: bool,

    /// Bind address
    pub address: String,

    /// Bind port
    pub port: u16,
}

impl RpcConfig {
    /// Full bind address string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "0.0.0.0".into(),
            port: 50051,
        }
    }
}

/// Log-batch decoding
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Header applied to report batches, whose lines are data rows only
    pub log_header: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            log_header: "timestamp;type;content;extra_1;extra_2".into(),
        }
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
