//! Cartflow - Streaming ETL engine for e-commerce telemetry
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (queues of 100, 10 workers)
//! cartflow
//!
//! # Override capacities and worker count positionally
//! cartflow 200 50 4
//!
//! # Point at a config file
//! cartflow --config configs/cartflow.toml
//! ```

mod serve;

use std::path::PathBuf;

use anyhow::Result;
use cartflow_config::{Config, LogFormat};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Streaming ETL engine for e-commerce telemetry
#[derive(Parser, Debug)]
#[command(name = "cartflow")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Capacity of the source-facing queues
    input_queue_capacity: Option<usize>,

    /// Capacity of the queues inside the analytics graph
    output_queue_capacity: Option<usize>,

    /// Number of pool workers
    worker_count: Option<usize>,

    /// Path to configuration file
    #[arg(short, long, default_value = "configs/cartflow.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.config.is_file() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };

    // Positional arguments override the file
    if let Some(capacity) = cli.input_queue_capacity {
        config.pipeline.input_queue_capacity = capacity;
    }
    if let Some(capacity) = cli.output_queue_capacity {
        config.pipeline.output_queue_capacity = capacity;
    }
    if let Some(workers) = cli.worker_count {
        config.pipeline.worker_count = workers;
    }
    config.validate()?;

    let level = cli
        .log_level
        .unwrap_or_else(|| config.log.level.as_str().to_string());
    init_logging(&level, config.log.format)?;

    if !cli.config.is_file() {
        tracing::info!(config = %cli.config.display(), "config file not found, using defaults");
    }

    serve::run(config).await
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    match format {
        LogFormat::Console => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_thread_ids(false))
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .init();
        }
    }

    Ok(())
}
