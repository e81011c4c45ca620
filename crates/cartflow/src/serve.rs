//! Server wiring
//!
//! Builds the source queues, the worker pool, the analytics graph, the
//! drop source, the sinks and the four triggers, then parks until ctrl-c.
//! Teardown order matters: triggers first (no new rounds), then the
//! report endpoint, then the pipeline (queues close, pool drains).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use cartflow_config::Config;
use cartflow_pipeline::{AnalyticsPipeline, FlushCadence, GraphSettings};
use cartflow_runtime::{BoundedQueue, WorkerPool};
use cartflow_sinks::ResultSink;
use cartflow_sources::{DropSource, DropSourceConfig, ReportSource, ReportSourceConfig};
use cartflow_triggers::{Observer, RequestTrigger, TimerTrigger};
use tokio_util::sync::CancellationToken;

pub async fn run(config: Config) -> Result<()> {
    for (label, dir) in [
        ("reference", &config.directories.reference),
        ("log", &config.directories.log),
        ("request", &config.directories.request),
    ] {
        ensure!(
            dir.is_dir(),
            "missing {label} directory: {}",
            dir.display()
        );
    }

    let delimiter = config.pipeline.delimiter;
    let input_capacity = config.pipeline.input_queue_capacity;
    let log_queue = Arc::new(BoundedQueue::new(input_capacity));
    let reference_queue = Arc::new(BoundedQueue::new(input_capacity));
    let request_queue = Arc::new(BoundedQueue::new(input_capacity));

    let pipeline = Arc::new(AnalyticsPipeline::build(
        GraphSettings {
            output_queue_capacity: config.pipeline.output_queue_capacity,
        },
        WorkerPool::new(config.pipeline.worker_count),
        Arc::clone(&log_queue),
        Arc::clone(&reference_queue),
        Arc::clone(&request_queue),
    ));

    let source = Arc::new(DropSource::new(
        DropSourceConfig {
            reference_dir: config.directories.reference.clone(),
            log_dir: config.directories.log.clone(),
            request_dir: config.directories.request.clone(),
            reference_files: config.directories.reference_files.clone(),
            delimiter,
        },
        Arc::clone(&reference_queue),
        Arc::clone(&log_queue),
        Arc::clone(&request_queue),
    ));

    // Ingestion cadences: the source refills the queues, then the
    // pipeline runs a round - registration order is notification order
    let mut ingest = TimerTrigger::new(Duration::from_millis(config.triggers.ingest_period_ms));
    ingest.add_observer(Arc::clone(&source) as Arc<dyn Observer>);
    ingest.add_observer(Arc::clone(&pipeline) as Arc<dyn Observer>);

    let mut request = RequestTrigger::new(
        Duration::from_millis(config.triggers.request_min_ms),
        Duration::from_millis(config.triggers.request_max_ms),
    );
    request.add_observer(Arc::clone(&source) as Arc<dyn Observer>);
    request.add_observer(Arc::clone(&pipeline) as Arc<dyn Observer>);

    // Output cadences
    let mut minute_flush =
        TimerTrigger::new(Duration::from_millis(config.triggers.minute_flush_ms));
    let mut hour_flush = TimerTrigger::new(Duration::from_millis(config.triggers.hour_flush_ms));
    for analytic in pipeline.analytics() {
        let path = config.output.dir.join(format!("{}.csv", analytic.name));
        let sink = Arc::new(ResultSink::new(Arc::clone(&analytic.slot), path, delimiter));
        match analytic.cadence {
            FlushCadence::Minute => minute_flush.add_observer(sink as Arc<dyn Observer>),
            FlushCadence::Hour => hour_flush.add_observer(sink as Arc<dyn Observer>),
        }
    }

    // Report endpoint
    let cancel = CancellationToken::new();
    let mut endpoint = if config.rpc.enabled {
        let report = ReportSource::new(
            ReportSourceConfig {
                address: config.rpc.address.clone(),
                port: config.rpc.port,
                log_header: config.ingest.log_header.clone(),
                delimiter,
            },
            Arc::clone(&log_queue),
        );
        Some(tokio::spawn(report.run(cancel.clone())))
    } else {
        None
    };

    ingest.activate()?;
    request.activate()?;
    minute_flush.activate()?;
    hour_flush.activate()?;

    tracing::info!(
        workers = config.pipeline.worker_count,
        rpc = config.rpc.enabled,
        output = %config.output.dir.display(),
        "cartflow running, ctrl-c to stop"
    );

    // Park until ctrl-c, or until the report endpoint dies (a bind
    // conflict is fatal configuration, not something to limp past)
    match endpoint.as_mut() {
        Some(handle) => {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal.context("listening for ctrl-c")?;
                }
                result = handle => {
                    result.context("report endpoint task")??;
                    anyhow::bail!("report endpoint stopped unexpectedly");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("listening for ctrl-c")?;
        }
    }

    tracing::info!("shutting down");
    ingest.deactivate().await?;
    request.deactivate().await?;
    minute_flush.deactivate().await?;
    hour_flush.deactivate().await?;

    cancel.cancel();
    if let Some(handle) = endpoint {
        match handle.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(%error, "report endpoint shutdown error"),
            Err(error) => tracing::warn!(%error, "report endpoint task panicked"),
        }
    }

    pipeline.shutdown().await;
    tracing::info!("clean shutdown");
    Ok(())
}
