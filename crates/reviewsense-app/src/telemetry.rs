//! Logging and metrics setup for the binary

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("reviewsense=debug,reviewsense_core=debug,reviewsense_classifiers=debug,reviewsense_generation=debug,reviewsense_pipeline=debug,reviewsense_app=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("reviewsense=info,reviewsense_classifiers=info,reviewsense_generation=info,reviewsense_pipeline=info,reviewsense_app=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "reviewsense_requests_total",
        "Total number of non-empty reviews analyzed"
    );
    metrics::describe_counter!(
        "reviewsense_empty_requests_total",
        "Total number of empty reviews skipped without model calls"
    );
    metrics::describe_counter!("reviewsense_errors_total", "Total number of errors by type");
    metrics::describe_histogram!(
        "reviewsense_pipeline_latency_us",
        metrics::Unit::Microseconds,
        "Pipeline latency in microseconds by phase"
    );

    tracing::info!("Metrics exporter initialized");
    Ok(handle)
}
