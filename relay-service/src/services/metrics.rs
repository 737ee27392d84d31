//! Prometheus metrics for relay-service.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Registry together with the metrics registered in it.
struct RelayMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    upstream_latency_seconds: HistogramVec,
    upstream_errors_total: IntCounterVec,
}

impl RelayMetrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("relay_requests_total", "Total generation requests by outcome"),
            &["model", "outcome"],
        )?;

        let upstream_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "relay_upstream_latency_seconds",
                "Upstream chat API latency in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
            &["model"],
        )?;

        let upstream_errors_total = IntCounterVec::new(
            Opts::new("relay_upstream_errors_total", "Total failed generations"),
            &["error_type"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(upstream_latency_seconds.clone()))?;
        registry.register(Box::new(upstream_errors_total.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            upstream_latency_seconds,
            upstream_errors_total,
        })
    }
}

static METRICS: OnceLock<RelayMetrics> = OnceLock::new();

/// Initialize all metrics. Later calls are no-ops.
///
/// Concurrent callers may each build a set, but only one is installed and
/// it is always a complete registry with its own metrics.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    if METRICS.set(RelayMetrics::new()?).is_ok() {
        tracing::info!("Prometheus metrics initialized");
    }
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let Some(metrics) = METRICS.get() else {
        tracing::error!("Metrics registry not initialized");
        return "# Metrics registry not initialized\n".to_string();
    };

    let metric_families = metrics.registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record the outcome of one generation request.
pub fn record_request(model: &str, outcome: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .requests_total
            .with_label_values(&[model, outcome])
            .inc();
    }
}

/// Record upstream latency.
pub fn record_upstream_latency(model: &str, duration_secs: f64) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .upstream_latency_seconds
            .with_label_values(&[model])
            .observe(duration_secs);
    }
}

/// Record a failed generation.
pub fn record_upstream_error(error_type: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .upstream_errors_total
            .with_label_values(&[error_type])
            .inc();
    }
}
