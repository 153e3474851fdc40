//! Metrics collection and exposition.
//!
//! # Metrics
//! - `trail_dispatch_total` (counter): dispatches by convention and outcome
//! - `trail_dispatch_duration_seconds` (histogram): setup + chain latency
//! - `trail_protocol_violations_total` (counter): continuation handlers that
//!   neither advanced nor responded
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are static strings only

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Record one finished dispatch.
pub fn record_dispatch(convention: &'static str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "trail_dispatch_total",
        "convention" => convention,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("trail_dispatch_duration_seconds", "convention" => convention)
        .record(started.elapsed().as_secs_f64());
}

/// Record a handler protocol violation.
pub fn record_protocol_violation(convention: &'static str) {
    metrics::counter!("trail_protocol_violations_total", "convention" => convention)
        .increment(1);
}
