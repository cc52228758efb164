//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, service
//! - `gateway_request_duration_seconds` (histogram): latency by service
//!
//! # Design Decisions
//! - Low-overhead updates via the `metrics` macros
//! - Exporter is optional; recording is a no-op when not installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    let latency = start.elapsed().as_secs_f64();

    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "service" => service.to_string()
    )
    .record(latency);
}
