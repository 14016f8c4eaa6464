//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by service and status
//! - `relay_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - One record point per request, at the response boundary
//! - Labels stay low-cardinality: service name and status code only

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to bind is logged, not fatal; the relay works without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record one handled request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "relay_request_duration_seconds",
        "service" => service
    )
    .record(start.elapsed().as_secs_f64());
}
