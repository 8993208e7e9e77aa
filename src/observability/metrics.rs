//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, target
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - One record call per request, at dispatch exit
//! - Prometheus exporter is optional; recording without it is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint ready"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record the outcome of one dispatched request.
pub fn record_request(method: &str, status: u16, target: &str, start: Instant) {
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "target" => target.to_string()
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "target" => target.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
