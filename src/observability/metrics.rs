//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_route_decisions_total` (counter): decisions by kind and handler
//! - `edge_forward_requests_total` (counter): forwards by backend and status
//! - `edge_forward_duration_seconds` (histogram): forward latency by backend
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::RoutingDecision;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(decision: &RoutingDecision) {
    let handler = match decision {
        RoutingDecision::Local { handler } => handler.as_str(),
        RoutingDecision::Forward { .. } => "none",
    };
    metrics::counter!(
        "edge_route_decisions_total",
        "decision" => decision.kind(),
        "handler" => handler
    )
    .increment(1);
}

pub fn record_forward(backend: &str, status: u16, start: Instant) {
    metrics::counter!(
        "edge_forward_requests_total",
        "backend" => backend.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "edge_forward_duration_seconds",
        "backend" => backend.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
