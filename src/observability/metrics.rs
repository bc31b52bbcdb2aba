//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define inspector metrics (requests, latency, captures, store errors)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `inspector_http_requests_total` (counter): requests by method, route, status
//! - `inspector_http_request_duration_seconds` (histogram): latency distribution
//! - `inspector_captures_total` (counter): stored captures by method
//! - `inspector_capture_failures_total` (counter): captures lost to store errors
//! - `inspector_body_fallbacks_total` (counter): bodies degraded to raw text / null
//! - `inspector_store_errors_total` (counter): store failures by operation
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Route label is the matched route template, never the raw path

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    counter!("inspector_http_requests_total", &labels).increment(1);
    histogram!("inspector_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a stored capture.
pub fn record_capture(method: &str) {
    counter!("inspector_captures_total", "method" => method.to_string()).increment(1);
}

/// Record a capture that could not be stored.
pub fn record_capture_failure() {
    counter!("inspector_capture_failures_total").increment(1);
}

/// Record a body that fell back to raw text or null.
pub fn record_body_fallback(reason: &'static str) {
    counter!("inspector_body_fallbacks_total", "reason" => reason).increment(1);
}

/// Record a failed store operation.
pub fn record_store_error(operation: &'static str) {
    counter!("inspector_store_errors_total", "operation" => operation).increment(1);
}
