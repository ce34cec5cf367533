//! Metrics collection and exposition.
//!
//! # Metrics
//! - `error_pages_requests_total` (counter): served pages by format, code
//! - `error_pages_request_duration_seconds` (histogram): dispatch latency
//! - `error_pages_cache_lookups_total` (counter): cache hits and misses
//! - `error_pages_render_failures_total` (counter): failed renders by format
//! - `error_pages_cache_entries` (gauge): entries left after each sweep
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(format: &'static str, code: u16, start: Instant) {
    counter!("error_pages_requests_total", "format" => format, "code" => code.to_string()).increment(1);
    histogram!("error_pages_request_duration_seconds", "format" => format)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("error_pages_cache_lookups_total", "result" => result).increment(1);
}

pub fn record_render_failure(format: &'static str) {
    counter!("error_pages_render_failures_total", "format" => format).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("error_pages_cache_entries").set(entries as f64);
}
