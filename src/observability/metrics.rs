//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (requests, latency, table size, reloads)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by outcome and route
//! - `router_request_duration_seconds` (histogram): dispatch latency
//! - `router_table_entries` (gauge): active entries in the current table
//! - `router_table_excluded_groups` (gauge): groups left out by feature gates
//! - `router_reloads_total` (counter): table rebuilds by result
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Route label is the fully qualified name, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_metrics();
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

fn describe_metrics() {
    describe_counter!("router_requests_total", "Requests dispatched, by outcome and route");
    describe_histogram!("router_request_duration_seconds", "Time spent resolving and answering a request");
    describe_gauge!("router_table_entries", "Entries in the active route table");
    describe_gauge!("router_table_excluded_groups", "Route groups excluded by closed feature gates");
    describe_counter!("router_reloads_total", "Route table rebuilds, by result");
}

/// Record one dispatched request.
pub fn record_request(outcome: &'static str, route: &str, start: Instant) {
    counter!("router_requests_total", "outcome" => outcome, "route" => route.to_string()).increment(1);
    histogram!("router_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record the shape of a freshly built table.
pub fn record_table(entries: usize, excluded_groups: usize) {
    gauge!("router_table_entries").set(entries as f64);
    gauge!("router_table_excluded_groups").set(excluded_groups as f64);
}

/// Record a reload attempt.
pub fn record_reload(result: &'static str) {
    counter!("router_reloads_total", "result" => result).increment(1);
}
