//! Metrics collection and exposition.
//!
//! # Metrics
//! - `podconfig_feed_operations_total` (counter): feed mutations by op, outcome
//! - `podconfig_reloads_total` (counter): service reloads by outcome
//! - `podconfig_pending_changes` (gauge): changes waiting for a reload
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until an
//!   exporter is installed
//! - The Prometheus exporter is optional and runs its own listener

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the outcome of a feed mutation (`add`, `modify`, `remove`).
pub fn record_feed_operation(op: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    metrics::counter!("podconfig_feed_operations_total", "op" => op, "outcome" => outcome).increment(1);
}

/// Record the outcome of a service reload.
pub fn record_reload(outcome: &'static str) {
    metrics::counter!("podconfig_reloads_total", "outcome" => outcome).increment(1);
}

/// Publish the current number of pending changes.
pub fn record_pending_changes(count: usize) {
    metrics::gauge!("podconfig_pending_changes").set(count as f64);
}
