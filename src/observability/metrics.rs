//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_decisions_total` (counter): requests by routing decision
//! - `site_resolve_duration_seconds` (histogram): time from request to decision
//! - `site_config_reloads_total` (counter): reload attempts by result

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(decision: &'static str, start: Instant) {
    counter!("site_decisions_total", "decision" => decision).increment(1);
    histogram!("site_resolve_duration_seconds", "decision" => decision)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("site_config_reloads_total", "result" => result).increment(1);
}
