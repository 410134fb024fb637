//! Metrics collection.
//!
//! # Metrics
//! - `secret_box_calls_total` (counter): contract calls by operation, outcome
//! - `secret_box_proxy_healthy` (gauge): 1=reachable, 0=unreachable
//!
//! Recording is a no-op until a recorder is installed: either the
//! embedding application's own, or the Prometheus one from [`init_metrics`].

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install a Prometheus recorder as the global recorder.
///
/// The returned handle renders everything recorded so far in the
/// Prometheus text format.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Count one contract call.
pub fn record_contract_call(operation: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("secret_box_calls_total", "operation" => operation, "outcome" => outcome).increment(1);
}

/// Record proxy reachability.
pub fn record_proxy_health(healthy: bool) {
    gauge!("secret_box_proxy_healthy").set(if healthy { 1.0 } else { 0.0 });
}
