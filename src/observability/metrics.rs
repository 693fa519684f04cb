//! Metrics collection and exposition.
//!
//! # Metrics
//! - `failover_probe_total` (counter): probes by resource kind and outcome
//! - `failover_resource_reachable` (gauge): 1=reachable, 0=unreachable, per resource
//! - `failover_active` (gauge): 1=serving fallback, 0=serving primary
//! - `failover_transitions_total` (counter): mode changes by target mode
//! - `failover_round_duration_seconds` (histogram): probe round latency
//! - `failover_http_requests_total` (counter): requests by route, status
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::probe::ProbeResult;
use crate::health::state::FailoverMode;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_probe(result: &ProbeResult) {
    let outcome = match &result.failure {
        None => "reachable",
        Some(err) => err.label(),
    };
    counter!(
        "failover_probe_total",
        "resource" => result.resource.kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    gauge!(
        "failover_resource_reachable",
        "resource" => result.resource.kind.as_str(),
        "url" => result.resource.url.clone()
    )
    .set(if result.reachable { 1.0 } else { 0.0 });
}

pub fn record_round(mode: FailoverMode, duration: Duration) {
    gauge!("failover_active").set(if mode.is_active() { 1.0 } else { 0.0 });
    histogram!("failover_round_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_transition(to: FailoverMode) {
    counter!("failover_transitions_total", "to" => to.as_str()).increment(1);
}

pub fn record_request(route: &'static str, status: u16) {
    counter!(
        "failover_http_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
