//! Metrics collection and exposition.
//!
//! # Metrics
//! - `brb_monitor_ticks_total` (counter): ticks by outcome
//! - `brb_monitor_errors_total` (counter): failed ticks by error category
//! - `brb_stream_healthy` (gauge): 1=healthy, 0=unhealthy, last evaluated tick
//! - `brb_stream_bitrate_kbps` (gauge): last observed output bitrate
//! - `brb_scene_switches_total` (counter): scene changes issued, by target scene
//! - `brb_monitor_restarts_total` (counter): supervisor restarts after a panic
//! - `brb_obs_requests_total` / `brb_obs_request_duration_seconds`: OBS calls
//! - `brb_control_requests_total` (counter): control surface calls by route, status
//!
//! Updates are no-ops until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_tick(outcome: &'static str) {
    ::metrics::counter!("brb_monitor_ticks_total", "outcome" => outcome).increment(1);
}

pub fn record_monitor_error(category: &'static str) {
    ::metrics::counter!("brb_monitor_errors_total", "category" => category).increment(1);
}

pub fn record_verdict(healthy: bool, bitrate_kbps: f64) {
    ::metrics::gauge!("brb_stream_healthy").set(if healthy { 1.0 } else { 0.0 });
    ::metrics::gauge!("brb_stream_bitrate_kbps").set(bitrate_kbps);
}

pub fn record_scene_switch(scene: &str) {
    ::metrics::counter!("brb_scene_switches_total", "scene" => scene.to_string()).increment(1);
}

pub fn record_monitor_restart() {
    ::metrics::counter!("brb_monitor_restarts_total").increment(1);
}

pub fn record_obs_request(request_type: &str, ok: bool, start: Instant) {
    let result = if ok { "ok" } else { "error" };
    ::metrics::counter!(
        "brb_obs_requests_total",
        "request_type" => request_type.to_string(),
        "result" => result
    )
    .increment(1);
    ::metrics::histogram!("brb_obs_request_duration_seconds", "request_type" => request_type.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_control_request(route: &'static str, status: u16) {
    ::metrics::counter!(
        "brb_control_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
