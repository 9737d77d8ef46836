//! Metrics collection and exposition.
//!
//! # Metrics
//! - `boards_config_translations_total` (counter): host config translations applied
//! - `boards_requests_forwarded_total` (counter): requests handed to the boards app, by status
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is opt-in from the binary

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one applied host configuration translation.
pub fn record_translation() {
    ::metrics::counter!("boards_config_translations_total").increment(1);
}

/// Count one forwarded request with the status the boards app returned.
pub fn record_forward(status: u16) {
    ::metrics::counter!("boards_requests_forwarded_total", "status" => status.to_string())
        .increment(1);
}
