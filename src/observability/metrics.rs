//! Metrics collection and exposition.
//!
//! # Metrics
//! - `filedrop_requests_total` (counter): requests by matched route, status
//! - `filedrop_token_rejections_total` (counter): requests refused by the gate
//! - `filedrop_uploads_total` (counter): files stored
//! - `filedrop_upload_bytes_total` (counter): bytes stored by uploads
//! - `filedrop_captures_total` (counter): requests captured to disk
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &str, status: u16) {
    counter!(
        "filedrop_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_token_rejection() {
    counter!("filedrop_token_rejections_total").increment(1);
}

pub fn record_upload(bytes: u64) {
    counter!("filedrop_uploads_total").increment(1);
    counter!("filedrop_upload_bytes_total").increment(bytes);
}

pub fn record_capture() {
    counter!("filedrop_captures_total").increment(1);
}
