//! Raw request capture.
//!
//! The whole request (request line, headers in received order, body) is
//! written to `<root>/<ip>_<YYYYMMDD_HHMMSS>.txt`. Two requests from the
//! same IP in the same second share a file; the later one wins.

use std::net::SocketAddr;

use axum::{
    body::{self, Bytes},
    extract::{ConnectInfo, Request, State},
    http::request::Parts,
};
use chrono::Utc;

use crate::http::request::ClientHeaders;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::storage::capture_file_name;

pub async fn capture_request(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Result<String, ApiError> {
    let (mut parts, body) = request.into_parts();
    if let Some(ClientHeaders(headers)) = parts.extensions.remove::<ClientHeaders>() {
        parts.headers = headers;
    }
    let body = body::to_bytes(body, usize::MAX).await.map_err(|e| {
        tracing::warn!(error = %e, "Could not read request body");
        ApiError::BadRequest("Error reading request body")
    })?;

    let record = serialize_request(&parts, &body);
    let file_name = capture_file_name(peer.ip(), Utc::now());

    state
        .storage
        .write_capture(&file_name, &record)
        .await
        .map_err(|e| ApiError::internal("Error saving request log", e))?;

    metrics::record_capture();
    tracing::info!(file = %file_name, "Full request saved");
    Ok(format!("Request saved as: {}\n", file_name))
}

/// Serialize a request in HTTP/1.x wire form.
pub fn serialize_request(parts: &Parts, body: &Bytes) -> Vec<u8> {
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let mut out = Vec::with_capacity(256 + body.len());
    out.extend_from_slice(format!("{} {} {:?}\r\n", parts.method, target, parts.version).as_bytes());
    for (name, value) in &parts.headers {
        out.extend_from_slice(name.as_str().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(body);
    out
}
