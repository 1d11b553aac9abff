//! Request identification and access logging.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Keep the headers the client actually sent, before any layer adds its own
//! - Log method, path and peer address of each routed request
//! - Count requests per matched route and status

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::observability::metrics;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Issues a fresh UUID v4 for requests that arrive without an ID.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request headers as received from the client.
#[derive(Clone, Debug)]
pub struct ClientHeaders(pub HeaderMap);

/// Middleware: stash the inbound headers in [`ClientHeaders`]. Must be the
/// outermost layer so the request ID header is not yet present.
pub async fn keep_client_headers(mut request: Request, next: Next) -> Response {
    let headers = request.headers().clone();
    request.extensions_mut().insert(ClientHeaders(headers));
    next.run(request).await
}

/// Middleware: one log line and one counter increment per request.
pub async fn log_request(request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_id = request
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        peer = %peer,
        "Request"
    );

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16());
    response
}
