//! Route table.
//!
//! Binds fixed paths to handlers. Each route is wrapped by the token gate on
//! its own, so an unknown path falls through to a plain 404 without ever
//! reaching a handler.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handlers::{browse_path, browse_root, capture_request, upload_file, upload_form};
use crate::http::request::{keep_client_headers, log_request, MakeRequestUuidV4, X_REQUEST_ID};
use crate::http::server::AppState;
use crate::security::token::gated;

pub const UPLOAD_FORM_PATH: &str = "/upload-form";
pub const UPLOAD_PATH: &str = "/upload";
pub const CAPTURE_PATH: &str = "/log-request";
pub const FILES_PREFIX: &str = "/files";

/// Build the application router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let gate = state.gate.clone();

    Router::new()
        .route("/", gated(&gate, get(upload_form)))
        .route(UPLOAD_FORM_PATH, gated(&gate, get(upload_form)))
        .route(
            UPLOAD_PATH,
            gated(&gate, post(upload_file)).layer(DefaultBodyLimit::disable()),
        )
        .route(CAPTURE_PATH, gated(&gate, any(capture_request)))
        .route(FILES_PREFIX, gated(&gate, get(browse_root)))
        .route("/files/", gated(&gate, get(browse_root)))
        .route("/files/{*path}", gated(&gate, get(browse_path)))
        .with_state(state)
        .layer(middleware::from_fn(log_request))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone())),
        )
        .layer(middleware::from_fn(keep_client_headers))
}
