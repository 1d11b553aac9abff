//! Token gate middleware.
//!
//! Every route is wrapped individually with [`gated`]. A request passes when
//! no token is configured or when its `token` header equals the configured
//! value. Anything else is answered with 401 before the handler runs.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use subtle::ConstantTimeEq;

use crate::http::response::ApiError;
use crate::observability::metrics;

/// Header carrying the shared secret.
pub const TOKEN_HEADER: &str = "token";

/// The configured shared secret. Empty means the gate is open.
#[derive(Clone, Default)]
pub struct TokenGate {
    token: Arc<str>,
}

impl fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl TokenGate {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Whether requests are checked at all.
    pub fn is_enabled(&self) -> bool {
        !self.token.is_empty()
    }

    /// Check a request's headers against the configured token.
    pub fn permits(&self, headers: &HeaderMap) -> bool {
        if !self.is_enabled() {
            return true;
        }

        match headers.get(TOKEN_HEADER) {
            Some(value) => bool::from(value.as_bytes().ct_eq(self.token.as_bytes())),
            None => false,
        }
    }
}

/// Middleware: reject requests the gate does not permit.
pub async fn require_token(
    State(gate): State<TokenGate>,
    request: Request,
    next: Next,
) -> Response {
    if gate.permits(request.headers()) {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "Rejected request with invalid token"
    );
    metrics::record_token_rejection();
    ApiError::Unauthorized.into_response()
}

/// Wrap a single route with the token gate.
///
/// The gate is applied with `layer`, not `route_layer`, so it also covers a
/// method router whose only handler is its fallback (`any`). A request with
/// an unsupported method is therefore rejected with 401 before 405.
pub fn gated<S>(gate: &TokenGate, route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.layer(middleware::from_fn_with_state(gate.clone(), require_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{self, HeaderValue, StatusCode},
        routing::{any, get},
        Router,
    };
    use tower::ServiceExt;

    fn headers_with(token: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(TOKEN_HEADER, HeaderValue::from_static(token));
        }
        headers
    }

    #[test]
    fn empty_token_disables_the_gate() {
        let gate = TokenGate::new("");
        assert!(!gate.is_enabled());
        assert!(gate.permits(&headers_with(None)));
        assert!(gate.permits(&headers_with(Some("anything"))));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let gate = TokenGate::new("s3cret");
        assert!(!format!("{gate:?}").contains("s3cret"));
    }

    #[test]
    fn configured_token_must_match_exactly() {
        let gate = TokenGate::new("s3cret");
        assert!(gate.is_enabled());
        assert!(gate.permits(&headers_with(Some("s3cret"))));
        assert!(!gate.permits(&headers_with(Some("s3cret "))));
        assert!(!gate.permits(&headers_with(Some("S3CRET"))));
        assert!(!gate.permits(&headers_with(Some(""))));
        assert!(!gate.permits(&headers_with(None)));
    }

    #[tokio::test]
    async fn gated_route_short_circuits() {
        let gate = TokenGate::new("s3cret");
        let app: Router = Router::new().route("/", gated(&gate, get(|| async { "inner" })));

        let denied = app
            .clone()
            .oneshot(http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        let allowed = app
            .oneshot(
                http::Request::builder()
                    .uri("/")
                    .header(TOKEN_HEADER, "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_covers_routes_that_accept_any_method() {
        let gate = TokenGate::new("s3cret");
        let app: Router = Router::new().route("/", gated(&gate, any(|| async { "inner" })));

        for method in ["GET", "POST", "PUT", "DELETE"] {
            let denied = app
                .clone()
                .oneshot(
                    http::Request::builder()
                        .method(method)
                        .uri("/")
                        .header(TOKEN_HEADER, "wrong")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(denied.status(), StatusCode::UNAUTHORIZED, "{method}");

            let allowed = app
                .clone()
                .oneshot(
                    http::Request::builder()
                        .method(method)
                        .uri("/")
                        .header(TOKEN_HEADER, "s3cret")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(allowed.status(), StatusCode::OK, "{method}");
        }
    }
}
