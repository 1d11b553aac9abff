//! Error responses.
//!
//! # Responsibilities
//! - Map handler failures to status codes
//! - Keep internal error detail out of response bodies
//!
//! # Design Decisions
//! - Bodies are short plain-text messages ending in a newline
//! - Server-side failures are logged with their source, answered generically

use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete client request.
    #[error("{0}")]
    BadRequest(&'static str),

    /// Token gate rejected the request.
    #[error("Unauthorized: invalid token")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not Found")]
    NotFound,

    /// Filesystem failure. Only `context` reaches the client.
    #[error("{context}")]
    Internal {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ApiError {
    pub fn internal(context: &'static str, source: io::Error) -> Self {
        Self::Internal { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => ApiError::NotFound,
            io::ErrorKind::PermissionDenied => ApiError::Forbidden,
            _ => ApiError::internal("Internal Server Error", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { context, source } = &self {
            tracing::error!(error = %source, "{}", context);
        }
        (self.status(), format!("{}\n", self)).into_response()
    }
}
