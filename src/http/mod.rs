//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (axum / axum-server, connect info)
//!     → request.rs (request ID, access log, request counter)
//!     → [routing + token gate + handler]
//!     → response.rs (errors → status + plain-text body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
