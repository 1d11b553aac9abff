//! Network layer subsystem.
//!
//! Plain TCP is bound directly with tokio in `lifecycle::startup`; this
//! module holds the optional TLS setup handed to axum-server.

pub mod tls;
