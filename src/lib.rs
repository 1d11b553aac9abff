//! Token-gated file drop server library.

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;
pub mod storage;

pub use config::schema::ServerConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
