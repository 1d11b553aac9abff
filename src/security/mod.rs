//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request on any route:
//!     → token.rs (compare `token` header with the shared secret)
//!     → 401, or pass to handler
//! ```
//!
//! # Design Decisions
//! - An empty configured token disables the check; startup logs a warning
//! - Constant-time comparison of the header against the secret
//! - Filenames from clients are validated in `storage::names`

pub mod token;

pub use token::{gated, require_token, TokenGate, TOKEN_HEADER};
