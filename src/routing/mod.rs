//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → request ID, trace span, access log (router-wide layers)
//!     → path match (router.rs)
//!     → token gate (per route)
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Fixed paths, no parameters beyond the `/files` tail
//! - Gating is attached route by route, never globally

pub mod router;

pub use router::build_router;
