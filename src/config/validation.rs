//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse before anything binds
//! - Reject half-configured TLS
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{resolve_listen_address, ServerConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listen address {0:?}")]
    InvalidListenAddress(String),

    #[error("storage path must not be empty")]
    EmptyStoragePath,

    #[error("TLS needs both a certificate and a private key")]
    IncompleteTls,

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("unknown log level {0:?}")]
    InvalidLogLevel(String),
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if resolve_listen_address(&config.listener.bind_address).is_err() {
        errors.push(ValidationError::InvalidListenAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.storage.root.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyStoragePath);
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.as_os_str().is_empty() || tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::IncompleteTls);
        }
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidMetricsAddress(addr.clone()));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
