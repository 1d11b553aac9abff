//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the storage root before anything can reach a handler
//! - Start the metrics exporter when configured
//! - Load TLS material when configured
//! - Bind the listener last and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Steps run in order, not concurrently

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ServerConfig, StorageConfig};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::security::token::TokenGate;
use crate::storage::StorageRoot;

/// Fatal conditions that stop the process before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to create storage folder {path:?}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid listen address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("Failed to load TLS certificate: {0}")]
    Tls(#[source] io::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] io::Error),
}

/// Create the storage root if it is missing.
pub async fn prepare_storage(config: &StorageConfig) -> Result<StorageRoot, StartupError> {
    let storage = StorageRoot::ensure(&config.root)
        .await
        .map_err(|source| StartupError::Storage {
            path: config.root.clone(),
            source,
        })?;
    tracing::info!(path = %storage.path().display(), "Upload directory ready");
    Ok(storage)
}

/// Build handler state from the configuration and a prepared storage root.
pub fn app_state(config: &ServerConfig, storage: StorageRoot) -> AppState {
    let gate = TokenGate::new(config.security.token.as_str());
    if gate.is_enabled() {
        tracing::info!("Token is enabled");
    } else {
        tracing::warn!("Token is disabled (no validation)");
    }
    AppState::new(storage, gate)
}

/// Run the server described by `config` until `shutdown` fires.
pub async fn run(config: ServerConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    let storage = prepare_storage(&config.storage).await?;

    if let Some(address) = &config.observability.metrics_address {
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let addr = config
        .listener
        .socket_addr()
        .map_err(|source| StartupError::Address {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    let server = HttpServer::new(app_state(&config, storage));

    match &config.listener.tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls.cert_path, &tls.key_path)
                .await
                .map_err(StartupError::Tls)?;
            server
                .run_tls(addr, rustls, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
        None => {
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| StartupError::Bind { addr, source })?;
            tracing::info!(address = %addr, "Server started");
            server
                .run(listener, shutdown.subscribe())
                .await
                .map_err(StartupError::Serve)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_storage_is_created_before_serving() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("fresh/data");
        let config = StorageConfig { root: root.clone() };

        let storage = prepare_storage(&config).await.unwrap();
        assert!(root.is_dir());
        assert_eq!(storage.path(), root.as_path());
    }

    #[tokio::test]
    async fn uncreatable_storage_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let config = StorageConfig {
            root: blocker.join("below"),
        };

        let err = prepare_storage(&config).await.unwrap_err();
        assert!(matches!(err, StartupError::Storage { .. }));
    }

    #[tokio::test]
    async fn missing_tls_files_are_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.storage.root = tmp.path().to_path_buf();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.listener.tls = Some(crate::config::TlsConfig {
            cert_path: tmp.path().join("missing-cert.pem"),
            key_path: tmp.path().join("missing-key.pem"),
        });

        let err = run(config, Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Tls(_)));
    }

    #[tokio::test]
    async fn bind_conflict_is_fatal() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::default();
        config.storage.root = tmp.path().to_path_buf();
        config.listener.bind_address = taken.local_addr().unwrap().to_string();

        let err = run(config, Shutdown::new()).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
