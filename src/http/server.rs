//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Hold the immutable state handed to every handler
//! - Build the router (see `routing::router`)
//! - Serve plain HTTP on a bound listener, or HTTPS via axum-server
//! - Stop accepting and drain on the shutdown signal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::routing::build_router;
use crate::security::token::TokenGate;
use crate::storage::StorageRoot;

/// Grace period for in-flight TLS connections after shutdown is signalled.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub storage: Arc<StorageRoot>,
    pub gate: TokenGate,
}

impl AppState {
    pub fn new(storage: StorageRoot, gate: TokenGate) -> Self {
        Self {
            storage: Arc::new(storage),
            gate,
        }
    }
}

/// HTTP server for uploads, captures and browsing.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server over an existing storage root.
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
