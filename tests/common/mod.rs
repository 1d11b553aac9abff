//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use filedrop::lifecycle::startup::{app_state, prepare_storage};
use filedrop::{HttpServer, ServerConfig, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A server running on an ephemeral port over a temporary storage root.
pub struct TestServer {
    pub addr: SocketAddr,
    pub storage: TempDir,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with the given token. The storage root is a not-yet-existing
/// subdirectory so startup has to create it.
pub async fn start_server(token: &str) -> TestServer {
    let storage = tempfile::tempdir().unwrap();

    let mut config = ServerConfig::default();
    config.storage.root = storage.path().join("data");
    config.security.token = token.to_string();

    let root = prepare_storage(&config.storage).await.unwrap();
    let server = HttpServer::new(app_state(&config, root));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        storage,
        shutdown,
    }
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
