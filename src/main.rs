//! filedrop: token-gated file upload, request capture and file browser.
//!
//! ```text
//!   GET  /upload-form  ─┐
//!   POST /upload       ─┤   ┌────────────┐    ┌──────────┐    ┌──────────────┐
//!   *    /log-request  ─┼──▶│ token gate │───▶│ handlers │───▶│ storage root │
//!   GET  /files/*      ─┘   └────────────┘    └──────────┘    └──────────────┘
//! ```

use clap::Parser;

use filedrop::config::Args;
use filedrop::lifecycle::{startup, Shutdown};
use filedrop::observability::logging::init_logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("filedrop: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(&config.observability.log_level);

    tracing::info!("filedrop v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage = %config.storage.root.display(),
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    if let Err(e) = startup::run(config, shutdown).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
