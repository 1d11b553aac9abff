//! Command-line arguments.
//!
//! Flags override whatever the optional `--config` file provides.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::{ServerConfig, TlsConfig};
use crate::config::validation::validate_config;

#[derive(Debug, Parser)]
#[command(name = "filedrop")]
#[command(version, about = "Token-gated file drop, request capture and file browser", long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listening address (e.g., :58080)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Folder to store uploaded files
    #[arg(short, long)]
    pub storage: Option<PathBuf>,

    /// Access token (optional; if empty, no token check)
    #[arg(short, long)]
    pub token: Option<String>,

    /// TLS certificate (PEM)
    #[arg(long, requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    /// TLS private key (PEM)
    #[arg(long, requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_address: Option<String>,
}

impl Args {
    /// Build the effective configuration: file (or defaults), then flags.
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(listen) = self.listen {
            config.listener.bind_address = listen;
        }
        if let Some(storage) = self.storage {
            config.storage.root = storage;
        }
        if let Some(token) = self.token {
            config.security.token = token;
        }
        if let (Some(cert_path), Some(key_path)) = (self.tls_cert, self.tls_key) {
            config.listener.tls = Some(TlsConfig { cert_path, key_path });
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = Some(addr);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_flags_gives_defaults() {
        let config = Args::parse_from(["filedrop"]).into_config().unwrap();
        assert_eq!(config.listener.bind_address, ":58080");
        assert_eq!(config.storage.root, PathBuf::from("./data"));
        assert!(config.security.token.is_empty());
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[storage]\nroot = \"/from/file\"\n[security]\ntoken = \"file-token\""
        )
        .unwrap();

        let args = Args::parse_from([
            "filedrop",
            "--config",
            file.path().to_str().unwrap(),
            "--token",
            "flag-token",
        ]);
        let config = args.into_config().unwrap();

        assert_eq!(config.storage.root, PathBuf::from("/from/file"));
        assert_eq!(config.security.token, "flag-token");
    }

    #[test]
    fn tls_flags_need_each_other() {
        let result = Args::try_parse_from(["filedrop", "--tls-cert", "cert.pem"]);
        assert!(result.is_err());

        let config = Args::parse_from([
            "filedrop",
            "--tls-cert",
            "cert.pem",
            "--tls-key",
            "key.pem",
        ])
        .into_config()
        .unwrap();
        assert!(config.listener.tls.is_some());
    }

    #[test]
    fn invalid_listen_flag_fails_validation() {
        let err = Args::parse_from(["filedrop", "--listen", "nope"])
            .into_config()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
