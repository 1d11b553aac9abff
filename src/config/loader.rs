//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML configuration file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            [storage]
            root = "/srv/drop"

            [security]
            token = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.root, PathBuf::from("/srv/drop"));
        assert_eq!(config.security.token, "s3cret");
        assert_eq!(config.listener.bind_address, ":58080");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn tls_section_is_parsed() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:8443"
            tls = { cert_path = "cert.pem", key_path = "key.pem" }
            "#,
        )
        .unwrap();

        let tls = config.listener.tls.unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("key.pem"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_config("[storage\nroot = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nbind_address = \":9999\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.listener.bind_address, ":9999");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
