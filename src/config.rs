//! Server configuration loaded from TOML

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::WhiteboardError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,

    /// Origins allowed to make cross-origin requests
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Log level, used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            allowed_origins: default_allowed_origins(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, WhiteboardError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(WhiteboardError::ConfigNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Self, WhiteboardError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Allowed origins as header values for the CORS layer
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, WhiteboardError> {
        self.server
            .allowed_origins
            .iter()
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| {
                    WhiteboardError::InvalidConfig(format!("invalid allowed origin '{}'", origin))
                })
            })
            .collect()
    }

    fn validate(&self) -> Result<(), WhiteboardError> {
        self.origin_headers()?;
        if self.server.log_level.trim().is_empty() {
            return Err(WhiteboardError::InvalidConfig(
                "log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.listen.port(), 8000);
        assert_eq!(config.server.allowed_origins.len(), 2);
        assert_eq!(config.server.log_level, "info");
    }

    #[test]
    fn test_empty_string_uses_defaults() {
        let config = assert_ok!(Config::load_str(""));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_server_section() {
        let config = assert_ok!(Config::load_str(
            r#"
            [server]
            listen = "127.0.0.1:9000"
            allowed_origins = ["https://board.example.com"]
            "#,
        ));
        assert_eq!(config.server.listen, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.server.allowed_origins, vec!["https://board.example.com"]);
        assert_eq!(config.server.log_level, "info");
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let result = Config::load_str(
            r#"
            [server]
            allowed_origins = ["bad\norigin"]
            "#,
        );
        assert!(matches!(result, Err(WhiteboardError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = Config::load_str("[server\nlisten = 1");
        assert!(matches!(result, Err(WhiteboardError::ConfigParse(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nlog_level = \"debug\"").unwrap();

        let config = assert_ok!(Config::load_file(file.path()));
        assert_eq!(config.server.log_level, "debug");
    }

    #[test]
    fn test_missing_file() {
        let result = assert_err!(Config::load_file("/nonexistent/whiteboard.toml"));
        assert!(matches!(result, WhiteboardError::ConfigNotFound(_)));
    }
}
