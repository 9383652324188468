//! Service configuration
//!
//! Resolved once at startup from command line flags and the environment
//! (including a `.env` file, loaded before argument parsing).

use serde::{Deserialize, Serialize};

use crate::cli::{CliError, CliResult};

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// sqlx SQLite connection string, e.g. `sqlite://guests.db`
    pub database_url: String,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8000
}

impl AppConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> CliResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(CliError::config("DATABASE_URL must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(CliError::config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(CliError::config("port must be > 0"));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::new("sqlite://guests.db");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(config.cors_origins.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig::new("sqlite::memory:").with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(AppConfig::new("  ").validate().is_err());
        assert!(AppConfig::new("sqlite::memory:").with_port(0).validate().is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"database_url": "sqlite://guests.db"}"#).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
    }
}
