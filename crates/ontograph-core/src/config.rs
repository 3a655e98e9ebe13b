//! Ontograph configuration management
//!
//! Handles configuration from environment variables and TOML files with
//! sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Triplestore connection
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GRAPHDB_URL") {
            config.store.base_url = url;
        }
        if let Ok(repo) = std::env::var("GRAPHDB_REPOSITORY") {
            config.store.repository = repo;
        }
        if let Ok(secs) = std::env::var("GRAPHDB_PROBE_TIMEOUT_SECS") {
            config.store.probe_timeout_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "GRAPHDB_PROBE_TIMEOUT_SECS".to_string(),
                    value: secs,
                })?;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        if env_config.store.base_url != StoreConfig::default().base_url {
            self.store.base_url = env_config.store.base_url;
        }
        if env_config.store.repository != StoreConfig::default().repository {
            self.store.repository = env_config.store.repository;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }

        Ok(self)
    }
}

/// Triplestore connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// GraphDB base URL
    pub base_url: String,

    /// Repository name
    pub repository: String,

    /// Timeout for the liveness probe, in seconds
    pub probe_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7200".to_string(),
            repository: "ontology-editor".to_string(),
            probe_timeout_secs: 2,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
