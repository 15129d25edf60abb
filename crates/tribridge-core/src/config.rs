//! Tribridge Configuration Management
//!
//! Handles process-level configuration from environment variables and
//! config files. Backend credentials are not part of this
//! struct: they are read per operation by [`crate::resolver`].

use crate::BackendType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Graph backend selection
    #[serde(default)]
    pub graph: GraphConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Graph backend
        if let Ok(backend) = std::env::var("GRAPH_DB_TYPE") {
            if !backend.trim().is_empty() {
                config.graph.default_backend =
                    backend.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "GRAPH_DB_TYPE".to_string(),
                        value: backend,
                    })?;
            }
        }
        if let Ok(secs) = std::env::var("GRAPH_DB_TIMEOUT_SECS") {
            config.graph.request_timeout_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "GRAPH_DB_TIMEOUT_SECS".to_string(),
                    value: secs,
                })?;
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            config.logging.json_format = matches!(json.as_str(), "1" | "true" | "TRUE" | "yes");
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

        Self::from_toml_str(&content).map_err(|message| ConfigError::ParseError { path, message })
    }

    fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        let env_config = Self::from_env()?;

        // Only override if env values differ from defaults
        if env_config.server.host != ServerConfig::default().host {
            self.server.host = env_config.server.host;
        }
        if env_config.server.port != ServerConfig::default().port {
            self.server.port = env_config.server.port;
        }
        if !env_config.server.cors_origins.is_empty() {
            self.server.cors_origins = env_config.server.cors_origins;
        }
        if env_config.graph.default_backend != GraphConfig::default().default_backend {
            self.graph.default_backend = env_config.graph.default_backend;
        }
        if env_config.graph.request_timeout_secs != GraphConfig::default().request_timeout_secs {
            self.graph.request_timeout_secs = env_config.graph.request_timeout_secs;
        }
        if env_config.logging.level != LoggingConfig::default().level {
            self.logging.level = env_config.logging.level;
        }
        if env_config.logging.json_format {
            self.logging.json_format = true;
        }

        Ok(self)
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty disables the CORS layer)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Graph backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Backend used when a request does not name one
    pub default_backend: BackendType,

    /// Per-request timeout handed to the wire drivers
    pub request_timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_backend: BackendType::Neo4j,
            request_timeout_secs: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
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
