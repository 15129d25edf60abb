//! Backend connection resolution
//!
//! Picks the backend type and assembles a [`ConnectionConfig`] for a single
//! operation. Precedence is fixed:
//!
//! - backend type: request hint, then the configured default
//! - each credential field, independently: a non-empty environment value,
//!   then the request override, then unset
//!
//! Missing credentials are not an error here. The driver reports them as a
//! connection failure when it is initialized.

use crate::{BackendType, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Source of environment-style configuration values
pub trait EnvSource: Send + Sync {
    /// Look up a variable; `None` when unset
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Per-request credential overrides (`url`, `username`, `password`, `dbName`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestOverrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "dbName")]
    pub db_name: Option<String>,
}

impl RequestOverrides {
    /// No overrides at all
    pub fn none() -> Self {
        Self::default()
    }
}

/// Credentials for one backend, built fresh for each operation
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Connection URI (Neo4j) or URL (ArangoDB)
    pub uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Database name; drivers fall back to their own default
    pub database: Option<String>,
}

impl ConnectionConfig {
    /// URI for reporting, or `"Not specified"`
    pub fn uri_or_unspecified(&self) -> &str {
        self.uri.as_deref().unwrap_or("Not specified")
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}

/// Environment variable names consulted for one backend type
struct CredentialKeys {
    uri: &'static str,
    /// Primary name first, legacy aliases after
    username: &'static [&'static str],
    password: &'static str,
    database: &'static str,
}

fn credential_keys(backend: BackendType) -> CredentialKeys {
    match backend {
        BackendType::Neo4j => CredentialKeys {
            uri: "NEO4J_URI",
            username: &["NEO4J_USER", "NEO4J_USERNAME"],
            password: "NEO4J_PASSWORD",
            database: "NEO4J_DATABASE",
        },
        BackendType::ArangoDb => CredentialKeys {
            uri: "ARANGODB_URL",
            username: &["ARANGODB_USER"],
            password: "ARANGODB_PASSWORD",
            database: "ARANGODB_DB",
        },
    }
}

/// Resolves backend type and credentials for one operation
pub struct ConnectionResolver<'a> {
    default_backend: BackendType,
    env: &'a dyn EnvSource,
}

impl<'a> ConnectionResolver<'a> {
    /// `default_backend` is the configured setting used when no hint is given
    pub fn new(default_backend: BackendType, env: &'a dyn EnvSource) -> Self {
        Self {
            default_backend,
            env,
        }
    }

    /// Pick the backend type and build its connection config.
    ///
    /// Fails only when the hint names an unknown backend type.
    pub fn resolve(
        &self,
        backend_hint: Option<&str>,
        overrides: &RequestOverrides,
    ) -> Result<(BackendType, ConnectionConfig)> {
        let backend = self.backend_type(backend_hint)?;
        let keys = credential_keys(backend);

        let config = ConnectionConfig {
            uri: self.pick(&[keys.uri], overrides.url.as_deref()),
            username: self.pick(keys.username, overrides.username.as_deref()),
            password: self.pick(&[keys.password], overrides.password.as_deref()),
            database: self.pick(&[keys.database], overrides.db_name.as_deref()),
        };

        tracing::debug!(
            backend = %backend,
            uri_set = config.uri.is_some(),
            username_set = config.username.is_some(),
            password_set = config.password.is_some(),
            "Resolved graph database connection"
        );

        Ok((backend, config))
    }

    /// Backend type from the hint, falling back to the configured default
    pub fn backend_type(&self, backend_hint: Option<&str>) -> Result<BackendType> {
        match backend_hint.map(str::trim).filter(|h| !h.is_empty()) {
            Some(hint) => hint.parse(),
            None => Ok(self.default_backend),
        }
    }

    fn pick(&self, env_keys: &[&str], request_value: Option<&str>) -> Option<String> {
        env_keys
            .iter()
            .find_map(|key| non_empty(self.env.var(key)))
            .or_else(|| non_empty(request_value.map(str::to_string)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
