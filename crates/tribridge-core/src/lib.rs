//! Tribridge Core - Triple model and backend-neutral data handling
//!
//! This crate defines the pieces of tribridge that do not talk to a database:
//! - Graph and triple models shared by every backend
//! - Common error types
//! - Configuration management
//! - Connection resolution (backend type + credentials precedence)
//! - Graph-to-triple normalization, validation and deduplication
//! - Display shaping for graph visualization

pub mod config;
pub mod display;
pub mod normalize;
pub mod resolver;
pub mod validate;

pub use config::{AppConfig, ConfigError, GraphConfig, LoggingConfig, ServerConfig};
pub use display::{to_display_link, to_display_node, truncate_display_name, DisplayLink, DisplayNode};
pub use normalize::normalize;
pub use resolver::{ConnectionConfig, ConnectionResolver, EnvSource, ProcessEnv, RequestOverrides};
pub use validate::{deduplicate, validate, ValidationReport};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for tribridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The requested backend type is not one we know how to drive
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection not initialized, unreachable, or refused
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered with something we could not interpret
    #[error("Query error: {0}")]
    Query(String),

    /// Caller-supplied payload is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Some triples of a non-atomic import were written, others were not
    #[error(
        "Imported {imported} triples, {} failed: {}",
        .failures.len(),
        describe_failures(.failures)
    )]
    PartialImport {
        imported: usize,
        failures: Vec<FailedTriple>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// A triple a backend refused to store, with the backend's reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTriple {
    pub triple: Triple,
    pub reason: String,
}

fn describe_failures(failures: &[FailedTriple]) -> String {
    failures
        .iter()
        .map(|f| format!("({}) -> {}", f.triple, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Backend Types
// ============================================================================

/// Graph storage technologies tribridge can drive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Labeled-property-graph store (Neo4j)
    #[default]
    Neo4j,
    /// Document/graph store (ArangoDB)
    #[serde(rename = "arangodb")]
    ArangoDb,
}

impl BackendType {
    /// Every supported backend, in display order
    pub const ALL: [BackendType; 2] = [BackendType::Neo4j, BackendType::ArangoDb];

    /// Wire name reported as `databaseType`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neo4j => "neo4j",
            Self::ArangoDb => "arangodb",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackendType {
    type Err = BridgeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neo4j" => Ok(Self::Neo4j),
            "arangodb" => Ok(Self::ArangoDb),
            _ => Err(BridgeError::Configuration(format!(
                "Unsupported graph database type: {s}"
            ))),
        }
    }
}

// ============================================================================
// Graph Models
// ============================================================================

/// A node as fetched from a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Backend identifier, unique within one fetch
    pub id: String,

    /// Display name (empty when the backend stored none)
    #[serde(default)]
    pub name: String,

    /// Ordered labels; the first one is the primary type
    #[serde(default)]
    pub labels: Vec<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// A directed, typed relationship as fetched from a backend.
///
/// `source` and `target` hold either a node id or, when no node carries that
/// id, a literal entity name such as a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRelationship {
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub target: String,

    #[serde(rename = "type", default)]
    pub rel_type: String,
}

impl GraphRelationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        rel_type: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            rel_type: rel_type.into(),
        }
    }
}

/// Fully materialized graph returned by a backend fetch.
///
/// Some producers name the relationship list `links`; both spellings are
/// accepted when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,

    #[serde(default, alias = "links")]
    pub relationships: Vec<GraphRelationship>,
}

/// Node and relationship counts of a stored graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: u64,
    pub relationship_count: u64,
}

// ============================================================================
// Triples
// ============================================================================

/// A subject-predicate-object fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Case-insensitive identity used for deduplication
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.subject.to_lowercase(),
            self.predicate.to_lowercase(),
            self.object.to_lowercase()
        )
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.subject, self.predicate, self.object)
    }
}

// ============================================================================
// Tests
// ============================================================================
