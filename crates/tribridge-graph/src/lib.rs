//! Tribridge Graph - Graph database abstraction
//!
//! One capability contract ([`GraphBackend`]) over interchangeable graph
//! stores, a factory keyed by [`BackendType`], and the triple operations
//! ([`GraphService`]) the API and CLI expose.

use async_trait::async_trait;
use std::time::Duration;
use tribridge_core::{BackendType, ConnectionConfig, GraphSnapshot, GraphStats, Result, Triple};

pub mod arangodb;
mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod neo4j;
pub mod service;

pub use arangodb::ArangoDbBackend;
pub use neo4j::Neo4jBackend;
pub use service::{GraphService, GraphView, ImportSummary, TripleSet};

/// Trait for graph database backends
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Which variant this is
    fn backend_type(&self) -> BackendType;

    /// Establish or configure the connection.
    ///
    /// May suspend on a network handshake. Calling it again with the same
    /// config is a no-op.
    async fn initialize(&mut self, config: &ConnectionConfig) -> Result<()>;

    /// Fetch the whole graph as one materialized snapshot
    async fn fetch_graph(&self) -> Result<GraphSnapshot>;

    /// Upsert each triple as a node pair plus typed relationship.
    ///
    /// `source` names the document the triples came from. An empty slice is
    /// a no-op. Failures are never silent: batch-atomic backends fail the
    /// whole batch, others return `PartialImport` listing the failures.
    async fn import_triples(&self, triples: &[Triple], source: Option<&str>) -> Result<()>;

    /// Count stored nodes and relationships
    async fn stats(&self) -> Result<GraphStats>;
}

/// Creates a fresh, uninitialized backend for a type
pub trait BackendFactory: Send + Sync {
    fn create(&self, backend_type: BackendType) -> Box<dyn GraphBackend>;
}

/// Factory for the HTTP wire drivers
#[derive(Debug, Clone)]
pub struct HttpBackendFactory {
    timeout: Duration,
}

impl HttpBackendFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpBackendFactory {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl BackendFactory for HttpBackendFactory {
    fn create(&self, backend_type: BackendType) -> Box<dyn GraphBackend> {
        match backend_type {
            BackendType::Neo4j => Box::new(Neo4jBackend::new(self.timeout)),
            BackendType::ArangoDb => Box::new(ArangoDbBackend::new(self.timeout)),
        }
    }
}
