//! Triple operations over a resolved backend
//!
//! Each call resolves its own connection, creates and initializes its own
//! backend handle, and drops it when done. Nothing is shared between calls
//! except the factory and the environment source.

use crate::{BackendFactory, GraphBackend};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tribridge_core::{
    deduplicate, normalize, to_display_link, to_display_node, validate, BackendType,
    ConnectionConfig, ConnectionResolver, DisplayLink, DisplayNode, EnvSource, GraphStats,
    RequestOverrides, Result, Triple,
};

/// Graph shaped for visualization
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    pub nodes: Vec<DisplayNode>,
    pub links: Vec<DisplayLink>,
    /// Resolved URI, or `"Not specified"`
    pub connection_url: String,
    pub database_type: BackendType,
}

/// Deduplicated triples read from a backend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripleSet {
    pub triples: Vec<Triple>,
    pub count: usize,
    pub database_type: BackendType,
}

/// Outcome of an import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Valid triples actually imported
    pub count: usize,
    /// Items the caller submitted
    pub submitted: usize,
    pub document_name: Option<String>,
    pub database_type: BackendType,
}

/// Entry point for fetch and import operations
#[derive(Clone)]
pub struct GraphService {
    factory: Arc<dyn BackendFactory>,
    env: Arc<dyn EnvSource>,
    default_backend: BackendType,
}

impl GraphService {
    pub fn new(
        factory: Arc<dyn BackendFactory>,
        env: Arc<dyn EnvSource>,
        default_backend: BackendType,
    ) -> Self {
        Self {
            factory,
            env,
            default_backend,
        }
    }

    pub fn default_backend(&self) -> BackendType {
        self.default_backend
    }

    fn resolver(&self) -> ConnectionResolver<'_> {
        ConnectionResolver::new(self.default_backend, self.env.as_ref())
    }

    async fn connect(
        &self,
        backend_type: BackendType,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn GraphBackend>> {
        tracing::info!(backend = %backend_type, "Using graph database");
        let mut backend = self.factory.create(backend_type);
        backend.initialize(config).await?;
        Ok(backend)
    }

    /// Fetch the graph and shape it for display
    pub async fn fetch_graph(
        &self,
        backend_hint: Option<&str>,
        overrides: &RequestOverrides,
    ) -> Result<GraphView> {
        let (backend_type, config) = self.resolver().resolve(backend_hint, overrides)?;
        let backend = self.connect(backend_type, &config).await?;
        let graph = backend.fetch_graph().await?;

        Ok(GraphView {
            nodes: graph.nodes.iter().map(to_display_node).collect(),
            links: graph.relationships.iter().map(to_display_link).collect(),
            connection_url: config.uri_or_unspecified().to_string(),
            database_type: backend_type,
        })
    }

    /// Fetch every relationship as a triple, deduplicated.
    ///
    /// Credentials come from the environment only.
    pub async fn fetch_triples(&self, backend_hint: Option<&str>) -> Result<TripleSet> {
        let (backend_type, config) = self
            .resolver()
            .resolve(backend_hint, &RequestOverrides::none())?;
        let backend = self.connect(backend_type, &config).await?;

        tracing::info!(backend = %backend_type, "Fetching all triples");
        let graph = backend.fetch_graph().await?;
        let triples = deduplicate(normalize(&graph));

        tracing::info!(
            backend = %backend_type,
            count = triples.len(),
            "Fetched unique triples"
        );
        Ok(TripleSet {
            count: triples.len(),
            triples,
            database_type: backend_type,
        })
    }

    /// Validate raw items and import the valid ones.
    ///
    /// When nothing is valid the backend is never contacted.
    pub async fn import_triples(
        &self,
        backend_hint: Option<&str>,
        overrides: &RequestOverrides,
        raw: &[Value],
        document_name: Option<String>,
    ) -> Result<ImportSummary> {
        let (backend_type, config) = self.resolver().resolve(backend_hint, overrides)?;
        let report = validate(raw);

        tracing::info!(
            backend = %backend_type,
            valid = report.valid(),
            submitted = report.submitted,
            document = document_name.as_deref().unwrap_or("unnamed"),
            "Storing triples"
        );

        if !report.triples.is_empty() {
            let backend = self.connect(backend_type, &config).await?;
            backend
                .import_triples(&report.triples, document_name.as_deref())
                .await?;
        }

        Ok(ImportSummary {
            count: report.valid(),
            submitted: report.submitted,
            document_name,
            database_type: backend_type,
        })
    }

    /// Node and relationship counts; credentials from the environment only
    pub async fn stats(&self, backend_hint: Option<&str>) -> Result<(BackendType, GraphStats)> {
        let (backend_type, config) = self
            .resolver()
            .resolve(backend_hint, &RequestOverrides::none())?;
        let backend = self.connect(backend_type, &config).await?;
        Ok((backend_type, backend.stats().await?))
    }
}
