//! In-memory backend for tests
//!
//! Clones share one graph, so a test can hand a clone to a factory and
//! inspect what the code under test wrote.

use crate::{BackendFactory, GraphBackend};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tribridge_core::{
    BackendType, BridgeError, ConnectionConfig, GraphNode, GraphRelationship, GraphSnapshot,
    GraphStats, Result, Triple,
};

#[derive(Debug, Default)]
struct MemoryState {
    graph: GraphSnapshot,
    initialized_with: Option<ConnectionConfig>,
    write_calls: usize,
    unreachable: bool,
}

/// Graph held in process memory
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    backend_type: BackendType,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new(backend_type: BackendType) -> Self {
        Self {
            backend_type,
            state: Arc::default(),
        }
    }

    /// Seed the stored graph
    pub fn with_graph(self, graph: GraphSnapshot) -> Self {
        self.lock().graph = graph;
        self
    }

    /// Make every `initialize` fail as if the host were down
    pub fn unreachable(self) -> Self {
        self.lock().unreachable = true;
        self
    }

    /// Number of non-empty `import_triples` calls seen
    pub fn write_calls(&self) -> usize {
        self.lock().write_calls
    }

    /// Config passed to the most recent `initialize`
    pub fn last_config(&self) -> Option<ConnectionConfig> {
        self.lock().initialized_with.clone()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.lock().graph.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn require_initialized(state: &MemoryState) -> Result<()> {
        match state.initialized_with {
            Some(_) => Ok(()),
            None => Err(BridgeError::BackendUnavailable(
                "memory backend is not initialized".to_string(),
            )),
        }
    }
}

/// Id of the node named `name`, creating it when missing
fn node_id_for(graph: &mut GraphSnapshot, name: &str) -> String {
    if let Some(node) = graph.nodes.iter().find(|n| n.name == name) {
        return node.id.clone();
    }
    let id = format!("entities/{}", graph.nodes.len() + 1);
    graph
        .nodes
        .push(GraphNode::new(id.clone(), name).with_label("Entity"));
    id
}

#[async_trait]
impl GraphBackend for MemoryBackend {
    fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    async fn initialize(&mut self, config: &ConnectionConfig) -> Result<()> {
        let mut state = self.lock();
        if state.unreachable {
            return Err(BridgeError::BackendUnavailable(format!(
                "connection refused: {}",
                config.uri_or_unspecified()
            )));
        }
        state.initialized_with = Some(config.clone());
        Ok(())
    }

    async fn fetch_graph(&self) -> Result<GraphSnapshot> {
        let state = self.lock();
        Self::require_initialized(&state)?;
        Ok(state.graph.clone())
    }

    async fn import_triples(&self, triples: &[Triple], _source: Option<&str>) -> Result<()> {
        if triples.is_empty() {
            return Ok(());
        }

        let mut state = self.lock();
        Self::require_initialized(&state)?;
        state.write_calls += 1;

        for triple in triples {
            let source = node_id_for(&mut state.graph, &triple.subject);
            let target = node_id_for(&mut state.graph, &triple.object);
            let rel = GraphRelationship::new(source, target, triple.predicate.as_str());
            if !state.graph.relationships.contains(&rel) {
                state.graph.relationships.push(rel);
            }
        }
        Ok(())
    }

    async fn stats(&self) -> Result<GraphStats> {
        let state = self.lock();
        Self::require_initialized(&state)?;
        Ok(GraphStats {
            node_count: state.graph.nodes.len() as u64,
            relationship_count: state.graph.relationships.len() as u64,
        })
    }
}

/// Factory handing out clones of registered memory backends
#[derive(Debug, Clone, Default)]
pub struct MemoryBackendFactory {
    backends: HashMap<BackendType, MemoryBackend>,
}

impl MemoryBackendFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the backend served for its type
    pub fn with_backend(mut self, backend: MemoryBackend) -> Self {
        self.backends.insert(backend.backend_type, backend);
        self
    }
}

impl BackendFactory for MemoryBackendFactory {
    fn create(&self, backend_type: BackendType) -> Box<dyn GraphBackend> {
        Box::new(
            self.backends
                .get(&backend_type)
                .cloned()
                .unwrap_or_else(|| MemoryBackend::new(backend_type)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_import_merges_nodes_by_name() {
        let mut backend = MemoryBackend::new(BackendType::Neo4j);
        backend
            .initialize(&ConnectionConfig::default())
            .await
            .unwrap();

        backend
            .import_triples(
                &[
                    Triple::new("Alice", "KNOWS", "Bob"),
                    Triple::new("Bob", "KNOWS", "Carol"),
                    Triple::new("Alice", "KNOWS", "Bob"),
                ],
                None,
            )
            .await
            .unwrap();

        let stats = backend.stats().await.unwrap();
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.relationship_count, 2);
        assert_eq!(backend.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_uninitialized_fetch_fails() {
        let backend = MemoryBackend::new(BackendType::ArangoDb);
        assert!(matches!(
            backend.fetch_graph().await,
            Err(BridgeError::BackendUnavailable(_))
        ));
    }
}
