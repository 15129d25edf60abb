//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tribridge_core::{AppConfig, EnvSource, ProcessEnv};
use tribridge_graph::{BackendFactory, GraphService, HttpBackendFactory};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Triple operations over the configured backends
    pub graph: GraphService,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Responses with a 4xx or 5xx status
    pub error_count: AtomicU64,
}

impl AppState {
    /// State backed by the HTTP drivers and the process environment
    pub fn new(config: AppConfig) -> Self {
        let factory = HttpBackendFactory::new(Duration::from_secs(
            config.graph.request_timeout_secs,
        ));
        Self::with_backends(config, Arc::new(factory), Arc::new(ProcessEnv))
    }

    /// State with an explicit backend factory and credential source
    pub fn with_backends(
        config: AppConfig,
        factory: Arc<dyn BackendFactory>,
        env: Arc<dyn EnvSource>,
    ) -> Self {
        let graph = GraphService::new(factory, env, config.graph.default_backend);
        Self {
            config,
            graph,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    pub fn increment_errors(&self) -> u64 {
        self.error_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn get_error_count(&self) -> u64 {
        self.error_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let state = AppState::default();
        state.increment_requests();
        state.increment_requests();
        state.increment_errors();
        assert_eq!(state.get_request_count(), 2);
        assert_eq!(state.get_error_count(), 1);
    }

    #[test]
    fn test_default_backend_follows_config() {
        let mut config = AppConfig::default();
        config.graph.default_backend = tribridge_core::BackendType::ArangoDb;
        let state = AppState::new(config);
        assert_eq!(
            state.graph.default_backend(),
            tribridge_core::BackendType::ArangoDb
        );
    }
}
