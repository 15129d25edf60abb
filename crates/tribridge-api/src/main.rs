//! Tribridge API Server

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tribridge_api::{create_router, state::AppState};
use tribridge_core::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tribridge_api=debug,tower_http=debug".into());
    if config.logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let addr = config.bind_addr();
    let default_backend = config.graph.default_backend;

    // Create application state
    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Tribridge API Server starting on http://{}", addr);
    tracing::info!(backend = %default_backend, "Default graph database");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
