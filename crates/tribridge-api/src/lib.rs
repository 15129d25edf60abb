//! Tribridge API - HTTP server
//!
//! Exposes graph fetch, triple fetch and triple import over HTTP for a
//! Neo4j or ArangoDB backend chosen per request.
//!
//! - Swagger UI: `GET /swagger-ui`
//! - OpenAPI JSON: `GET /api-docs/openapi.json`

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use handlers::health;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Tribridge API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tribridge API",
        description = "Subject-predicate-object triples over Neo4j and ArangoDB"
    ),
    tags(
        (name = "health", description = "Health and metrics"),
        (name = "graph", description = "Graph visualization data and imports with connection overrides"),
        (name = "triples", description = "Triple listing and document imports")
    ),
    paths(
        handlers::health::health_check,
        handlers::health::metrics,
        handlers::graph::fetch_graph,
        handlers::graph::import_triples,
        handlers::triples::fetch_triples,
        handlers::triples::import_triples
    ),
    components(schemas(
        error::ApiError,
        handlers::ImportRequest,
        handlers::ImportResponse,
        handlers::health::HealthResponse,
        handlers::health::MetricsResponse
    ))
)]
pub struct ApiDoc;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .nest("/api", routes::api_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// CORS for the configured origins; `*` allows any
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    Some(layer.allow_origin(allowed))
}
