//! API route definitions

use crate::handlers::{graph, triples};
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/graph-db",
            get(graph::fetch_graph).post(graph::import_triples),
        )
        .route(
            "/graph-db/triples",
            get(triples::fetch_triples).post(triples::import_triples),
        )
}
