//! Graph fetch and import handlers

use super::{ImportRequest, ImportResponse};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tribridge_core::RequestOverrides;
use tribridge_graph::GraphView;
use utoipa::IntoParams;

/// Backend selection and per-request credential overrides.
///
/// A non-empty environment value always wins over the matching override.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GraphDbQuery {
    /// Backend type (`neo4j` or `arangodb`)
    #[serde(rename = "type")]
    pub backend_type: Option<String>,

    /// Connection URI or URL
    pub url: Option<String>,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Database name (ArangoDB)
    #[serde(rename = "dbName")]
    pub db_name: Option<String>,
}

impl GraphDbQuery {
    fn overrides(&self) -> RequestOverrides {
        RequestOverrides {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            db_name: self.db_name.clone(),
        }
    }
}

/// Fetch the graph shaped for visualization
#[utoipa::path(
    get,
    path = "/api/graph-db",
    tag = "graph",
    params(GraphDbQuery),
    responses(
        (status = 200, description = "Nodes, links, connection URL and database type"),
        (status = 400, description = "Unsupported database type", body = crate::error::ApiError),
        (status = 500, description = "Backend unreachable or query failed", body = crate::error::ApiError)
    )
)]
pub async fn fetch_graph(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphDbQuery>,
) -> Result<Json<GraphView>, AppError> {
    let view = state
        .graph
        .fetch_graph(params.backend_type.as_deref(), &params.overrides())
        .await
        .map_err(|e| AppError::during("Failed to fetch graph data", e))?;

    tracing::debug!(
        nodes = view.nodes.len(),
        links = view.links.len(),
        backend = %view.database_type,
        "Fetched graph"
    );
    Ok(Json(view))
}

/// Import triples using the request's connection overrides
#[utoipa::path(
    post,
    path = "/api/graph-db",
    tag = "graph",
    params(GraphDbQuery),
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Triples imported", body = ImportResponse),
        (status = 400, description = "Missing triples array or unsupported database type", body = crate::error::ApiError),
        (status = 500, description = "Backend unreachable or import failed", body = crate::error::ApiError)
    )
)]
pub async fn import_triples(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GraphDbQuery>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    let (raw, document_name) = ImportRequest::from_body(body)?;

    let summary = state
        .graph
        .import_triples(
            params.backend_type.as_deref(),
            &params.overrides(),
            &raw,
            document_name,
        )
        .await
        .map_err(|e| AppError::during("Failed to import triples", e))?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_field_names() {
        let params: GraphDbQuery = serde_json::from_value(serde_json::json!({
            "type": "arangodb",
            "url": "http://arango:8529",
            "dbName": "knowledge"
        }))
        .unwrap();

        assert_eq!(params.backend_type.as_deref(), Some("arangodb"));
        let overrides = params.overrides();
        assert_eq!(overrides.url.as_deref(), Some("http://arango:8529"));
        assert_eq!(overrides.db_name.as_deref(), Some("knowledge"));
        assert!(overrides.username.is_none());
    }
}
