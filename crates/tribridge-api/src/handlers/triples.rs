//! Triple list and import handlers
//!
//! Credentials for these routes come from the environment only.

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
use tribridge_graph::TripleSet;
use utoipa::IntoParams;

/// Backend selection
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TriplesQuery {
    /// Backend type (`neo4j` or `arangodb`)
    #[serde(rename = "type")]
    pub backend_type: Option<String>,
}

/// Fetch all relationships as deduplicated triples
#[utoipa::path(
    get,
    path = "/api/graph-db/triples",
    tag = "triples",
    params(TriplesQuery),
    responses(
        (status = 200, description = "Deduplicated triples with count and database type"),
        (status = 400, description = "Unsupported database type", body = crate::error::ApiError),
        (status = 500, description = "Backend unreachable or query failed", body = crate::error::ApiError)
    )
)]
pub async fn fetch_triples(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TriplesQuery>,
) -> Result<Json<TripleSet>, AppError> {
    let set = state
        .graph
        .fetch_triples(params.backend_type.as_deref())
        .await
        .map_err(|e| AppError::during("Failed to fetch triples", e))?;
    Ok(Json(set))
}

/// Validate and import triples extracted from a document
#[utoipa::path(
    post,
    path = "/api/graph-db/triples",
    tag = "triples",
    params(TriplesQuery),
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Triples imported", body = ImportResponse),
        (status = 400, description = "Missing triples array or unsupported database type", body = crate::error::ApiError),
        (status = 500, description = "Backend unreachable or import failed", body = crate::error::ApiError)
    )
)]
pub async fn import_triples(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TriplesQuery>,
    body: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, AppError> {
    let (raw, document_name) = ImportRequest::from_body(body)?;

    let summary = state
        .graph
        .import_triples(
            params.backend_type.as_deref(),
            &RequestOverrides::none(),
            &raw,
            document_name,
        )
        .await
        .map_err(|e| AppError::during("Failed to import triples", e))?;

    tracing::info!(
        count = summary.count,
        submitted = summary.submitted,
        backend = %summary.database_type,
        "Imported triples"
    );
    Ok(Json(summary.into()))
}
