//! API handlers

pub mod graph;
pub mod health;
pub mod triples;

use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tribridge_graph::ImportSummary;
use utoipa::ToSchema;

const INVALID_IMPORT: &str = "Invalid request: triples array is required";

/// Import request body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    /// Raw triples; items missing a non-empty subject, predicate or object are dropped
    #[schema(value_type = Vec<Object>)]
    pub triples: Option<Value>,

    /// Document the triples were extracted from; numbers and booleans are
    /// read as text, other non-string values are ignored
    #[schema(value_type = Option<String>, example = "biorxiv_10.1101_2024.01.01.txt")]
    pub document_name: Option<Value>,
}

impl ImportRequest {
    /// Split the body into raw items and document name.
    ///
    /// Anything other than a JSON object with a `triples` array is a 400.
    pub fn from_body(
        body: Result<Json<ImportRequest>, JsonRejection>,
    ) -> Result<(Vec<Value>, Option<String>), AppError> {
        let Json(request) = body.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Rejected import body");
            AppError::BadRequest(INVALID_IMPORT.to_string())
        })?;

        match request.triples {
            Some(Value::Array(items)) => Ok((items, document_name(request.document_name))),
            _ => Err(AppError::BadRequest(INVALID_IMPORT.to_string())),
        }
    }
}

fn document_name(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(name) => Some(name),
        scalar @ (Value::Number(_) | Value::Bool(_)) => Some(scalar.to_string()),
        other => {
            tracing::debug!(document_name = %other, "Ignoring non-scalar documentName");
            None
        }
    }
}

/// Import result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub success: bool,
    #[schema(example = "Successfully imported 2 valid triples out of 3 submitted")]
    pub message: String,
    /// Valid triples actually imported
    pub count: usize,
    pub document_name: Option<String>,
    #[schema(example = "neo4j")]
    pub database_type: String,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            success: true,
            message: format!(
                "Successfully imported {} valid triples out of {} submitted",
                summary.count, summary.submitted
            ),
            count: summary.count,
            document_name: summary.document_name,
            database_type: summary.database_type.to_string(),
        }
    }
}
