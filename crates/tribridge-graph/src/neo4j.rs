//! Neo4j driver over the HTTP transactional Cypher endpoint
//!
//! Every call is a single `POST /db/{database}/tx/commit`, so a fetch sees
//! one consistent snapshot and an import commits or fails as one batch.
//! The `Entity.name` index is created in its own transaction before the
//! first import, since schema and data writes cannot share one.

use crate::http::{check_status, create_http_client, read_json, require_uri, send, with_auth};
use crate::GraphBackend;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tribridge_core::{
    BackendType, BridgeError, ConnectionConfig, GraphNode, GraphRelationship, GraphSnapshot,
    GraphStats, Result, Triple,
};

const BACKEND: &str = "Neo4j";
const DEFAULT_DATABASE: &str = "neo4j";

const NODES_QUERY: &str = "MATCH (n) \
     RETURN elementId(n) AS id, coalesce(n.name, n.title, '') AS name, labels(n) AS labels";

const RELATIONSHIPS_QUERY: &str = "MATCH (a)-[r]->(b) \
     RETURN elementId(a) AS source, elementId(b) AS target, coalesce(r.type, type(r)) AS type";

const IMPORT_QUERY: &str = "UNWIND $triples AS t \
     MERGE (s:Entity {name: t.subject}) \
     MERGE (o:Entity {name: t.object}) \
     MERGE (s)-[r:RELATIONSHIP {type: t.predicate}]->(o) \
     SET r.source = coalesce($source, r.source)";

const NAME_INDEX_QUERY: &str =
    "CREATE INDEX entity_name IF NOT EXISTS FOR (e:Entity) ON (e.name)";

const NODE_COUNT_QUERY: &str = "MATCH (n) RETURN count(n) AS count";
const RELATIONSHIP_COUNT_QUERY: &str = "MATCH ()-[r]->() RETURN count(r) AS count";

/// Neo4j graph backend
pub struct Neo4jBackend {
    client: Client,
    session: Option<Session>,
}

/// Connection state established by `initialize`
struct Session {
    config: ConnectionConfig,
    commit_url: String,
    /// Set once the name index statement has committed on this connection
    schema_ready: AtomicBool,
}

#[derive(Debug, Serialize)]
struct CypherRequest<'a> {
    statements: Vec<Statement<'a>>,
}

#[derive(Debug, Serialize)]
struct Statement<'a> {
    statement: &'a str,
    parameters: Value,
    #[serde(rename = "resultDataContents")]
    result_data_contents: [&'static str; 1],
}

impl<'a> Statement<'a> {
    fn new(statement: &'a str, parameters: Value) -> Self {
        Self {
            statement,
            parameters,
            result_data_contents: ["row"],
        }
    }
}

#[derive(Debug, Deserialize)]
struct CypherResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<CypherError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct CypherError {
    code: String,
    message: String,
}

impl Neo4jBackend {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: create_http_client(timeout),
            session: None,
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| {
            BridgeError::BackendUnavailable("Neo4j connection is not initialized".to_string())
        })
    }

    /// Run statements in one transaction and return their results in order
    async fn run(&self, statements: Vec<Statement<'_>>) -> Result<Vec<StatementResult>> {
        let session = self.session()?;
        let expected = statements.len();

        let request = with_auth(self.client.post(&session.commit_url), &session.config)
            .json(&CypherRequest { statements });
        let response = check_status(BACKEND, send(BACKEND, request).await?).await?;
        let body: CypherResponse = read_json(BACKEND, response).await?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect();
            return Err(BridgeError::Query(messages.join("; ")));
        }
        if body.results.len() != expected {
            return Err(BridgeError::Query(format!(
                "Neo4j returned {} results for {expected} statements",
                body.results.len()
            )));
        }

        Ok(body.results)
    }

    /// Idempotent; skipped after the first success per session
    async fn ensure_name_index(&self) -> Result<()> {
        let session = self.session()?;
        if session.schema_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        self.run(vec![Statement::new(NAME_INDEX_QUERY, json!({}))])
            .await?;
        session.schema_ready.store(true, Ordering::Release);
        tracing::debug!("Ensured Neo4j Entity name index");
        Ok(())
    }
}

/// Map a Bolt-style URI onto the matching HTTP endpoint base.
///
/// `neo4j://` / `bolt://` become `http://` (port 7687 -> 7474, 7474 when
/// absent); the `+s` / `+ssc` variants become `https://` (7687 -> 7473).
/// HTTP URIs pass through unchanged.
pub fn http_base_url(uri: &str) -> Result<String> {
    let uri = uri.trim().trim_end_matches('/');
    let (scheme, rest) = uri
        .split_once("://")
        .ok_or_else(|| BridgeError::BackendUnavailable(format!("Invalid Neo4j URI: {uri}")))?;

    let (http_scheme, http_port) = match scheme {
        "http" | "https" => return Ok(uri.to_string()),
        "neo4j" | "bolt" => ("http", "7474"),
        "neo4j+s" | "bolt+s" | "neo4j+ssc" | "bolt+ssc" => ("https", "7473"),
        other => {
            return Err(BridgeError::BackendUnavailable(format!(
                "Unsupported Neo4j URI scheme: {other}"
            )))
        }
    };

    let host = match rest.strip_suffix(":7687") {
        Some(host) => format!("{host}:{http_port}"),
        None if http_scheme == "http" && !rest.contains(':') => format!("{rest}:{http_port}"),
        None => rest.to_string(),
    };

    Ok(format!("{http_scheme}://{host}"))
}

#[async_trait]
impl GraphBackend for Neo4jBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Neo4j
    }

    async fn initialize(&mut self, config: &ConnectionConfig) -> Result<()> {
        if self.session.as_ref().is_some_and(|s| &s.config == config) {
            tracing::debug!("Neo4j connection already initialized");
            return Ok(());
        }

        let base = http_base_url(require_uri(BACKEND, config)?)?;
        let database = config.database.as_deref().unwrap_or(DEFAULT_DATABASE);
        let commit_url = format!("{base}/db/{database}/tx/commit");

        tracing::info!(endpoint = %commit_url, "Configured Neo4j connection");
        self.session = Some(Session {
            config: config.clone(),
            commit_url,
            schema_ready: AtomicBool::new(false),
        });
        Ok(())
    }

    async fn fetch_graph(&self) -> Result<GraphSnapshot> {
        let results = self
            .run(vec![
                Statement::new(NODES_QUERY, json!({})),
                Statement::new(RELATIONSHIPS_QUERY, json!({})),
            ])
            .await?;

        let nodes = results[0]
            .data
            .iter()
            .map(|d| node_from_row(&d.row))
            .collect::<Result<Vec<_>>>()?;
        let relationships = results[1]
            .data
            .iter()
            .map(|d| relationship_from_row(&d.row))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            nodes = nodes.len(),
            relationships = relationships.len(),
            "Fetched Neo4j graph"
        );
        Ok(GraphSnapshot {
            nodes,
            relationships,
        })
    }

    async fn import_triples(&self, triples: &[Triple], source: Option<&str>) -> Result<()> {
        if triples.is_empty() {
            return Ok(());
        }

        self.ensure_name_index().await?;
        self.run(vec![Statement::new(
            IMPORT_QUERY,
            json!({ "triples": triples, "source": source }),
        )])
        .await?;

        tracing::info!(count = triples.len(), "Imported triples into Neo4j");
        Ok(())
    }

    async fn stats(&self) -> Result<GraphStats> {
        let results = self
            .run(vec![
                Statement::new(NODE_COUNT_QUERY, json!({})),
                Statement::new(RELATIONSHIP_COUNT_QUERY, json!({})),
            ])
            .await?;

        Ok(GraphStats {
            node_count: count_from_result(&results[0])?,
            relationship_count: count_from_result(&results[1])?,
        })
    }
}

fn node_from_row(row: &[Value]) -> Result<GraphNode> {
    match row {
        [id, name, labels] => Ok(GraphNode {
            id: value_to_string(id),
            name: value_to_string(name),
            labels: labels
                .as_array()
                .map(|ls| ls.iter().map(value_to_string).collect())
                .unwrap_or_default(),
        }),
        _ => Err(BridgeError::Query(format!(
            "Unexpected Neo4j node row: {row:?}"
        ))),
    }
}

fn relationship_from_row(row: &[Value]) -> Result<GraphRelationship> {
    match row {
        [source, target, rel_type] => Ok(GraphRelationship::new(
            value_to_string(source),
            value_to_string(target),
            value_to_string(rel_type),
        )),
        _ => Err(BridgeError::Query(format!(
            "Unexpected Neo4j relationship row: {row:?}"
        ))),
    }
}

fn count_from_result(result: &StatementResult) -> Result<u64> {
    result
        .data
        .first()
        .and_then(|d| d.row.first())
        .and_then(Value::as_u64)
        .ok_or_else(|| BridgeError::Query("Neo4j count query returned no value".to_string()))
}

/// Property values are usually strings; render scalars, drop nulls
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
