//! Graph-to-triple normalization
//!
//! Turns a backend's node/relationship snapshot into triples. Relationship
//! endpoints are looked up as node ids first; an endpoint that matches no
//! node is used literally as the entity name (e.g. a source document).

use crate::{GraphSnapshot, Triple};
use std::collections::HashMap;

/// Convert a snapshot into triples, one per resolvable relationship.
///
/// The result is not deduplicated. Relationships whose subject, predicate or
/// object cannot be resolved to a non-empty value are skipped with a warning.
pub fn normalize(graph: &GraphSnapshot) -> Vec<Triple> {
    let names: HashMap<&str, &str> = graph
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node.name.as_str()))
        .collect();

    tracing::debug!(
        relationships = graph.relationships.len(),
        nodes = names.len(),
        "Normalizing relationships into triples"
    );

    let mut triples = Vec::with_capacity(graph.relationships.len());
    for rel in &graph.relationships {
        let subject = resolve_endpoint(&names, &rel.source);
        let object = resolve_endpoint(&names, &rel.target);

        match (subject, object) {
            (Some(subject), Some(object)) if !rel.rel_type.is_empty() => {
                triples.push(Triple::new(subject, rel.rel_type.as_str(), object));
            }
            (subject, object) => {
                tracing::warn!(
                    source = %rel.source,
                    target = %rel.target,
                    rel_type = %rel.rel_type,
                    mapped_subject = subject.unwrap_or(""),
                    mapped_object = object.unwrap_or(""),
                    "Skipping relationship that does not resolve to a triple"
                );
            }
        }
    }

    triples
}

/// Node-id match wins; otherwise a non-empty endpoint is taken literally.
/// A node without a name does not count as a match.
fn resolve_endpoint<'a>(names: &HashMap<&str, &'a str>, endpoint: &'a str) -> Option<&'a str> {
    names
        .get(endpoint)
        .copied()
        .filter(|name| !name.is_empty())
        .or_else(|| Some(endpoint).filter(|e| !e.is_empty()))
}
