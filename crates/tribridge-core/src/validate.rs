//! Triple validation and deduplication

use crate::Triple;
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of validating a caller-supplied triple list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Triples that passed, as submitted, in input order
    pub triples: Vec<Triple>,
    /// Number of items submitted
    pub submitted: usize,
}

impl ValidationReport {
    pub fn valid(&self) -> usize {
        self.triples.len()
    }

    pub fn dropped(&self) -> usize {
        self.submitted - self.triples.len()
    }
}

/// Keep the items that carry textual, non-blank `subject`, `predicate` and
/// `object` fields. Anything else is dropped; this never fails. Accepted
/// values are kept exactly as submitted.
pub fn validate(raw: &[Value]) -> ValidationReport {
    let triples: Vec<Triple> = raw.iter().filter_map(triple_from_value).collect();

    if triples.len() < raw.len() {
        tracing::debug!(
            dropped = raw.len() - triples.len(),
            "Dropped malformed triples"
        );
    }

    ValidationReport {
        triples,
        submitted: raw.len(),
    }
}

fn triple_from_value(value: &Value) -> Option<Triple> {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    };

    Some(Triple::new(
        field("subject")?,
        field("predicate")?,
        field("object")?,
    ))
}

/// Drop case-insensitive repeats, keeping the first occurrence of each
/// triple as written and the input order.
pub fn deduplicate(mut triples: Vec<Triple>) -> Vec<Triple> {
    let mut seen = HashSet::with_capacity(triples.len());
    triples.retain(|triple| seen.insert(triple.dedup_key()));
    triples
}
