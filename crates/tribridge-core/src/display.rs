//! Display shaping for graph visualization
//!
//! Only the read path for the graph view goes through here. Truncation is
//! lossy; `full_name` and triple data always keep the original text.

use crate::{GraphNode, GraphRelationship};
use serde::Serialize;

/// Names longer than this (in characters) are shortened
pub const MAX_DISPLAY_NAME: usize = 50;

/// Head/tail lengths kept for document-like names
const DOCUMENT_HEAD: usize = 40;
const DOCUMENT_TAIL: usize = 10;

const DOCUMENT_EXTENSIONS: &[&str] = &[".txt"];

/// bioRxiv DOI prefix found in ingested document names
const IDENTIFIER_MARKERS: &[&str] = &["10.1101"];

const DEFAULT_LABEL: &str = "Entity";
const DEFAULT_LINK_LABEL: &str = "RELATED_TO";
const ENTITY_COLOR: &str = "#ff6b6b";
const OTHER_COLOR: &str = "#4ecdc4";

/// A node ready for the graph view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNode {
    pub id: String,
    /// Possibly truncated name for the canvas
    pub name: String,
    /// Untruncated name for tooltips
    pub full_name: String,
    pub labels: Vec<String>,
    /// Primary label
    pub label: String,
    /// Visual weight
    pub val: u32,
    pub color: String,
}

/// A relationship ready for the graph view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayLink {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    pub label: String,
}

pub fn to_display_node(node: &GraphNode) -> DisplayNode {
    let full_name = if node.name.is_empty() {
        format!("Node {}", node.id)
    } else {
        node.name.clone()
    };

    let is_entity = node.labels.iter().any(|l| l == DEFAULT_LABEL);

    DisplayNode {
        id: node.id.clone(),
        name: truncate_display_name(&full_name),
        full_name,
        labels: node.labels.clone(),
        label: node
            .labels
            .first()
            .filter(|l| !l.is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        val: 1,
        color: if is_entity { ENTITY_COLOR } else { OTHER_COLOR }.to_string(),
    }
}

pub fn to_display_link(rel: &GraphRelationship) -> DisplayLink {
    let label = if rel.rel_type.is_empty() {
        DEFAULT_LINK_LABEL.to_string()
    } else {
        rel.rel_type.clone()
    };

    DisplayLink {
        source: rel.source.clone(),
        target: rel.target.clone(),
        rel_type: rel.rel_type.clone(),
        label,
    }
}

/// Shorten a long name for display.
///
/// Document-like names (an underscore plus a document extension or a known
/// identifier) keep their head and tail so the distinguishing suffix stays
/// visible; everything else keeps the head only.
pub fn truncate_display_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= MAX_DISPLAY_NAME {
        return name.to_string();
    }

    if looks_like_document(name) {
        let head: String = chars[..DOCUMENT_HEAD].iter().collect();
        let tail: String = chars[chars.len() - DOCUMENT_TAIL..].iter().collect();
        format!("{head}...{tail}")
    } else {
        let head: String = chars[..MAX_DISPLAY_NAME].iter().collect();
        format!("{head}...")
    }
}

fn looks_like_document(name: &str) -> bool {
    name.contains('_')
        && (DOCUMENT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
            || IDENTIFIER_MARKERS.iter().any(|id| name.contains(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names_untouched() {
        assert_eq!(truncate_display_name("BRCA1"), "BRCA1");
        let exactly_fifty = "a".repeat(50);
        assert_eq!(truncate_display_name(&exactly_fifty), exactly_fifty);
    }

    #[test]
    fn test_document_name_keeps_head_and_tail() {
        let name = format!("{}_{}.txt", "a".repeat(40), "b".repeat(15));
        assert_eq!(name.chars().count(), 60);

        let shown = truncate_display_name(&name);
        assert_eq!(shown, format!("{}...{}", "a".repeat(40), "bbbbbb.txt"));
        assert_eq!(shown.chars().count(), 53);
    }

    #[test]
    fn test_identifier_marker_counts_as_document() {
        let name = format!("{}_10.1101_{}", "x".repeat(30), "y".repeat(30));
        let shown = truncate_display_name(&name);
        assert!(shown.starts_with(&"x".repeat(30)));
        assert!(shown.ends_with(&"y".repeat(10)));
        assert_eq!(shown.chars().count(), 53);
    }

    #[test]
    fn test_plain_long_name_keeps_head() {
        let name = "c".repeat(60);
        assert_eq!(truncate_display_name(&name), format!("{}...", "c".repeat(50)));
    }

    #[test]
    fn test_extension_without_underscore_is_not_document() {
        let name = format!("{}.txt", "d".repeat(56));
        assert_eq!(truncate_display_name(&name), format!("{}...", "d".repeat(50)));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let name = "휴".repeat(55);
        assert_eq!(truncate_display_name(&name), format!("{}...", "휴".repeat(50)));
    }

    #[test]
    fn test_display_node_labels_and_color() {
        let entity = GraphNode::new("1", "Alice").with_label("Entity");
        let shown = to_display_node(&entity);
        assert_eq!(shown.label, "Entity");
        assert_eq!(shown.color, ENTITY_COLOR);
        assert_eq!(shown.val, 1);

        let document = GraphNode::new("2", "paper.txt")
            .with_label("Document")
            .with_label("Entity");
        let shown = to_display_node(&document);
        assert_eq!(shown.label, "Document");
        assert_eq!(shown.color, ENTITY_COLOR);

        let bare = GraphNode::new("3", "x");
        let shown = to_display_node(&bare);
        assert_eq!(shown.label, "Entity");
        assert_eq!(shown.color, OTHER_COLOR);
    }

    #[test]
    fn test_empty_first_label_falls_back_to_entity() {
        let shown = to_display_node(&GraphNode::new("1", "x").with_label(""));
        assert_eq!(shown.label, "Entity");
        assert_eq!(shown.labels, vec![""]);

        let node = GraphNode::new("2", "y").with_label("").with_label("Person");
        assert_eq!(to_display_node(&node).label, "Entity");
    }

    #[test]
    fn test_display_node_keeps_full_name() {
        let long = "e".repeat(70);
        let shown = to_display_node(&GraphNode::new("9", long.clone()));
        assert_eq!(shown.full_name, long);
        assert_eq!(shown.name.chars().count(), 53);
    }

    #[test]
    fn test_nameless_node_gets_placeholder() {
        let shown = to_display_node(&GraphNode::new("42", ""));
        assert_eq!(shown.name, "Node 42");
        assert_eq!(shown.full_name, "Node 42");
    }

    #[test]
    fn test_display_serializes_camel_case() {
        let value = serde_json::to_value(to_display_node(&GraphNode::new("1", "A"))).unwrap();
        assert_eq!(value["fullName"], "A");

        let link = serde_json::to_value(to_display_link(&GraphRelationship::new("1", "2", ""))).unwrap();
        assert_eq!(link["label"], "RELATED_TO");
        assert_eq!(link["type"], "");
    }
}
