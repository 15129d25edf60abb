//! Loading triple files for import

use anyhow::{bail, Context};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One file's worth of raw triples
#[derive(Debug)]
pub struct TripleFile {
    pub document_name: String,
    pub triples: Vec<Value>,
}

/// JSON files to import: `path` itself, or every `*.json` directly inside it
pub fn collect_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
    {
        let file = entry?.path();
        if file.is_file() && file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// Read one file.
///
/// The document name is `name_override`, else the payload's `documentName`,
/// else the file stem.
pub fn load(path: &Path, name_override: Option<&str>) -> anyhow::Result<TripleFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let payload: Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    let (triples, embedded_name) = split_payload(payload)
        .with_context(|| format!("No triples array in {}", path.display()))?;

    let document_name = name_override
        .map(str::to_string)
        .or(embedded_name)
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

    Ok(TripleFile {
        document_name,
        triples,
    })
}

/// Accepts a bare array or an object with a `triples` array
fn split_payload(payload: Value) -> anyhow::Result<(Vec<Value>, Option<String>)> {
    match payload {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut map) => {
            let name = map
                .get("documentName")
                .and_then(Value::as_str)
                .map(str::to_string);
            match map.remove("triples") {
                Some(Value::Array(items)) => Ok((items, name)),
                _ => bail!("expected a \"triples\" array"),
            }
        }
        _ => bail!("expected an array or an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_payload_shapes() {
        let (items, name) = split_payload(json!([{"subject": "a"}])).unwrap();
        assert_eq!(items.len(), 1);
        assert!(name.is_none());

        let (items, name) = split_payload(json!({
            "documentName": "paper.txt",
            "triples": [{}, {}]
        }))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(name.as_deref(), Some("paper.txt"));

        assert!(split_payload(json!({"triples": "nope"})).is_err());
        assert!(split_payload(json!("nope")).is_err());
    }

    #[test]
    fn test_collect_only_json_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = collect_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_load_document_name_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let bare = dir.path().join("chunk_001.json");
        std::fs::write(&bare, r#"[{"subject":"a","predicate":"b","object":"c"}]"#).unwrap();
        let named = dir.path().join("chunk_002.json");
        std::fs::write(&named, r#"{"documentName":"paper.txt","triples":[]}"#).unwrap();

        assert_eq!(load(&bare, None).unwrap().document_name, "chunk_001");
        assert_eq!(load(&named, None).unwrap().document_name, "paper.txt");
        assert_eq!(
            load(&named, Some("override.txt")).unwrap().document_name,
            "override.txt"
        );
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert!(load(&broken, None).is_err());
    }
}
