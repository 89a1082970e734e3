//! Seed file loading
//!
//! A seed file is a JSON array of stored documents. An optional string `id`
//! key names the document; it is not stored as a field.

use std::path::Path;

use anyhow::{bail, Context};
use cp_models::Document;
use serde_json::Value;

pub type SeedEntry = (Option<String>, Document);

pub fn parse_seed(text: &str) -> anyhow::Result<Vec<SeedEntry>> {
    let value: Value = serde_json::from_str(text).context("seed is not valid JSON")?;
    let Value::Array(items) = value else {
        bail!("seed must be a JSON array of documents");
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(mut document) => {
                let id = match document.remove("id") {
                    Some(Value::String(id)) if !id.trim().is_empty() => Some(id),
                    Some(Value::Null) | None => None,
                    Some(other) => bail!("seed entry {index}: id must be a non-empty string, got {other}"),
                };
                Ok((id, document))
            }
            other => bail!("seed entry {index} is not an object: {other}"),
        })
        .collect()
}

pub async fn load_seed(path: &Path) -> anyhow::Result<Vec<SeedEntry>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    parse_seed(&text).with_context(|| format!("invalid seed file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_seed() {
        let entries = parse_seed(
            r#"[
                {"id": "mesa-1", "nombreProyecto": "Mesa", "estado": "Terminado"},
                {"nombreProyecto": "Silla", "cantidad": 4}
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.as_deref(), Some("mesa-1"));
        assert!(!entries[0].1.contains_key("id"));
        assert_eq!(entries[1].0, None);
        assert_eq!(entries[1].1["cantidad"], serde_json::json!(4));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(parse_seed("{}").is_err());
        assert!(parse_seed("[1, 2]").is_err());
        assert!(parse_seed(r#"[{"id": 7}]"#).is_err());
        assert!(parse_seed("not json").is_err());
    }

    #[tokio::test]
    async fn test_load_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"nombreProyecto": "Ropero"}}]"#).unwrap();

        let entries = load_seed(file.path()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1["nombreProyecto"], serde_json::json!("Ropero"));
    }

    #[tokio::test]
    async fn test_missing_seed_file() {
        let err = load_seed(Path::new("/nonexistent/seed.json")).await.unwrap_err();
        assert!(err.to_string().contains("failed to read seed file"));
    }
}
