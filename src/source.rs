use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ViewError, ViewResult};

/// Envelope keys the platform API wraps list responses in.
const ENVELOPE_KEYS: [&str; 2] = ["data", "items"];

/// Read a source collection from `path`, or from stdin when `path` is `-`.
pub fn load_items<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let content = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read items from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read {path}"))?
    };

    let items = parse_items(&content).with_context(|| format!("Failed to parse {path}"))?;
    debug!("Loaded {} items from {}", items.len(), path);
    Ok(items)
}

/// Parse a JSON array, a `{"data": [...]}` / `{"items": [...]}` envelope, or
/// JSON Lines. Records that do not fit `T` are skipped with a warning; a
/// document that is not JSON at all is an error.
pub fn parse_items<T: DeserializeOwned>(content: &str) -> ViewResult<Vec<T>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let records: Vec<Value> = serde_json::from_str(trimmed)?;
        return Ok(collect_records(records));
    }

    if trimmed.starts_with('{')
        && let Ok(document) = serde_json::from_str::<Value>(trimmed)
    {
        return match unwrap_envelope(document) {
            Ok(records) => Ok(collect_records(records)),
            Err(single) => Ok(collect_records(vec![single])),
        };
    }

    parse_lines(content)
}

fn unwrap_envelope(document: Value) -> Result<Vec<Value>, Value> {
    let Value::Object(mut map) = document else {
        return Err(document);
    };
    for key in ENVELOPE_KEYS {
        if let Some(Value::Array(records)) = map.get_mut(key) {
            return Ok(std::mem::take(records));
        }
    }
    Err(Value::Object(map))
}

fn collect_records<T: DeserializeOwned>(records: Vec<Value>) -> Vec<T> {
    let total = records.len();
    let items: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(err) => {
                warn!("Skipping malformed record #{}: {}", index, err);
                None
            }
        })
        .collect();
    if items.len() < total {
        debug!("Kept {} of {} records", items.len(), total);
    }
    items
}

fn parse_lines<T: DeserializeOwned>(content: &str) -> ViewResult<Vec<T>> {
    let mut items = Vec::new();
    let mut skipped = 0;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(item) => items.push(item),
            Err(err) => {
                warn!("Skipping malformed line {}: {}", index + 1, err);
                skipped += 1;
            }
        }
    }

    if items.is_empty() && skipped > 0 {
        return Err(ViewError::Parse {
            details: format!("no valid records in {skipped} line(s)"),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogEntry, LogLevel, Service};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_array() {
        let items: Vec<Service> = parse_items(
            r#"[{"id": "1", "name": "web"}, {"id": "2", "name": "db", "status": "running"}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "db");
    }

    #[test]
    fn test_parse_envelope() {
        let items: Vec<Service> =
            parse_items(r#"{"success": true, "data": [{"id": "1", "name": "web"}]}"#).unwrap();
        assert_eq!(items.len(), 1);

        let items: Vec<Service> =
            parse_items(r#"{"items": [{"id": "1", "name": "web"}], "total": 1}"#).unwrap();
        assert_eq!(items[0].id, "1");
    }

    #[test]
    fn test_parse_single_object() {
        let items: Vec<Service> = parse_items(r#"{"id": "1", "name": "web"}"#).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_parse_jsonl_skips_malformed_lines() {
        let content = concat!(
            r#"{"id": "1", "level": "error", "message": "boom"}"#,
            "\n\n",
            "not json\n",
            r#"{"level": "info"}"#,
            "\n",
            r#"{"id": "2", "level": "info", "message": "ok"}"#,
            "\n",
        );
        let items: Vec<LogEntry> = parse_items(content).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].level, LogLevel::Error);
        assert_eq!(items[1].id, "2");
    }

    #[test]
    fn test_array_skips_records_missing_required_fields() {
        let items: Vec<Service> =
            parse_items(r#"[{"id": "1", "name": "web"}, {"name": "no-id"}, 42]"#).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(parse_items::<Service>("[1, 2").is_err());
        assert!(matches!(
            parse_items::<Service>("hello\nworld"),
            Err(ViewError::Parse { .. })
        ));
        assert!(parse_items::<Service>("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_load_items_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "a", "name": "api"}}"#).unwrap();
        writeln!(file, r#"{{"id": "b", "name": "worker"}}"#).unwrap();

        let items: Vec<Service> = load_items(file.path().to_str().unwrap()).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_load_items_missing_file() {
        let err = load_items::<Service>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
