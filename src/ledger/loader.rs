//! Reads the ledger document: a top-level array of transactions, or an
//! object whose values are such arrays.

use super::{flatten_object, LedgerTable};
use crate::error::{Result, ScoreError};
use serde_json::Value;
use std::path::Path;

/// Read and flatten the ledger at `path`. Missing file or malformed JSON is a parse error.
pub fn load(path: &Path) -> Result<LedgerTable> {
    let data = std::fs::read_to_string(path).map_err(|source| ScoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_str(&data)?;
    tracing::info!(path = %path.display(), rows = table.len(), columns = table.columns().len(), "ledger loaded");
    Ok(table)
}

pub fn load_str(data: &str) -> Result<LedgerTable> {
    let doc: Value = serde_json::from_str(data)?;
    let mut table = LedgerTable::new();
    match doc {
        Value::Array(items) => push_records(&mut table, &items, None)?,
        Value::Object(map) => {
            if !map.is_empty() && map.values().all(Value::is_array) {
                for (key, value) in &map {
                    if let Value::Array(items) = value {
                        push_records(&mut table, items, Some(key))?;
                    }
                }
            } else if !map.is_empty() {
                // A lone object is one transaction
                table.push(flatten_object(&map));
            }
        }
        _ => {
            return Err(ScoreError::Parse(
                "top-level value must be an array or an object".to_string(),
            ))
        }
    }
    Ok(table)
}

fn push_records(table: &mut LedgerTable, items: &[Value], group: Option<&String>) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        let Value::Object(obj) = item else {
            return Err(ScoreError::Parse(match group {
                Some(g) => format!("entry {} of \"{}\" is not an object", i, g),
                None => format!("entry {} is not an object", i),
            }));
        };
        table.push(flatten_object(obj));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_document() {
        let t = load_str(r#"[{"userWallet":"a","actionData":{"amount":"1"}},{"userWallet":"b"}]"#).unwrap();
        assert_eq!(t.len(), 2);
        assert!(t.has_column("actionData_amount"));
        assert!(t.has_column("userWallet"));
    }

    #[test]
    fn keyed_collection_is_concatenated() {
        let t = load_str(r#"{"part1":[{"userWallet":"a"}],"part2":[{"userWallet":"b"},{"userWallet":"c"}]}"#)
            .unwrap();
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn lone_object_is_single_record() {
        let t = load_str(r#"{"userWallet":"a","actionData":{"amount":"1"}}"#).unwrap();
        assert_eq!(t.len(), 1);
        assert!(t.has_column("actionData_amount"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = load_str("[{\"userWallet\": ").unwrap_err();
        assert!(err.is_parse());
        let err = load_str("42").unwrap_err();
        assert!(err.is_parse());
        let err = load_str("[1, 2]").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn missing_file_is_parse_error() {
        let err = load(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.is_parse());
    }
}
