//! Recursive flatten of nested JSON objects into `_`-joined key paths.

use super::FlatRecord;
use serde_json::{Map, Value};

pub const KEY_SEPARATOR: &str = "_";

/// Flatten one JSON object. Nested objects are walked; arrays and scalars are leaves.
pub fn flatten_object(object: &Map<String, Value>) -> FlatRecord {
    let mut out = FlatRecord::new();
    for (key, value) in object {
        flatten_into(key, value, &mut out);
    }
    out
}

/// Flatten an arbitrary value under `prefix`. A non-object value yields a single column.
pub fn flatten_value(prefix: &str, value: &Value) -> FlatRecord {
    let mut out = FlatRecord::new();
    flatten_into(prefix, value, &mut out);
    out
}

fn flatten_into(path: &str, value: &Value, out: &mut FlatRecord) {
    match value {
        Value::Object(inner) => {
            for (key, v) in inner {
                let joined = format!("{}{}{}", path, KEY_SEPARATOR, key);
                flatten_into(&joined, v, out);
            }
        }
        leaf => {
            out.insert(path.to_string(), leaf.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_keys_are_joined() {
        let v = json!({
            "userWallet": "0xabc",
            "timestamp": 1629178166,
            "actionData": {
                "amount": "2000000000",
                "assetSymbol": "USDC",
                "pool": { "id": "p1" }
            }
        });
        let flat = flatten_object(v.as_object().unwrap());
        assert_eq!(flat["userWallet"], json!("0xabc"));
        assert_eq!(flat["actionData_amount"], json!("2000000000"));
        assert_eq!(flat["actionData_assetSymbol"], json!("USDC"));
        assert_eq!(flat["actionData_pool_id"], json!("p1"));
        assert!(!flat.contains_key("actionData"));
        assert_eq!(flat.len(), 5);
    }

    #[test]
    fn arrays_and_nulls_are_leaves() {
        let v = json!({ "tags": [1, 2], "meta": { "note": null }, "empty": {} });
        let flat = flatten_object(v.as_object().unwrap());
        assert_eq!(flat["tags"], json!([1, 2]));
        assert_eq!(flat["meta_note"], Value::Null);
        assert!(!flat.contains_key("empty"));
    }

    #[test]
    fn scalar_under_prefix() {
        let flat = flatten_value("amount", &json!(5));
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["amount"], json!(5));
    }
}
