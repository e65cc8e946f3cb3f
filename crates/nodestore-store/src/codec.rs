//! Snapshot codec
//!
//! Payloads are stored as compact JSON text, one value per row. Any
//! JSON-compatible value survives `decode(encode(v)) == v`; malformed text is
//! a `Serialization` error, never coerced.

use crate::errors::{serialization, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Encode one payload
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(|e| serialization("encode", e))
}

/// Decode one payload
pub fn decode(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| serialization("decode", e))
}

/// Decode the payload stored under `key`, naming the key on failure
pub fn decode_entry(key: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| serialization("decode", e).with_entity_id(key))
}

/// Encode every entry of a namespace, in key order
pub fn encode_entries(entries: &BTreeMap<String, Value>) -> Result<Vec<(String, String)>> {
    entries
        .iter()
        .map(|(key, value)| {
            serde_json::to_string(value)
                .map(|text| (key.clone(), text))
                .map_err(|e| serialization("encode", e).with_entity_id(key))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodestore_core::ExErrorKind;
    use serde_json::json;

    #[test]
    fn test_encoding_is_compact_json() {
        let text = encode(&json!({"text": "hello", "metadata": {"page": 1}})).unwrap();
        assert_eq!(text, r#"{"metadata":{"page":1},"text":"hello"}"#);
    }

    #[test]
    fn test_scalars_round_trip() {
        for value in [json!(null), json!(true), json!(-3), json!(2.5), json!("\u{0}nul")] {
            assert_eq!(decode(&encode(&value).unwrap()).unwrap(), value);
        }
    }

    #[test]
    fn test_malformed_text_is_serialization_error() {
        let err = decode_entry("d1", "{\"text\": ").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
        assert_eq!(err.entity_id(), Some("d1"));

        let err = decode("not json").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }

    #[test]
    fn test_encode_entries_keeps_key_order() {
        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), json!(2));
        entries.insert("a".to_string(), json!(1));

        let rows = encode_entries(&entries).unwrap();
        assert_eq!(
            rows,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
    }
}
