//! Document store snapshot.

use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level key holding node payloads
pub const DOCUMENTS_KEY: &str = "documents";

/// Top-level key holding ref-doc bookkeeping
pub const REF_DOC_INFO_KEY: &str = "ref_doc_info";

/// Full state of a document store.
///
/// Serializes to the flat mapping `{documents, ref_doc_info, ..extra}`.
/// Absent `documents` or `ref_doc_info` deserialize as empty mappings.
/// Extra top-level fields (e.g. `class_name`) round-trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocStoreSnapshot {
    #[serde(default)]
    documents: BTreeMap<String, Value>,
    #[serde(default)]
    ref_doc_info: BTreeMap<String, Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl DocStoreSnapshot {
    /// Build a snapshot with no extra metadata
    pub fn new(
        documents: BTreeMap<String, Value>,
        ref_doc_info: BTreeMap<String, Value>,
    ) -> Self {
        Self {
            documents,
            ref_doc_info,
            extra: BTreeMap::new(),
        }
    }

    /// Build a snapshot from all three namespaces
    ///
    /// # Errors
    ///
    /// Returns `ReservedKey` if `extra` uses `documents` or `ref_doc_info`.
    pub fn from_parts(
        documents: BTreeMap<String, Value>,
        ref_doc_info: BTreeMap<String, Value>,
        extra: BTreeMap<String, Value>,
    ) -> Result<Self, StoreError> {
        if let Some(key) = extra.keys().find(|k| is_reserved(k)) {
            return Err(StoreError::ReservedKey { key: key.clone() });
        }
        Ok(Self {
            documents,
            ref_doc_info,
            extra,
        })
    }

    /// Build from parts whose extra keys are already known not to be reserved
    pub(crate) fn from_checked_parts(
        documents: BTreeMap<String, Value>,
        ref_doc_info: BTreeMap<String, Value>,
        extra: BTreeMap<String, Value>,
    ) -> Self {
        debug_assert!(!extra.keys().any(|k| is_reserved(k)));
        Self {
            documents,
            ref_doc_info,
            extra,
        }
    }

    /// Return a copy with one extra top-level field set
    ///
    /// # Errors
    ///
    /// Returns `ReservedKey` if `key` is `documents` or `ref_doc_info`.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Result<Self, StoreError> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(StoreError::ReservedKey { key });
        }
        self.extra.insert(key, value);
        Ok(self)
    }

    /// Parse a generic mapping in the `{documents, ref_doc_info, ..}` shape
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshotShape` if `value` is not a mapping or if either
    /// namespace is present but not a mapping.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        if !value.is_object() {
            return Err(StoreError::InvalidSnapshotShape {
                reason: format!("document store snapshot must be a mapping, got {}", kind_of(&value)),
            });
        }
        serde_json::from_value(value).map_err(|e| StoreError::InvalidSnapshotShape {
            reason: e.to_string(),
        })
    }

    /// Render as a generic mapping
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(
            DOCUMENTS_KEY.to_string(),
            Value::Object(self.documents.clone().into_iter().collect()),
        );
        map.insert(
            REF_DOC_INFO_KEY.to_string(),
            Value::Object(self.ref_doc_info.clone().into_iter().collect()),
        );
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    pub fn documents(&self) -> &BTreeMap<String, Value> {
        &self.documents
    }

    pub fn ref_doc_info(&self) -> &BTreeMap<String, Value> {
        &self.ref_doc_info
    }

    /// Extra top-level fields, excluding the two namespaces
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// True when all three namespaces are empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.ref_doc_info.is_empty() && self.extra.is_empty()
    }

    /// Consume into `(documents, ref_doc_info, extra)`
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, Value>,
        BTreeMap<String, Value>,
        BTreeMap<String, Value>,
    ) {
        (self.documents, self.ref_doc_info, self.extra)
    }
}

/// True for keys that name a snapshot namespace rather than extra metadata
pub fn is_reserved(key: &str) -> bool {
    key == DOCUMENTS_KEY || key == REF_DOC_INFO_KEY
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_splits_namespaces() {
        let value = json!({
            "class_name": "X",
            "documents": {"d1": {"text": "hello"}},
            "ref_doc_info": {"src": {"node_ids": ["d1"]}}
        });

        let snapshot = DocStoreSnapshot::from_value(value).unwrap();

        assert_eq!(snapshot.documents()["d1"], json!({"text": "hello"}));
        assert_eq!(snapshot.ref_doc_info()["src"], json!({"node_ids": ["d1"]}));
        assert_eq!(snapshot.extra().len(), 1);
        assert_eq!(snapshot.extra()["class_name"], json!("X"));
    }

    #[test]
    fn test_absent_namespaces_read_as_empty() {
        let snapshot = DocStoreSnapshot::from_value(json!({"class_name": "X"})).unwrap();

        assert!(snapshot.documents().is_empty());
        assert!(snapshot.ref_doc_info().is_empty());
        assert_eq!(
            snapshot.to_value(),
            json!({"class_name": "X", "documents": {}, "ref_doc_info": {}})
        );
    }

    #[test]
    fn test_from_value_rejects_non_mapping() {
        let err = DocStoreSnapshot::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidSnapshotShape { .. }));

        let err = DocStoreSnapshot::from_value(json!({"documents": "nope"})).unwrap_err();
        assert!(matches!(err, StoreError::InvalidSnapshotShape { .. }));
    }

    #[test]
    fn test_reserved_keys_rejected_as_extra() {
        let err = DocStoreSnapshot::default()
            .with_extra("documents", json!({}))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::ReservedKey {
                key: "documents".to_string()
            }
        );

        let mut extra = BTreeMap::new();
        extra.insert("ref_doc_info".to_string(), json!({}));
        assert!(DocStoreSnapshot::from_parts(BTreeMap::new(), BTreeMap::new(), extra).is_err());
    }

    #[test]
    fn test_value_round_trip_preserves_extras() {
        let value = json!({
            "documents": {"n1": {"text": "a", "metadata": {"page": 3}}},
            "ref_doc_info": {},
            "class_name": "DocumentStore",
            "version": 2
        });

        let snapshot = DocStoreSnapshot::from_value(value.clone()).unwrap();
        assert_eq!(snapshot.to_value(), value);
    }
}
