//! Index store snapshot.

use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Full state of an index store: a flat mapping of index id to index struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexStoreSnapshot {
    entries: BTreeMap<String, Value>,
}

impl IndexStoreSnapshot {
    pub fn new(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Parse a generic flat mapping
    ///
    /// # Errors
    ///
    /// Returns `InvalidSnapshotShape` if `value` is not a mapping.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            _ => Err(StoreError::InvalidSnapshotShape {
                reason: "index store snapshot must be a mapping".to_string(),
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone().into_iter().collect())
    }

    pub fn entries(&self) -> &BTreeMap<String, Value> {
        &self.entries
    }

    pub fn get(&self, index_id: &str) -> Option<&Value> {
        self.entries.get(index_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> BTreeMap<String, Value> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_mapping_shape() {
        let value = json!({"index_1": {"type": "vector"}});
        let snapshot = IndexStoreSnapshot::from_value(value.clone()).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("index_1"), Some(&json!({"type": "vector"})));
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), value);
    }

    #[test]
    fn test_rejects_non_mapping() {
        assert!(IndexStoreSnapshot::from_value(json!("index_1")).is_err());
    }
}
