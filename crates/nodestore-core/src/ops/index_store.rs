use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::StoreError;
use crate::ops::snapshot_capable::SnapshotCapable;
use crate::snapshot::IndexStoreSnapshot;

/// In-memory index store
///
/// Maps index ids to serialized index structs. The structs are opaque JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexStore {
    index_structs: BTreeMap<String, Value>,
}

impl IndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an index struct
    pub fn add_index_struct(&mut self, index_id: impl Into<String>, index_struct: Value) {
        self.index_structs.insert(index_id.into(), index_struct);
    }

    /// Get an index struct by id, or the only one when `index_id` is `None`
    ///
    /// # Errors
    ///
    /// Returns `IndexStructNotFound` for an unknown id, or
    /// `AmbiguousIndexStruct` when no id is given and the store does not hold
    /// exactly one struct.
    pub fn get_index_struct(&self, index_id: Option<&str>) -> Result<&Value, StoreError> {
        match index_id {
            Some(id) => self
                .index_structs
                .get(id)
                .ok_or_else(|| StoreError::IndexStructNotFound {
                    index_id: id.to_string(),
                }),
            None => {
                let mut structs = self.index_structs.values();
                match (structs.next(), structs.next()) {
                    (Some(only), None) => Ok(only),
                    _ => Err(StoreError::AmbiguousIndexStruct {
                        count: self.index_structs.len(),
                    }),
                }
            }
        }
    }

    /// Remove an index struct
    ///
    /// # Errors
    ///
    /// Returns `IndexStructNotFound` if the id is unknown.
    pub fn delete_index_struct(&mut self, index_id: &str) -> Result<Value, StoreError> {
        self.index_structs
            .remove(index_id)
            .ok_or_else(|| StoreError::IndexStructNotFound {
                index_id: index_id.to_string(),
            })
    }

    /// All index structs, ordered by index id
    pub fn index_structs(&self) -> &BTreeMap<String, Value> {
        &self.index_structs
    }

    pub fn len(&self) -> usize {
        self.index_structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_structs.is_empty()
    }
}

impl SnapshotCapable for IndexStore {
    type Snapshot = IndexStoreSnapshot;

    fn export_snapshot(&self) -> IndexStoreSnapshot {
        IndexStoreSnapshot::new(self.index_structs.clone())
    }

    fn from_snapshot(snapshot: IndexStoreSnapshot) -> Self {
        Self {
            index_structs: snapshot.into_entries(),
        }
    }
}
