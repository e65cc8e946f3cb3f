use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::errors::StoreError;
use crate::ops::snapshot_capable::SnapshotCapable;
use crate::snapshot::docstore::is_reserved;
use crate::snapshot::DocStoreSnapshot;

/// Extra metadata key naming the store implementation
pub const CLASS_NAME_KEY: &str = "class_name";

const NODE_IDS_KEY: &str = "node_ids";

/// In-memory document store
///
/// Holds node payloads keyed by node id, ref-doc bookkeeping keyed by source
/// document id, and free-form extra metadata. Payloads are opaque JSON values.
/// Not thread-safe; callers serialize access.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStore {
    docs: BTreeMap<String, Value>,
    ref_doc_info: BTreeMap<String, Value>,
    metadata: BTreeMap<String, Value>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(CLASS_NAME_KEY.to_string(), json!("DocumentStore"));
        Self {
            docs: BTreeMap::new(),
            ref_doc_info: BTreeMap::new(),
            metadata,
        }
    }

    /// Add or replace a node payload
    ///
    /// When `ref_doc_id` is given, the node id is registered under that ref
    /// doc's `node_ids` list (created as `{"node_ids": [], "metadata": {}}` on
    /// first use). Re-adding a node never duplicates its id in the list.
    pub fn add_document(
        &mut self,
        node_id: impl Into<String>,
        payload: Value,
        ref_doc_id: Option<&str>,
    ) {
        let node_id = node_id.into();

        if let Some(ref_doc_id) = ref_doc_id {
            let entry = self
                .ref_doc_info
                .entry(ref_doc_id.to_string())
                .or_insert_with(|| json!({"node_ids": [], "metadata": {}}));
            match node_ids_mut(entry) {
                Some(ids) => {
                    if !ids.iter().any(|id| id.as_str() == Some(node_id.as_str())) {
                        ids.push(Value::String(node_id.clone()));
                    }
                }
                None => tracing::warn!(
                    ref_doc_id = ref_doc_id,
                    node_id = %node_id,
                    "Ref doc entry is not a mapping; node not registered"
                ),
            }
        }

        self.docs.insert(node_id, payload);
    }

    /// Get a node payload
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the node does not exist.
    pub fn get_document(&self, node_id: &str) -> Result<&Value, StoreError> {
        self.docs
            .get(node_id)
            .ok_or_else(|| StoreError::DocumentNotFound {
                node_id: node_id.to_string(),
            })
    }

    pub fn document_exists(&self, node_id: &str) -> bool {
        self.docs.contains_key(node_id)
    }

    /// All node payloads, ordered by node id
    pub fn docs(&self) -> &BTreeMap<String, Value> {
        &self.docs
    }

    /// Remove a node and unregister it from any ref doc listing it
    ///
    /// A ref doc entry whose `node_ids` list becomes empty is removed too.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the node does not exist.
    pub fn delete_document(&mut self, node_id: &str) -> Result<Value, StoreError> {
        let payload = self
            .docs
            .remove(node_id)
            .ok_or_else(|| StoreError::DocumentNotFound {
                node_id: node_id.to_string(),
            })?;

        let mut emptied = Vec::new();
        for (ref_doc_id, entry) in self.ref_doc_info.iter_mut() {
            let Some(ids) = existing_node_ids_mut(entry) else {
                continue;
            };
            let before = ids.len();
            ids.retain(|id| id.as_str() != Some(node_id));
            if ids.len() != before && ids.is_empty() {
                emptied.push(ref_doc_id.clone());
            }
        }
        for ref_doc_id in emptied {
            self.ref_doc_info.remove(&ref_doc_id);
        }

        Ok(payload)
    }

    /// Get the bookkeeping entry for a source document
    pub fn get_ref_doc_info(&self, ref_doc_id: &str) -> Option<&Value> {
        self.ref_doc_info.get(ref_doc_id)
    }

    /// All ref doc entries, ordered by source document id
    pub fn all_ref_doc_info(&self) -> &BTreeMap<String, Value> {
        &self.ref_doc_info
    }

    /// Remove a source document together with every node it lists
    ///
    /// Returns the ids of the nodes that were removed.
    ///
    /// # Errors
    ///
    /// Returns `RefDocNotFound` if the source document is unknown.
    pub fn delete_ref_doc(&mut self, ref_doc_id: &str) -> Result<Vec<String>, StoreError> {
        let mut entry =
            self.ref_doc_info
                .remove(ref_doc_id)
                .ok_or_else(|| StoreError::RefDocNotFound {
                    ref_doc_id: ref_doc_id.to_string(),
                })?;

        let node_ids: Vec<String> = existing_node_ids_mut(&mut entry)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(node_ids
            .into_iter()
            .filter(|id| self.docs.remove(id).is_some())
            .collect())
    }

    /// Set an extra top-level metadata field
    ///
    /// # Errors
    ///
    /// Returns `ReservedKey` for `documents` or `ref_doc_info`.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) -> Result<(), StoreError> {
        let key = key.into();
        if is_reserved(&key) {
            return Err(StoreError::ReservedKey { key });
        }
        self.metadata.insert(key, value);
        Ok(())
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Number of node payloads
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl SnapshotCapable for DocumentStore {
    type Snapshot = DocStoreSnapshot;

    fn export_snapshot(&self) -> DocStoreSnapshot {
        // metadata keys are checked by set_metadata, so no reserved key can appear
        DocStoreSnapshot::from_checked_parts(
            self.docs.clone(),
            self.ref_doc_info.clone(),
            self.metadata.clone(),
        )
    }

    fn from_snapshot(snapshot: DocStoreSnapshot) -> Self {
        let (docs, ref_doc_info, metadata) = snapshot.into_parts();
        Self {
            docs,
            ref_doc_info,
            metadata,
        }
    }
}

/// The `node_ids` list of a ref doc entry, created if the entry is a mapping without one
fn node_ids_mut(entry: &mut Value) -> Option<&mut Vec<Value>> {
    entry
        .as_object_mut()?
        .entry(NODE_IDS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
}

/// The `node_ids` list of a ref doc entry, only if already present
fn existing_node_ids_mut(entry: &mut Value) -> Option<&mut Vec<Value>> {
    entry.as_object_mut()?.get_mut(NODE_IDS_KEY)?.as_array_mut()
}
