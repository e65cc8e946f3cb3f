//! Node store component
//!
//! Pairs a document store and an index store that share one persist
//! directory, the way a service holds them for its lifetime.

use crate::config::StorageConfig;
use crate::errors::Result;
use crate::persist::{PersistentStore, SnapshotBackend, SqliteDocumentStore, SqliteIndexStore};
use nodestore_core::ops::{DocumentStore, IndexStore, SnapshotCapable};
use std::path::Path;

/// Document store plus index store, hydrated from and persisted to one directory
#[derive(Debug)]
pub struct NodeStoreComponent {
    config: StorageConfig,
    doc_store: SqliteDocumentStore,
    index_store: SqliteIndexStore,
}

impl NodeStoreComponent {
    /// Hydrate both stores from `config.persist_dir`
    ///
    /// A store whose file does not exist yet starts empty.
    ///
    /// # Errors
    ///
    /// Any error other than `NotFound` from either store is returned
    /// unchanged; a corrupt or foreign file never silently becomes an empty
    /// store.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let doc_store = hydrate_or_fresh(config, &config.docstore_file, DocumentStore::new)?;
        let index_store = hydrate_or_fresh(config, &config.indexstore_file, IndexStore::new)?;

        tracing::info!(
            persist_dir = %config.persist_dir.display(),
            documents = doc_store.len() as u64,
            index_structs = index_store.len() as u64,
            "Node store opened"
        );

        Ok(Self {
            config: config.clone(),
            doc_store,
            index_store,
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn doc_store(&self) -> &SqliteDocumentStore {
        &self.doc_store
    }

    pub fn doc_store_mut(&mut self) -> &mut SqliteDocumentStore {
        &mut self.doc_store
    }

    pub fn index_store(&self) -> &SqliteIndexStore {
        &self.index_store
    }

    pub fn index_store_mut(&mut self) -> &mut SqliteIndexStore {
        &mut self.index_store
    }

    /// Persist the document store, then the index store
    ///
    /// Each file is written in its own transaction. The pair is not atomic:
    /// if the process dies between the two writes, the document store file
    /// holds the new state while the index store file still holds the old
    /// one. If the document store write fails the index store is not
    /// attempted.
    pub fn persist(&mut self) -> Result<()> {
        let dir = self.config.persist_dir.as_path();
        self.doc_store
            .persist_to_directory(dir, Some(&self.config.docstore_file))?;
        self.index_store
            .persist_to_directory(dir, Some(&self.config.indexstore_file))?;
        Ok(())
    }

    pub fn persist_dir(&self) -> &Path {
        &self.config.persist_dir
    }
}

fn hydrate_or_fresh<S>(
    config: &StorageConfig,
    file_name: &str,
    fresh: impl FnOnce() -> S,
) -> Result<PersistentStore<S>>
where
    S: SnapshotCapable,
    S::Snapshot: SnapshotBackend,
{
    match PersistentStore::<S>::hydrate_from_directory_with(
        &config.persist_dir,
        Some(file_name),
        config.connection,
    ) {
        Ok(store) => Ok(store),
        Err(err) if err.is_not_found() => {
            tracing::info!(
                store_kind = S::Snapshot::KIND.as_str(),
                db_path = ?err.path(),
                "No persisted store, starting fresh"
            );
            Ok(PersistentStore::new(fresh()).with_options(config.connection))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_open_empty_directory_starts_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::with_persist_dir(temp_dir.path());

        let component = NodeStoreComponent::open(&config).unwrap();

        assert!(component.doc_store().is_empty());
        assert!(component.index_store().is_empty());
        assert!(component.doc_store().db_path().is_none());
    }

    #[test]
    fn test_config_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = StorageConfig::with_persist_dir(temp_dir.path().join("store"));
        config.indexstore_file = "vectors.db".to_string();

        let component = NodeStoreComponent::open(&config).unwrap();

        assert_eq!(component.config(), &config);
        assert_eq!(component.persist_dir(), temp_dir.path().join("store").as_path());
    }

    #[test]
    fn test_persist_then_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::with_persist_dir(temp_dir.path());

        let mut component = NodeStoreComponent::open(&config).unwrap();
        component
            .doc_store_mut()
            .add_document("n1", json!({"text": "hi"}), Some("r1"));
        component
            .index_store_mut()
            .add_index_struct("i1", json!({"nodes": ["n1"]}));
        component.persist().unwrap();

        let reopened = NodeStoreComponent::open(&config).unwrap();
        assert_eq!(
            reopened.doc_store().get_document("n1").unwrap(),
            &json!({"text": "hi"})
        );
        assert_eq!(reopened.index_store().len(), 1);
        assert_eq!(
            reopened.doc_store().db_path(),
            Some(temp_dir.path().join("docstore.sqlite").as_path())
        );
    }
}
