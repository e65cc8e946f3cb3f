//! Persistence adapters
//!
//! Bridge an in-memory store to its SQLite file by composition: the adapter
//! owns any `SnapshotCapable` store and only ever talks to it through
//! `export_snapshot` / `from_snapshot`. Payload contents are never inspected.

use crate::config::ConnectionOptions;
use crate::errors::{invalid_input, Result};
use crate::reader::{read_docstore_with, read_indexstore_with};
use crate::tables::StoreKind;
use crate::writer::{write_docstore_with, write_indexstore_with};
use nodestore_core::ops::{DocumentStore, IndexStore, SnapshotCapable};
use nodestore_core::snapshot::{DocStoreSnapshot, IndexStoreSnapshot};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// A snapshot type that knows which store file format it belongs to
pub trait SnapshotBackend: Sized {
    const KIND: StoreKind;

    fn write_snapshot(&self, path: &Path, options: &ConnectionOptions) -> Result<()>;

    fn read_snapshot(path: &Path, options: &ConnectionOptions) -> Result<Self>;
}

impl SnapshotBackend for DocStoreSnapshot {
    const KIND: StoreKind = StoreKind::Document;

    fn write_snapshot(&self, path: &Path, options: &ConnectionOptions) -> Result<()> {
        write_docstore_with(path, self, options)
    }

    fn read_snapshot(path: &Path, options: &ConnectionOptions) -> Result<Self> {
        read_docstore_with(path, options)
    }
}

impl SnapshotBackend for IndexStoreSnapshot {
    const KIND: StoreKind = StoreKind::Index;

    fn write_snapshot(&self, path: &Path, options: &ConnectionOptions) -> Result<()> {
        write_indexstore_with(path, self, options)
    }

    fn read_snapshot(path: &Path, options: &ConnectionOptions) -> Result<Self> {
        read_indexstore_with(path, options)
    }
}

/// Document store persisted to `docstore.sqlite`
pub type SqliteDocumentStore = PersistentStore<DocumentStore>;

/// Index store persisted to `indexstore.sqlite`
pub type SqliteIndexStore = PersistentStore<IndexStore>;

/// An in-memory store plus the file it was last hydrated from or persisted to
///
/// Dropping a `PersistentStore` never touches its file; nothing is flushed
/// implicitly.
#[derive(Debug, Clone)]
pub struct PersistentStore<S> {
    inner: S,
    db_path: Option<PathBuf>,
    options: ConnectionOptions,
}

impl<S> PersistentStore<S>
where
    S: SnapshotCapable,
    S::Snapshot: SnapshotBackend,
{
    /// Wrap a store that has not been persisted yet
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            db_path: None,
            options: ConnectionOptions::default(),
        }
    }

    /// Use these pragmas for every later persist
    pub fn with_options(mut self, options: ConnectionOptions) -> Self {
        self.options = options;
        self
    }

    /// Load the store persisted under `directory`
    ///
    /// `file_name` overrides the default file name for this store kind.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no file exists at the resolved path; callers
    /// decide whether to start fresh. All other errors are final.
    pub fn hydrate_from_directory(
        directory: impl AsRef<Path>,
        file_name: Option<&str>,
    ) -> Result<Self> {
        Self::hydrate_from_directory_with(directory, file_name, ConnectionOptions::default())
    }

    /// [`hydrate_from_directory`](Self::hydrate_from_directory) with explicit pragmas
    pub fn hydrate_from_directory_with(
        directory: impl AsRef<Path>,
        file_name: Option<&str>,
        options: ConnectionOptions,
    ) -> Result<Self> {
        let db_path = resolve_db_path(
            directory.as_ref(),
            file_name,
            S::Snapshot::KIND.default_file_name(),
        )?;
        let snapshot = S::Snapshot::read_snapshot(&db_path, &options)?;

        Ok(Self {
            inner: S::from_snapshot(snapshot),
            db_path: Some(db_path),
            options,
        })
    }

    /// Write the full current state under `directory`
    ///
    /// The file is rewritten as a whole: entries persisted earlier but no
    /// longer in the store are removed.
    pub fn persist_to_directory(
        &mut self,
        directory: impl AsRef<Path>,
        file_name: Option<&str>,
    ) -> Result<()> {
        let db_path = resolve_db_path(
            directory.as_ref(),
            file_name,
            S::Snapshot::KIND.default_file_name(),
        )?;
        self.inner
            .export_snapshot()
            .write_snapshot(&db_path, &self.options)?;
        self.db_path = Some(db_path);
        Ok(())
    }
}

impl<S> PersistentStore<S> {
    /// Path of the last successful hydrate or persist
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> Deref for PersistentStore<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.inner
    }
}

impl<S> DerefMut for PersistentStore<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.inner
    }
}

/// Join `directory` with `file_name`, or with `default` when no override is given
///
/// # Errors
///
/// Returns `InvalidInput` when the override is empty or is not a bare file
/// name (contains a separator or `..`).
pub fn resolve_db_path(
    directory: &Path,
    file_name: Option<&str>,
    default: &str,
) -> Result<PathBuf> {
    let name = file_name.unwrap_or(default);
    let is_bare = Path::new(name)
        .file_name()
        .is_some_and(|n| n == std::ffi::OsStr::new(name));
    if name.is_empty() || !is_bare {
        return Err(invalid_input(
            "resolve_db_path",
            format!("store file name must be a bare file name, got {:?}", name),
        ));
    }
    Ok(directory.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodestore_core::ExErrorKind;

    #[test]
    fn test_resolve_default_name() {
        let path = resolve_db_path(Path::new("/data"), None, "docstore.sqlite").unwrap();
        assert_eq!(path, PathBuf::from("/data/docstore.sqlite"));
    }

    #[test]
    fn test_resolve_override_name() {
        let path = resolve_db_path(Path::new("/data"), Some("docstore.db"), "docstore.sqlite").unwrap();
        assert_eq!(path, PathBuf::from("/data/docstore.db"));
    }

    #[test]
    fn test_resolve_rejects_non_bare_names() {
        for bad in ["", "../docstore.db", "sub/docstore.db", ".."] {
            let err = resolve_db_path(Path::new("/data"), Some(bad), "docstore.sqlite").unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput, "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_new_store_has_no_path() {
        let store = SqliteIndexStore::new(IndexStore::new());
        assert!(store.db_path().is_none());
        assert!(store.is_empty());
    }
}
