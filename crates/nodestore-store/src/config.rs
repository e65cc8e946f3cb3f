//! Storage configuration
//!
//! Loaded from TOML, with environment overrides applied last:
//!
//! ```toml
//! persist_dir = "local_data/nodestore"
//! docstore_file = "docstore.sqlite"
//! indexstore_file = "indexstore.sqlite"
//!
//! [connection]
//! journal_mode = "delete"
//! synchronous = "full"
//! ```

use crate::errors::{invalid_input, io_error, Result};
use crate::tables::{DOCSTORE_DB, INDEXSTORE_DB};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding `persist_dir`
pub const ENV_PERSIST_DIR: &str = "NODESTORE_PERSIST_DIR";

/// Where the two store files live and how connections to them are set up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub persist_dir: PathBuf,
    pub docstore_file: String,
    pub indexstore_file: String,
    pub connection: ConnectionOptions,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist_dir: PathBuf::from("local_data/nodestore"),
            docstore_file: DOCSTORE_DB.to_string(),
            indexstore_file: INDEXSTORE_DB.to_string(),
            connection: ConnectionOptions::default(),
        }
    }
}

impl StorageConfig {
    /// Configuration rooted at `persist_dir`, everything else default
    pub fn with_persist_dir(persist_dir: impl Into<PathBuf>) -> Self {
        Self {
            persist_dir: persist_dir.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the document is not valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| invalid_input("parse_config", e.to_string()))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `InvalidInput` if it does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| io_error("read_config", e))?;
        Self::from_toml_str(&content).map_err(|e| e.with_path(path))
    }

    /// Apply `NODESTORE_PERSIST_DIR` if set
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_PERSIST_DIR).filter(|d| !d.is_empty()) {
            self.persist_dir = PathBuf::from(dir);
        }
        self
    }
}

/// Per-connection pragmas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionOptions {
    pub journal_mode: JournalMode,
    pub synchronous: SyncMode,
}

/// SQLite `journal_mode`
///
/// `Delete` keeps a single file per store between calls. `Wal` leaves
/// `-wal`/`-shm` companions next to the file while a connection is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    #[default]
    Delete,
    Truncate,
    Wal,
}

impl JournalMode {
    pub fn as_pragma(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Wal => "WAL",
        }
    }
}

/// SQLite `synchronous`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    #[default]
    Full,
    Normal,
}

impl SyncMode {
    pub fn as_pragma(&self) -> &'static str {
        match self {
            SyncMode::Full => "FULL",
            SyncMode::Normal => "NORMAL",
        }
    }
}
