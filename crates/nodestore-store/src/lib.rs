//! NodeStore Store - SQLite persistence for the document and index stores
//!
//! Provides:
//! - One SQLite file per store kind, schema ensured by embedded migrations
//! - A JSON codec for opaque payloads
//! - Full-replace snapshot writer and snapshot reader
//! - `PersistentStore` adapters that hydrate and persist any `SnapshotCapable` store
//! - `NodeStoreComponent`, pairing both stores under one persist directory

pub mod codec;
pub mod component;
pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod persist;
pub mod reader;
pub mod tables;
pub mod writer;

mod tracked;

// Re-export key types
pub use component::NodeStoreComponent;
pub use config::{ConnectionOptions, JournalMode, StorageConfig, SyncMode};
pub use errors::Result;
pub use persist::{
    resolve_db_path, PersistentStore, SnapshotBackend, SqliteDocumentStore, SqliteIndexStore,
};
pub use reader::{read_docstore, read_indexstore};
pub use tables::{StoreKind, DOCSTORE_DB, INDEXSTORE_DB};
pub use writer::{write_docstore, write_indexstore};
