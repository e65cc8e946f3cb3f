//! NodeStore Core - in-memory stores, snapshots, errors and logging
//!
//! This crate provides the storage-agnostic half of NodeStore:
//! - Snapshot value types for the document store and the index store
//! - The `SnapshotCapable` seam through which persistence reaches a store
//! - In-memory `DocumentStore` and `IndexStore` implementations
//! - The structured error facility (`ExError`, `ExErrorKind`)
//! - The structured logging facility (`init`, `log_op_*` macros, test capture)

pub mod errors;
pub mod logging_facility;
pub mod ops;
pub mod snapshot;

// Used by the logging macros
pub use nodestore_core_types as core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, StoreError};
pub use ops::{DocumentStore, IndexStore, SnapshotCapable};
pub use snapshot::{DocStoreSnapshot, IndexStoreSnapshot};
