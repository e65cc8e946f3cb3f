//! Error handling for nodestore-store
//!
//! Wraps nodestore-core ExError with store-specific helpers

use nodestore_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// No database file at the resolved persist path
pub fn not_found(path: &Path) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op("open_store")
        .with_path(path)
        .with_message("No store file at persist path")
}

/// Create a schema error
pub fn schema_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Schema)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Schema)
        .with_op("migration_checksum")
        .with_entity_id(migration_id)
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// A recorded migration this build does not know about
pub fn unknown_migration(migration_id: &str, store_kind: &str) -> ExError {
    ExError::new(ExErrorKind::Schema)
        .with_op("migration")
        .with_entity_id(migration_id)
        .with_message(format!(
            "File records migration {} which is not part of the {} schema (newer format or wrong store kind)",
            migration_id, store_kind
        ))
}

/// An unversioned file that already holds a table of the other store kind
pub fn foreign_table(table: &str, store_kind: &str, other_kind: &str) -> ExError {
    ExError::new(ExErrorKind::Schema)
        .with_op("migration")
        .with_entity_id(table)
        .with_message(format!(
            "File holds {} table {} and cannot be adopted as a {} file",
            other_kind, table, store_kind
        ))
}

/// A payload that could not be encoded or decoded
pub fn serialization(op: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an invalid input error
pub fn invalid_input(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_message(reason)
}
