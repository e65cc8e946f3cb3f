//! Snapshot reader
//!
//! Loads a whole store file back into the snapshot shape the writer
//! consumed. A missing file is `NotFound`; an existing file with no rows
//! (even a zero-byte one) is a valid empty store.

use crate::codec;
use crate::config::ConnectionOptions;
use crate::db;
use crate::errors::{from_rusqlite, io_error, not_found, Result};
use crate::migrations::apply_migrations;
use crate::tables::{StoreKind, Table, DOCUMENTS, INDEX_METADATA, METADATA, REF_DOC_INFO};
use crate::tracked::run_tracked;
use nodestore_core::errors::{ExError, ExErrorKind};
use nodestore_core::snapshot::docstore::is_reserved;
use nodestore_core::snapshot::{DocStoreSnapshot, IndexStoreSnapshot};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Read a document store snapshot with default connection options
pub fn read_docstore(path: &Path) -> Result<DocStoreSnapshot> {
    read_docstore_with(path, &ConnectionOptions::default())
}

/// Read a document store snapshot
///
/// # Errors
///
/// - `NotFound`: no file at `path`
/// - `Serialization`: a stored payload does not decode, or a `metadata` row
///   uses a key reserved for a namespace
/// - `Schema`: tables could not be ensured or the file has a foreign schema
/// - `Io` / `Persistence`: the file could not be inspected or queried
pub fn read_docstore_with(path: &Path, options: &ConnectionOptions) -> Result<DocStoreSnapshot> {
    run_tracked("read_docstore", StoreKind::Document, path, || {
        let conn = open_store(path, StoreKind::Document, options)?;

        let documents = read_table(&conn, &DOCUMENTS)?;
        let ref_doc_info = read_table(&conn, &REF_DOC_INFO)?;
        let extra = read_table(&conn, &METADATA)?;
        db::close(conn)?;

        if let Some(key) = extra.keys().find(|k| is_reserved(k)) {
            return Err(ExError::new(ExErrorKind::Serialization)
                .with_op("read_metadata")
                .with_entity_id(key.as_str())
                .with_message("Metadata row uses a reserved snapshot key"));
        }

        let rows = documents.len() + ref_doc_info.len() + extra.len();
        let snapshot = DocStoreSnapshot::from_parts(documents, ref_doc_info, extra)
            .map_err(ExError::from)?;
        Ok((snapshot, rows))
    })
}

/// Read an index store snapshot with default connection options
pub fn read_indexstore(path: &Path) -> Result<IndexStoreSnapshot> {
    read_indexstore_with(path, &ConnectionOptions::default())
}

/// Read an index store snapshot
///
/// # Errors
///
/// Same as [`read_docstore_with`], minus the reserved key check.
pub fn read_indexstore_with(
    path: &Path,
    options: &ConnectionOptions,
) -> Result<IndexStoreSnapshot> {
    run_tracked("read_indexstore", StoreKind::Index, path, || {
        let conn = open_store(path, StoreKind::Index, options)?;
        let entries = read_table(&conn, &INDEX_METADATA)?;
        db::close(conn)?;

        let rows = entries.len();
        Ok((IndexStoreSnapshot::new(entries), rows))
    })
}

/// Open an existing store file and ensure its schema
fn open_store(path: &Path, kind: StoreKind, options: &ConnectionOptions) -> Result<Connection> {
    let exists = path
        .try_exists()
        .map_err(|e| io_error("stat_store_file", e).with_path(path))?;
    if !exists {
        return Err(not_found(path));
    }

    let mut conn = db::open_existing(path)?;
    db::configure(&conn, options)?;
    apply_migrations(&mut conn, kind)?;
    Ok(conn)
}

/// Every row of a table, decoded, keyed by the table's key column
fn read_table(conn: &Connection, table: &Table) -> Result<BTreeMap<String, Value>> {
    let op = format!("read_{}", table.name);
    let mut stmt = conn
        .prepare(&table.select_all_sql())
        .map_err(from_rusqlite)?;

    let rows = stmt
        .query_map([], |row| {
            let key: String = row.get(0)?;
            let payload = match row.get_ref(1)? {
                ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                    .map(str::to_string)
                    .map_err(|e| format!("payload is not valid UTF-8: {}", e)),
                other => Err(format!("payload stored as {:?}, expected text", other.data_type())),
            };
            Ok((key, payload))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter()
        .map(|(key, payload)| {
            let value = match payload {
                Ok(text) => codec::decode_entry(&key, &text).map_err(|e| e.with_op(op.as_str()))?,
                Err(reason) => {
                    return Err(ExError::new(ExErrorKind::Serialization)
                        .with_op(op.as_str())
                        .with_entity_id(key.as_str())
                        .with_message(reason))
                }
            };
            Ok((key, value))
        })
        .collect()
}
