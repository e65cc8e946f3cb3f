//! Snapshot writer
//!
//! Replaces the whole content of a store file with one snapshot. All tables
//! of the store are cleared and refilled inside a single transaction, so a
//! reader sees either the previous snapshot or the new one, never a mix.
//! Keys absent from the new snapshot are gone after the write.

use crate::codec;
use crate::config::ConnectionOptions;
use crate::db;
use crate::errors::{from_rusqlite, io_error, Result};
use crate::migrations::apply_migrations;
use crate::tables::{StoreKind, Table, DOCUMENTS, INDEX_METADATA, METADATA, REF_DOC_INFO};
use crate::tracked::run_tracked;
use nodestore_core::snapshot::{DocStoreSnapshot, IndexStoreSnapshot};
use rusqlite::Transaction;
use std::path::Path;

/// Encoded rows destined for one table
struct TableRows {
    table: Table,
    rows: Vec<(String, String)>,
}

/// Write a document store snapshot with default connection options
pub fn write_docstore(path: &Path, snapshot: &DocStoreSnapshot) -> Result<()> {
    write_docstore_with(path, snapshot, &ConnectionOptions::default())
}

/// Write a document store snapshot
///
/// `documents`, `ref_doc_info` and the extra top-level fields go to the
/// `documents`, `ref_doc_info` and `metadata` tables respectively.
///
/// # Errors
///
/// - `Serialization`: a payload could not be encoded (file untouched)
/// - `Io`: the parent directory could not be created
/// - `Schema`: tables could not be ensured
/// - `Persistence`: SQLite failed to open, write or commit
pub fn write_docstore_with(
    path: &Path,
    snapshot: &DocStoreSnapshot,
    options: &ConnectionOptions,
) -> Result<()> {
    run_tracked("write_docstore", StoreKind::Document, path, || {
        let tables = vec![
            TableRows {
                table: DOCUMENTS,
                rows: codec::encode_entries(snapshot.documents())?,
            },
            TableRows {
                table: REF_DOC_INFO,
                rows: codec::encode_entries(snapshot.ref_doc_info())?,
            },
            TableRows {
                table: METADATA,
                rows: codec::encode_entries(snapshot.extra())?,
            },
        ];
        let rows = write_tables(path, StoreKind::Document, &tables, options)?;
        Ok(((), rows))
    })
}

/// Write an index store snapshot with default connection options
pub fn write_indexstore(path: &Path, snapshot: &IndexStoreSnapshot) -> Result<()> {
    write_indexstore_with(path, snapshot, &ConnectionOptions::default())
}

/// Write an index store snapshot
///
/// Every entry goes to the `index_metadata` table.
///
/// # Errors
///
/// Same as [`write_docstore_with`].
pub fn write_indexstore_with(
    path: &Path,
    snapshot: &IndexStoreSnapshot,
    options: &ConnectionOptions,
) -> Result<()> {
    run_tracked("write_indexstore", StoreKind::Index, path, || {
        let tables = vec![TableRows {
            table: INDEX_METADATA,
            rows: codec::encode_entries(snapshot.entries())?,
        }];
        let rows = write_tables(path, StoreKind::Index, &tables, options)?;
        Ok(((), rows))
    })
}

/// Open, ensure schema, replace every table in one transaction, close
///
/// The connection is owned by this function: any early return drops it,
/// which rolls back an uncommitted transaction and closes the file.
fn write_tables(
    path: &Path,
    kind: StoreKind,
    tables: &[TableRows],
    options: &ConnectionOptions,
) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| io_error("create_persist_dir", e).with_path(parent))?;
    }

    let mut conn = db::open(path)?;
    db::configure(&conn, options)?;
    apply_migrations(&mut conn, kind)?;

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut written = 0;
    for table_rows in tables {
        written += replace_table(&tx, table_rows)?;
    }
    tx.commit().map_err(from_rusqlite)?;

    db::close(conn)?;
    Ok(written)
}

fn replace_table(tx: &Transaction, table_rows: &TableRows) -> Result<usize> {
    let table = &table_rows.table;

    tx.execute(&table.delete_all_sql(), [])
        .map_err(from_rusqlite)?;

    let mut stmt = tx.prepare(&table.insert_sql()).map_err(from_rusqlite)?;
    for (key, payload) in &table_rows.rows {
        stmt.execute(rusqlite::params![key, payload])
            .map_err(|e| from_rusqlite(e).with_entity_id(key.as_str()))?;
    }

    tracing::debug!(table = table.name, rows = table_rows.rows.len() as u64, "Replaced table");

    Ok(table_rows.rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn count_rows(path: &Path, table: &str) -> i64 {
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("docstore.sqlite");

        write_docstore(&path, &DocStoreSnapshot::default()).unwrap();

        assert!(path.exists());
        assert_eq!(count_rows(&path, "documents"), 0);
    }

    #[test]
    fn test_extra_fields_land_in_metadata_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docstore.sqlite");
        let snapshot = DocStoreSnapshot::default()
            .with_extra("class_name", json!("X"))
            .unwrap();

        write_docstore(&path, &snapshot).unwrap();

        assert_eq!(count_rows(&path, "metadata"), 1);
        assert_eq!(count_rows(&path, "documents"), 0);
        assert_eq!(count_rows(&path, "ref_doc_info"), 0);
    }

    #[test]
    fn test_rewrite_replaces_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("indexstore.sqlite");

        let mut first = BTreeMap::new();
        first.insert("a".to_string(), json!(1));
        first.insert("b".to_string(), json!(2));
        write_indexstore(&path, &IndexStoreSnapshot::new(first)).unwrap();

        let mut second = BTreeMap::new();
        second.insert("c".to_string(), json!(3));
        write_indexstore(&path, &IndexStoreSnapshot::new(second)).unwrap();

        assert_eq!(count_rows(&path, "index_metadata"), 1);
    }
}
