//! Migration runner
//!
//! Applies migrations with checksums and idempotency

use crate::errors::{
    checksum_mismatch, foreign_table, from_rusqlite, schema_error, unknown_migration, Result,
};
use crate::migrations::checksums::compute_checksum;
use crate::migrations::embedded::{migrations_for, Migration};
use crate::tables::StoreKind;
use rusqlite::{Connection, OptionalExtension};

/// Apply all pending migrations for `kind` to the database
///
/// Safe to call before every read and write: applied migrations are skipped
/// after their checksum is verified.
///
/// # Errors
///
/// Returns `Schema` if a table cannot be created, if a recorded checksum
/// differs from this build's SQL, or if the file records a migration this
/// build does not know.
pub fn apply_migrations(conn: &mut Connection, kind: StoreKind) -> Result<()> {
    // a file with no recorded migrations is adopted only if it holds no
    // table of the other store kind; checked before anything is written
    if !has_schema_version_table(conn)? || applied_migrations(conn)?.is_empty() {
        reject_foreign_tables(conn, kind)?;
    }

    create_schema_version_table(conn)?;

    let migrations = migrations_for(kind);
    reject_unknown_migrations(conn, kind, migrations)?;

    for migration in migrations {
        apply_migration(conn, migration)?;
    }

    Ok(())
}

/// Migration ids recorded in the file, in application order
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

fn has_schema_version_table(conn: &Connection) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        [],
        |row| row.get(0),
    )
    .map_err(|e| schema_error("schema_version", &e.to_string()))
}

/// Refuse a file that already holds a table owned by the other store kind
fn reject_foreign_tables(conn: &Connection, kind: StoreKind) -> Result<()> {
    let other = kind.other();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .map_err(|e| schema_error("schema_version", &e.to_string()))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
        .map_err(|e| schema_error("schema_version", &e.to_string()))?;

    match names
        .iter()
        .find(|name| other.tables().iter().any(|t| t.name == name.as_str()))
    {
        Some(table) => Err(foreign_table(table, kind.as_str(), other.as_str())),
        None => Ok(()),
    }
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
        [],
    )
    .map_err(|e| schema_error("schema_version", &e.to_string()))?;

    Ok(())
}

fn reject_unknown_migrations(
    conn: &Connection,
    kind: StoreKind,
    migrations: &[Migration],
) -> Result<()> {
    let applied = applied_migrations(conn)
        .map_err(|e| schema_error("schema_version", e.message()))?;

    match applied
        .iter()
        .find(|id| !migrations.iter().any(|m| m.id == id.as_str()))
    {
        Some(unknown) => Err(unknown_migration(unknown, kind.as_str())),
        None => Ok(()),
    }
}

/// Apply a single migration if not already applied
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let checksum = compute_checksum(migration.sql);

    let recorded: Option<Option<String>> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| schema_error(migration.id, &e.to_string()))?;

    match recorded {
        Some(Some(recorded)) if recorded != checksum => {
            return Err(checksum_mismatch(migration.id, &checksum, &recorded));
        }
        Some(_) => return Ok(()),
        None => {}
    }

    let tx = conn
        .transaction()
        .map_err(|e| schema_error(migration.id, &e.to_string()))?;

    tx.execute_batch(migration.sql)
        .map_err(|e| schema_error(migration.id, &e.to_string()))?;

    // OR IGNORE: another connection may have recorded it between our check and here
    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT OR IGNORE INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration.id, now, checksum],
    )
    .map_err(|e| schema_error(migration.id, &e.to_string()))?;

    tx.commit()
        .map_err(|e| schema_error(migration.id, &e.to_string()))?;

    tracing::debug!(migration_id = migration.id, "Applied migration");

    Ok(())
}
