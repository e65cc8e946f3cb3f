//! Database connection management
//!
//! Connections are scoped to a single read or write: opened at the start,
//! closed before returning. Nothing here caches a connection.

use crate::config::ConnectionOptions;
use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open a SQLite database at the given path, creating the file if absent
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    Connection::open(path).map_err(|e| from_rusqlite(e).with_path(path))
}

/// Open an existing SQLite database; never creates the file
pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| from_rusqlite(e).with_path(path))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply the configured pragmas to a fresh connection
pub fn configure(conn: &Connection, options: &ConnectionOptions) -> Result<()> {
    // Reading the schema forces page 1, so a file that is not a database fails here
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
        .map_err(from_rusqlite)?;
    // journal_mode answers with the resulting mode, so it needs the checked variant
    let _mode: String = conn
        .pragma_update_and_check(None, "journal_mode", options.journal_mode.as_pragma(), |row| {
            row.get(0)
        })
        .map_err(from_rusqlite)?;
    conn.pragma_update(None, "synchronous", options.synchronous.as_pragma())
        .map_err(from_rusqlite)?;
    Ok(())
}

/// Close a connection, surfacing any error SQLite reports on close
///
/// Dropping a connection also closes it but swallows the error; the success
/// paths use this instead.
pub fn close(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, e)| from_rusqlite(e))
}
