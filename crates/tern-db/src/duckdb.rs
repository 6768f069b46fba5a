//! DuckDB connection wrapper
//!
//! [`Db`] owns a DuckDB [`Connection`] and provides helpers for opening,
//! transacting, and counting rows. Migration bodies receive the borrowed
//! `&Connection` while a transaction opened by [`Db::transaction`] is active.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;

/// Wrapper around a DuckDB connection.
///
/// Single-threaded: migrations run sequentially at startup, so the
/// connection is owned directly rather than behind a `Mutex`.
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Create a new in-memory DuckDB connection
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open (or create) a DuckDB database at `path`
    pub fn open(path: &Path) -> DbResult<Self> {
        log::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute multiple SQL statements outside of an explicit transaction.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    ///
    /// The error type is the caller's, so domain errors raised by `body` come
    /// back unchanged; transaction control failures convert through
    /// [`DbError`].
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
            }
        }
        result
    }

    /// Count the rows of `table`.
    pub fn count_rows(&self, table: &str) -> DbResult<usize> {
        count_rows(&self.conn, table)
    }

    /// Check if a table or view exists
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        relation_exists(&self.conn, name)
    }
}

/// Count the rows of `table` on a borrowed connection.
///
/// `table` is spliced into the statement and must be a trusted identifier.
pub fn count_rows(conn: &Connection, table: &str) -> DbResult<usize> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count as usize)
}

/// Check if a table or view exists on a borrowed connection.
pub fn relation_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    // Handle schema-qualified names
    let (schema, table) = match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    };

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )
        .map_err(|e| DbError::ExecutionError(e.to_string()))?;

    Ok(count > 0)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
