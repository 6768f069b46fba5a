//! Persisted record of applied migrations.
//!
//! One row per applied identifier in `migration_history`. Rows are inserted
//! by the runner in the same transaction as the migration body and are
//! never updated or deleted.

use crate::error::{MigrateError, MigrateResult};
use tern_core::MigrationId;
use tern_db::{Connection, DbError};

/// Name of the history table.
pub const HISTORY_TABLE: &str = "migration_history";

/// Access to `migration_history` through a borrowed connection.
///
/// Borrowing the connection lets the runner record an identifier inside the
/// transaction that applied it.
pub struct HistoryStore<'c> {
    conn: &'c Connection,
}

impl<'c> HistoryStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create the history table if it does not exist. Safe on every startup.
    pub fn ensure_schema(&self) -> MigrateResult<()> {
        self.conn
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {HISTORY_TABLE} (
                     migration_id VARCHAR PRIMARY KEY
                 );"
            ))
            .map_err(DbError::from)?;
        Ok(())
    }

    /// Whether the history table exists yet.
    pub fn exists(&self) -> MigrateResult<bool> {
        Ok(tern_db::duckdb::relation_exists(self.conn, HISTORY_TABLE)?)
    }

    /// The lexicographically greatest recorded identifier, or `None` when
    /// nothing has been applied.
    pub fn last_applied(&self) -> MigrateResult<Option<MigrationId>> {
        let last: Option<String> = self.conn.query_row(
            &format!("SELECT MAX(migration_id) FROM {HISTORY_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(last.and_then(MigrationId::try_new))
    }

    /// Insert a record for `id`.
    ///
    /// Fails with [`MigrateError::DuplicateRecord`] when `id` is already
    /// recorded; the single-row insert leaves nothing behind on failure.
    pub fn record(&self, id: &MigrationId) -> MigrateResult<()> {
        self.conn
            .execute(
                &format!("INSERT INTO {HISTORY_TABLE} (migration_id) VALUES (?)"),
                duckdb::params![id.as_str()],
            )
            .map_err(|e| match DbError::from(e) {
                DbError::ConstraintViolation(_) => MigrateError::DuplicateRecord { id: id.clone() },
                other => MigrateError::Db(other),
            })?;
        Ok(())
    }

    /// Whether any migration has been recorded.
    pub fn has_any(&self) -> MigrateResult<bool> {
        Ok(tern_db::duckdb::count_rows(self.conn, HISTORY_TABLE)? > 0)
    }

    /// Whether `id` is recorded.
    pub fn is_applied(&self, id: &str) -> MigrateResult<bool> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {HISTORY_TABLE} WHERE migration_id = ?"),
            duckdb::params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All recorded identifiers in ascending order.
    pub fn applied(&self) -> MigrateResult<Vec<MigrationId>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT migration_id FROM {HISTORY_TABLE} ORDER BY migration_id"
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            if let Some(id) = MigrationId::try_new(row?) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
