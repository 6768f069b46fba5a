//! Error types for the migration engine.

use tern_core::{CoreError, MigrationId};
use tern_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The identifier is already registered (M001).
    #[error("[M001] Migration '{id}' is already registered")]
    DuplicateMigration { id: MigrationId },

    /// The identifier is already recorded in history (M002).
    #[error("[M002] Migration '{id}' is already recorded in migration history")]
    DuplicateRecord { id: MigrationId },

    /// A migration body or its history insert failed; startup must halt (M003).
    #[error("[M003] Migration '{id}' failed: {source}")]
    MigrationFailed {
        id: MigrationId,
        #[source]
        source: Box<MigrateError>,
    },

    /// A migration body reported a failure of its own (M004).
    #[error("[M004] {0}")]
    Body(String),

    /// Two migration files share the same identifier (M005).
    #[error("[M005] Duplicate migration file '{id}': {first} and {second}")]
    DuplicateFile {
        id: String,
        first: String,
        second: String,
    },

    /// Migration file could not be read (M006).
    #[error("[M006] Failed to read migration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid identifier or configuration (M007).
    #[error("[M007] {0}")]
    Core(#[from] CoreError),

    /// Database error with preserved source chain (M008).
    #[error("[M008] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<duckdb::Error> for MigrateError {
    fn from(err: duckdb::Error) -> Self {
        MigrateError::Db(DbError::from(err))
    }
}

impl MigrateError {
    /// Build a body failure from any displayable message.
    pub fn body(message: impl Into<String>) -> Self {
        MigrateError::Body(message.into())
    }

    /// The identifier of the migration that halted the run, if any.
    pub fn failed_migration(&self) -> Option<&MigrationId> {
        match self {
            MigrateError::MigrationFailed { id, .. } => Some(id),
            _ => None,
        }
    }
}
