//! In-process registry of migration bodies keyed by identifier.
//!
//! The registry is an explicit value built at startup and handed to the
//! runner. It provides no ordering guarantee of its own; the runner sorts
//! identifiers before applying them.

use crate::error::{MigrateError, MigrateResult};
use std::collections::HashMap;
use std::fmt;
use tern_core::MigrationId;
use tern_db::Connection;

/// Signature of a migration body.
///
/// The body runs inside the transaction opened for its migration and must
/// issue every statement through the connection it is given.
pub type MigrationFn = dyn Fn(&Connection) -> MigrateResult<()>;

/// A registered migration: identifier plus body.
pub struct MigrationEntry {
    id: MigrationId,
    body: Box<MigrationFn>,
}

impl MigrationEntry {
    /// The identifier this entry was registered under.
    pub fn id(&self) -> &MigrationId {
        &self.id
    }

    /// Run the body against `conn`.
    pub fn apply(&self, conn: &Connection) -> MigrateResult<()> {
        (self.body)(conn)
    }
}

impl fmt::Debug for MigrationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationEntry")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Mapping from migration identifier to migration body.
#[derive(Debug, Default)]
pub struct MigrationRegistry {
    entries: HashMap<MigrationId, MigrationEntry>,
}

impl MigrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `body` under `id`.
    ///
    /// Re-registering an identifier is rejected with
    /// [`MigrateError::DuplicateMigration`] and leaves the first registration
    /// in place.
    pub fn register<F>(&mut self, id: impl Into<String>, body: F) -> MigrateResult<()>
    where
        F: Fn(&Connection) -> MigrateResult<()> + 'static,
    {
        let id = MigrationId::try_from(id.into())?;
        if self.entries.contains_key(&id) {
            return Err(MigrateError::DuplicateMigration { id });
        }
        log::debug!("Registered migration {id}");
        self.entries.insert(
            id.clone(),
            MigrationEntry {
                id,
                body: Box::new(body),
            },
        );
        Ok(())
    }

    /// Register a migration whose body executes a SQL batch.
    pub fn register_sql(
        &mut self,
        id: impl Into<String>,
        sql: impl Into<String>,
    ) -> MigrateResult<()> {
        let sql = sql.into();
        self.register(id, move |conn| {
            conn.execute_batch(&sql)?;
            Ok(())
        })
    }

    /// The full mapping, in no particular order.
    pub fn all(&self) -> &HashMap<MigrationId, MigrationEntry> {
        &self.entries
    }

    /// Look up a single entry.
    pub fn get(&self, id: &str) -> Option<&MigrationEntry> {
        self.entries.get(id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered identifiers, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &MigrationId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
