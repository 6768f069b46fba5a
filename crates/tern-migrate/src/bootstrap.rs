//! Startup sequence: migrate, then seed.

use crate::error::MigrateResult;
use crate::registry::MigrationRegistry;
use crate::runner::{MigrationRunner, RunReport};
use crate::seed::{SeedLoader, SeedOutcome};
use tern_db::Db;

/// What the startup sequence did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub run: RunReport,
    /// `None` when seeding was not requested
    pub seed: Option<SeedOutcome>,
}

/// Apply pending migrations, then ensure and seed the settings table.
///
/// A migration failure returns before seeding is attempted. Seeding only
/// fails hard on database errors.
pub fn bootstrap(
    db: &Db,
    registry: &MigrationRegistry,
    seed: Option<&SeedLoader>,
) -> MigrateResult<BootstrapReport> {
    let run = MigrationRunner::new(registry).run(db)?;

    let seed = match seed {
        Some(loader) => {
            loader.ensure_table(db)?;
            Some(loader.seed_if_empty(db)?)
        }
        None => None,
    };

    Ok(BootstrapReport { run, seed })
}
