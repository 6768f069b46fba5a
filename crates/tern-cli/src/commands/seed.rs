//! Seed command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, SeedArgs};
use crate::commands::common::{load_project, open_database, print_seed_outcome, seed_loader};

/// Execute the seed command
pub(crate) fn execute(_args: &SeedArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project, global)?;
    let loader = seed_loader(&project);

    loader
        .ensure_table(&db)
        .with_context(|| format!("Failed to create table {}", loader.table()))?;
    let outcome = loader
        .seed_if_empty(&db)
        .with_context(|| format!("Failed to seed table {}", loader.table()))?;

    print_seed_outcome(loader.table(), &outcome);
    Ok(())
}
