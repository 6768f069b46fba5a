//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tern_core::Config;
use tern_db::Db;
use tern_migrate::{
    discover_sql_migrations, register_discovered, MigrationRegistry, SeedLoader, SeedOutcome,
};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command has already reported the failure
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and parsed configuration.
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the project from `--config`, or from `tern.yml` in `--project-dir`.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project configuration")?;
    Ok(Project { root, config })
}

/// Database path, honouring the `--database` override.
pub(crate) fn database_path(project: &Project, global: &GlobalArgs) -> String {
    match &global.database {
        Some(path) => path.clone(),
        None => project.config.database_path(&project.root),
    }
}

pub(crate) fn open_database(project: &Project, global: &GlobalArgs) -> Result<Db> {
    let path = database_path(project, global);
    Db::new(&path).with_context(|| format!("Failed to open database at {path}"))
}

/// Build the registry from the `.sql` files under `migration_paths`.
pub(crate) fn build_registry(project: &Project) -> Result<MigrationRegistry> {
    let dirs = project.config.migration_paths_absolute(&project.root);
    let found = discover_sql_migrations(&dirs).context("Failed to discover migrations")?;

    let mut registry = MigrationRegistry::new();
    let count =
        register_discovered(&mut registry, found).context("Failed to register migrations")?;
    log::debug!("Registered {count} migration(s)");
    Ok(registry)
}

pub(crate) fn seed_loader(project: &Project) -> SeedLoader {
    SeedLoader::new(
        project.config.asset_dir_absolute(&project.root),
        &project.config.seed.table_prefix,
    )
}

/// Print a one-line summary of a seeding attempt.
pub(crate) fn print_seed_outcome(table: &str, outcome: &SeedOutcome) {
    match outcome {
        SeedOutcome::AlreadySeeded { rows } => {
            println!("Table {table} already has {rows} row(s); nothing to seed")
        }
        SeedOutcome::Seeded { asset_path, .. } => {
            println!(
                "Seeded {table} with default settings (image {})",
                asset_path.display()
            )
        }
        SeedOutcome::AssetFailed { reason } => {
            println!("Skipped seeding {table}: {reason}")
        }
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
