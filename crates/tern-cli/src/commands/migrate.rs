//! Migrate command implementation

use anyhow::{Context, Result};
use tern_migrate::{bootstrap, MigrateError};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{
    build_registry, load_project, open_database, print_seed_outcome, seed_loader, ExitCode,
};

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let registry = build_registry(&project)?;
    let db = open_database(&project, global)?;

    let loader = if project.config.seed.enabled && !args.no_seed {
        Some(seed_loader(&project))
    } else {
        log::debug!("Seeding disabled for this run");
        None
    };

    let report = match bootstrap(&db, &registry, loader.as_ref()) {
        Ok(report) => report,
        Err(MigrateError::MigrationFailed { id, source }) => {
            eprintln!("Migration {id} failed: {source}");
            eprintln!("Migrations before {id} remain applied; nothing after it was attempted.");
            return Err(ExitCode(1).into());
        }
        Err(e) => return Err(e).context("Startup sequence failed"),
    };

    if report.run.applied.is_empty() {
        println!(
            "Database is up to date ({} migration(s) already applied)",
            report.run.skipped
        );
    } else {
        for id in &report.run.applied {
            println!("  applied {id}");
        }
        println!(
            "Applied {} migration(s), {} already applied",
            report.run.applied.len(),
            report.run.skipped
        );
    }

    if let (Some(loader), Some(outcome)) = (&loader, &report.seed) {
        print_seed_outcome(loader.table(), outcome);
    }

    Ok(())
}
