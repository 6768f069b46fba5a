//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tern_core::MigrationId;
use tern_migrate::{HistoryStore, MigrationPlan, MigrationRunner};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{build_registry, load_project, open_database};

/// State of one registered migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MigrationState {
    /// Recorded in history
    Applied,
    /// Sorts after the resume marker; the next run applies it
    Pending,
    /// Sorts before the resume marker but was never recorded
    Gap,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Applied => write!(f, "applied"),
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Gap => write!(f, "gap"),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MigrationStatus {
    pub(crate) id: String,
    pub(crate) state: MigrationState,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub(crate) resume_from: Option<String>,
    pub(crate) migrations: Vec<MigrationStatus>,
    /// Identifiers in history with no registered migration
    pub(crate) unregistered: Vec<String>,
}

impl StatusReport {
    fn count(&self, state: MigrationState) -> usize {
        self.migrations.iter().filter(|m| m.state == state).count()
    }
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let registry = build_registry(&project)?;
    let db = open_database(&project, global)?;

    let runner = MigrationRunner::new(&registry);
    let plan = runner.plan(&db).context("Failed to read migration history")?;
    let gaps = runner.gaps(&db).context("Failed to read migration history")?;

    let history = HistoryStore::new(db.conn());
    let applied = if history.exists().context("Failed to inspect database")? {
        history.applied().context("Failed to read migration history")?
    } else {
        Vec::new()
    };

    let report = build_report(&plan, &applied, &gaps);
    match args.output {
        StatusOutput::Table => print_table(&report),
        StatusOutput::Json => print_json(&report)?,
    }
    Ok(())
}

/// Combine the plan with recorded history.
pub(crate) fn build_report(
    plan: &MigrationPlan,
    applied: &[MigrationId],
    gaps: &[MigrationId],
) -> StatusReport {
    let applied_set: HashSet<&MigrationId> = applied.iter().collect();
    let gap_set: HashSet<&MigrationId> = gaps.iter().collect();

    let migrations: Vec<MigrationStatus> = plan
        .skipped
        .iter()
        .chain(plan.pending.iter())
        .map(|id| {
            let state = if applied_set.contains(id) {
                MigrationState::Applied
            } else if gap_set.contains(id) {
                MigrationState::Gap
            } else {
                MigrationState::Pending
            };
            MigrationStatus {
                id: id.to_string(),
                state,
            }
        })
        .collect();

    let registered: HashSet<&str> = migrations.iter().map(|m| m.id.as_str()).collect();
    let unregistered = applied
        .iter()
        .filter(|id| !registered.contains(id.as_str()))
        .map(|id| id.to_string())
        .collect();

    StatusReport {
        resume_from: plan.resume_from.as_ref().map(|id| id.to_string()),
        migrations,
        unregistered,
    }
}

fn print_table(report: &StatusReport) {
    let id_width = report
        .migrations
        .iter()
        .map(|m| m.id.len())
        .max()
        .unwrap_or(9)
        .max(9);
    let state_width = 7;

    println!("{:<id_width$}  {:<state_width$}", "MIGRATION", "STATE");
    println!("{:-<id_width$}  {:-<state_width$}", "", "");
    for m in &report.migrations {
        println!("{:<id_width$}  {:<state_width$}", m.id, m.state.to_string());
    }

    println!();
    println!(
        "{} applied, {} pending, {} gap(s)",
        report.count(MigrationState::Applied),
        report.count(MigrationState::Pending),
        report.count(MigrationState::Gap)
    );
    if let Some(marker) = &report.resume_from {
        println!("Resume marker: {marker}");
    }
    if !report.unregistered.is_empty() {
        println!(
            "Recorded but not registered: {}",
            report.unregistered.join(", ")
        );
    }
}

fn print_json(report: &StatusReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize to JSON")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
