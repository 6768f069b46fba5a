//! Ordered, exactly-once migration runner.
//!
//! Tracks applied identifiers in [`HistoryStore`] and applies every
//! registered migration after the resume marker (the greatest recorded
//! identifier) in ascending identifier order. Each migration runs in its own
//! transaction together with its history insert; the first failure halts the
//! walk.
//!
//! The resume is tolerant: identifiers sorting below the marker are skipped
//! without checking that each one is recorded. [`MigrationRunner::gaps`]
//! reports the ones that are not.

use crate::error::{MigrateError, MigrateResult};
use crate::history::HistoryStore;
use crate::registry::MigrationRegistry;
use std::collections::HashSet;
use tern_core::MigrationId;
use tern_db::{Connection, Db};

/// Applies the migrations of one registry.
pub struct MigrationRunner<'r> {
    registry: &'r MigrationRegistry,
}

/// What a run would do, computed from the registry and current history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Greatest recorded identifier, if any
    pub resume_from: Option<MigrationId>,
    /// Registered identifiers at or below the marker, ascending
    pub skipped: Vec<MigrationId>,
    /// Registered identifiers to apply, ascending
    pub pending: Vec<MigrationId>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Identifiers applied by this run, in application order
    pub applied: Vec<MigrationId>,
    /// Number of registered identifiers skipped as already applied
    pub skipped: usize,
}

impl<'r> MigrationRunner<'r> {
    pub fn new(registry: &'r MigrationRegistry) -> Self {
        Self { registry }
    }

    /// Compute the plan without writing anything.
    ///
    /// A database without a history table is treated as empty.
    pub fn plan(&self, db: &Db) -> MigrateResult<MigrationPlan> {
        let history = HistoryStore::new(db.conn());
        let resume_from = if history.exists()? && history.has_any()? {
            history.last_applied()?
        } else {
            None
        };
        Ok(self.plan_from(resume_from))
    }

    /// Apply all pending migrations.
    ///
    /// Migrations committed before a failure stay committed. The failing
    /// migration is rolled back and returned as
    /// [`MigrateError::MigrationFailed`]; nothing after it is attempted.
    pub fn run(&self, db: &Db) -> MigrateResult<RunReport> {
        let history = HistoryStore::new(db.conn());
        history.ensure_schema()?;

        let resume_from = if history.has_any()? {
            history.last_applied()?
        } else {
            None
        };
        let plan = self.plan_from(resume_from);

        let mut report = RunReport {
            applied: Vec::with_capacity(plan.pending.len()),
            skipped: plan.skipped.len(),
        };

        if plan.pending.is_empty() {
            log::info!("No pending migrations");
            return Ok(report);
        }

        log::info!(
            "Applying {} pending migration(s) ({} already applied)",
            plan.pending.len(),
            plan.skipped.len()
        );

        for id in plan.pending {
            log::info!("  {id}");
            db.transaction(|tx| self.apply_one(tx, &id))
                .map_err(|e| {
                    log::error!("Migration {id} failed: {e}");
                    MigrateError::MigrationFailed {
                        id: id.clone(),
                        source: Box::new(e),
                    }
                })?;
            report.applied.push(id);
        }

        log::info!("Applied {} migration(s)", report.applied.len());
        Ok(report)
    }

    /// Registered identifiers below the resume marker that are not recorded
    /// in history. A tolerant run never applies these.
    pub fn gaps(&self, db: &Db) -> MigrateResult<Vec<MigrationId>> {
        let plan = self.plan(db)?;
        if plan.skipped.is_empty() {
            return Ok(Vec::new());
        }

        let applied: HashSet<MigrationId> = HistoryStore::new(db.conn())
            .applied()?
            .into_iter()
            .collect();
        Ok(plan
            .skipped
            .into_iter()
            .filter(|id| !applied.contains(id))
            .collect())
    }

    fn apply_one(&self, tx: &Connection, id: &MigrationId) -> MigrateResult<()> {
        let entry = self
            .registry
            .get(id)
            .ok_or_else(|| MigrateError::body(format!("migration '{id}' is not registered")))?;
        entry.apply(tx)?;
        HistoryStore::new(tx).record(id)
    }

    fn plan_from(&self, resume_from: Option<MigrationId>) -> MigrationPlan {
        let mut ordered: Vec<MigrationId> = self.registry.ids().cloned().collect();
        ordered.sort();

        let split = resume_index(&ordered, resume_from.as_ref());
        let pending = ordered.split_off(split);
        for id in &ordered {
            log::debug!("  skipping {id} (at or below resume marker)");
        }

        MigrationPlan {
            resume_from,
            skipped: ordered,
            pending,
        }
    }
}

/// Index of the first identifier to apply in `ordered` (ascending).
///
/// With a marker, everything up to and including the marker is skipped. A
/// marker that is no longer registered falls back to comparing identifiers
/// against it, so registered identifiers sorting above it are still applied.
/// A strict position lookup would apply nothing in that case.
fn resume_index(ordered: &[MigrationId], resume_from: Option<&MigrationId>) -> usize {
    let Some(marker) = resume_from else {
        return 0;
    };

    match ordered.iter().position(|id| id == marker) {
        Some(pos) => pos + 1,
        None => {
            log::warn!(
                "Last applied migration {marker} is not registered; \
                 treating registered migrations up to it as applied"
            );
            ordered.partition_point(|id| id <= marker)
        }
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
