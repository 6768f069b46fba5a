//! Migration engine for Tern.
//!
//! Applies named, ordered schema and data changes to a DuckDB database
//! exactly once, records every applied identifier in `migration_history`,
//! and seeds the baseline settings row on first run.

pub mod bootstrap;
pub mod discover;
pub mod error;
pub mod history;
pub mod registry;
pub mod runner;
pub mod seed;
pub mod settings;

pub use bootstrap::{bootstrap, BootstrapReport};
pub use discover::{discover_sql_migrations, register_discovered, SqlMigration};
pub use error::{MigrateError, MigrateResult};
pub use history::HistoryStore;
pub use registry::{MigrationEntry, MigrationRegistry};
pub use runner::{MigrationPlan, MigrationRunner, RunReport};
pub use seed::{SeedLoader, SeedOutcome};
pub use settings::Settings;
