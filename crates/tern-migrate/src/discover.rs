//! Discovery of `.sql` migration files.
//!
//! Every `*.sql` file under the configured migration directories becomes a
//! migration whose identifier is the file stem and whose body executes the
//! file contents as one batch.

use crate::error::{MigrateError, MigrateResult};
use crate::registry::MigrationRegistry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A migration loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlMigration {
    /// Identifier (file stem)
    pub id: String,
    /// Path the SQL was read from
    pub path: PathBuf,
    /// File contents
    pub sql: String,
}

/// Discover all `.sql` migration files in `dirs`, sorted by identifier.
///
/// Missing directories are skipped. Two files with the same stem are an
/// error, even in different directories.
pub fn discover_sql_migrations(dirs: &[PathBuf]) -> MigrateResult<Vec<SqlMigration>> {
    let mut files = Vec::new();
    for dir in dirs {
        if !dir.exists() {
            log::debug!("Migration directory {} does not exist", dir.display());
            continue;
        }
        collect_sql_files(dir, &mut files)?;
    }

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut migrations = Vec::with_capacity(files.len());
    for (id, path) in files {
        if let Some(first) = seen.get(&id) {
            return Err(MigrateError::DuplicateFile {
                id,
                first: first.display().to_string(),
                second: path.display().to_string(),
            });
        }
        let sql = std::fs::read_to_string(&path).map_err(|e| MigrateError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        seen.insert(id.clone(), path.clone());
        migrations.push(SqlMigration { id, path, sql });
    }

    migrations.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(migrations)
}

/// Recursively collect `(stem, path)` pairs for `.sql` files under `dir`.
fn collect_sql_files(dir: &Path, files: &mut Vec<(String, PathBuf)>) -> MigrateResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| MigrateError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            collect_sql_files(&path, files)?;
        } else if path.extension().is_some_and(|e| e == "sql") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.push((stem.to_string(), path.clone()));
            }
        }
    }
    Ok(())
}

/// Register every discovered migration. Returns how many were added.
pub fn register_discovered(
    registry: &mut MigrationRegistry,
    migrations: Vec<SqlMigration>,
) -> MigrateResult<usize> {
    let count = migrations.len();
    for migration in migrations {
        registry.register_sql(migration.id, migration.sql)?;
    }
    Ok(count)
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
