//! Configuration types and parsing for tern.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`SeedConfig::asset_dir`].
pub const ASSET_DIR_ENV: &str = "FILE_PATH";

/// Environment variable overriding [`SeedConfig::table_prefix`].
pub const TABLE_PREFIX_ENV: &str = "DB_PREFIX";

/// Main project configuration from tern.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directories containing `.sql` migration files
    #[serde(default = "default_migration_paths")]
    pub migration_paths: Vec<String>,

    /// Baseline settings seeding
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Settings seed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Seed the settings table on startup when it is empty
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory the default logo/favicon image is written to
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,

    /// Prefix prepended to the settings table name
    #[serde(default)]
    pub table_prefix: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            asset_dir: default_asset_dir(),
            table_prefix: String::new(),
        }
    }
}

fn default_db_path() -> String {
    "./tern.duckdb".to_string()
}

fn default_migration_paths() -> Vec<String> {
    vec!["migrations".to_string()]
}

fn default_asset_dir() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tern.yml or tern.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("tern.yml");
        let yaml_path = dir.join("tern.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Apply `FILE_PATH` and `DB_PREFIX` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(ASSET_DIR_ENV) {
            if !dir.is_empty() {
                log::debug!("{ASSET_DIR_ENV} overrides seed.asset_dir: {dir}");
                self.seed.asset_dir = dir;
            }
        }
        if let Ok(prefix) = std::env::var(TABLE_PREFIX_ENV) {
            log::debug!("{TABLE_PREFIX_ENV} overrides seed.table_prefix: {prefix}");
            self.seed.table_prefix = prefix;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.database.path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        // The prefix is spliced into DDL, so only identifier characters are allowed
        if !self
            .seed
            .table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "seed.table_prefix '{}' may only contain letters, digits, and underscores",
                    self.seed.table_prefix
                ),
            });
        }

        Ok(())
    }

    /// Absolute migration directories, resolved against the project root
    pub fn migration_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.migration_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Absolute asset directory, resolved against the project root
    ///
    /// `.` resolves to the root itself rather than `<root>/.`.
    pub fn asset_dir_absolute(&self, root: &Path) -> PathBuf {
        let dir = Path::new(&self.seed.asset_dir);
        if dir == Path::new(".") {
            root.to_path_buf()
        } else {
            root.join(dir)
        }
    }

    /// Database path resolved against the project root (`:memory:` is kept as-is)
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == ":memory:" {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
