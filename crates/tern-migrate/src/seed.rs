//! One-time seeding of the settings table.
//!
//! Seeding is gated only on the settings table being empty; it does not
//! consult migration history. Asset decode and file-write failures are soft:
//! they are logged and seeding is abandoned without inserting the row, so
//! the next startup tries again. A failed insert removes the image it
//! just wrote.

use crate::error::MigrateResult;
use crate::settings::{create_table_sql, Settings, SETTINGS_TABLE};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tern_db::{Db, DbError};

/// Baseline logo image (10x10 PNG), base64-encoded.
pub const DEFAULT_IMAGE_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAoAAAAKCAYAAACNMs+9AAAAFUlEQVR42mNk+M9Qz0AEYBxVSF+FAAhKDveksOjmAAAAAElFTkSuQmCC";

/// Timestamp layout embedded in generated image filenames.
pub const FILENAME_TIME_FORMAT: &str = "%d-%B-%Y-%H-%-M-%-S-%3f";

/// Result of a seeding attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The table already had rows; nothing was written.
    AlreadySeeded { rows: usize },
    /// The image was written and the default row inserted.
    Seeded { filename: String, asset_path: PathBuf },
    /// The image could not be decoded or written; no row was inserted.
    AssetFailed { reason: String },
}

/// Seeds the settings table with its default row.
pub struct SeedLoader {
    table: String,
    asset_dir: PathBuf,
    encoded_image: String,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl SeedLoader {
    /// Loader writing its image under `asset_dir` and seeding
    /// `<table_prefix>settings`.
    pub fn new(asset_dir: impl Into<PathBuf>, table_prefix: &str) -> Self {
        Self {
            table: format!("{table_prefix}{SETTINGS_TABLE}"),
            asset_dir: asset_dir.into(),
            encoded_image: DEFAULT_IMAGE_BASE64.to_string(),
            clock: local_now,
        }
    }

    /// Replace the clock used for filename timestamps.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the base64-encoded image written on seeding.
    pub fn with_encoded_image(mut self, encoded: impl Into<String>) -> Self {
        self.encoded_image = encoded.into();
        self
    }

    /// Fully prefixed settings table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Create the settings table if it does not exist.
    pub fn ensure_table(&self, db: &Db) -> MigrateResult<()> {
        log::debug!("Ensuring table [{}]", self.table);
        db.execute_batch(&create_table_sql(&self.table))?;
        Ok(())
    }

    /// Insert the default settings row when the table is empty.
    ///
    /// Database errors propagate; asset errors yield
    /// [`SeedOutcome::AssetFailed`].
    pub fn seed_if_empty(&self, db: &Db) -> MigrateResult<SeedOutcome> {
        let rows = db.count_rows(&self.table)?;
        if rows > 0 {
            log::debug!("Table [{}] has {rows} row(s); skipping seed", self.table);
            return Ok(SeedOutcome::AlreadySeeded { rows });
        }

        let filename = default_image_filename((self.clock)());
        let settings = Settings::defaults(&filename);

        let image = match STANDARD.decode(&self.encoded_image) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Skipping settings seed: default image does not decode: {e}");
                return Ok(SeedOutcome::AssetFailed {
                    reason: format!("decode failed: {e}"),
                });
            }
        };

        let asset_path = self.asset_dir.join(&filename);
        if let Err(e) = std::fs::write(&asset_path, &image) {
            log::warn!(
                "Skipping settings seed: cannot write {}: {e}",
                asset_path.display()
            );
            return Ok(SeedOutcome::AssetFailed {
                reason: format!("write {} failed: {e}", asset_path.display()),
            });
        }

        if let Err(e) = settings.insert(db.conn(), &self.table) {
            // The row names the image; without it the file is orphaned
            if let Err(remove_err) = std::fs::remove_file(&asset_path) {
                log::warn!(
                    "Failed to remove {} after seed insert failed: {remove_err}",
                    asset_path.display()
                );
            }
            return Err(DbError::from(e).into());
        }
        log::info!(
            "Seeded [{}] with default settings (image {})",
            self.table,
            asset_path.display()
        );

        Ok(SeedOutcome::Seeded {
            filename,
            asset_path,
        })
    }
}

/// Filename of the default image for a seed performed at `at`.
pub fn default_image_filename(at: NaiveDateTime) -> String {
    format!("default-{}.png", at.format(FILENAME_TIME_FORMAT))
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
