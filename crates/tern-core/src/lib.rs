//! tern-core - Core library for Tern
//!
//! This crate provides the shared types used across all Tern components:
//! project configuration (`tern.yml`), the core error type, and the
//! strongly-typed migration identifier.

pub mod config;
pub mod error;
pub mod migration_id;

pub use config::{Config, DatabaseConfig, SeedConfig};
pub use error::{CoreError, CoreResult};
pub use migration_id::MigrationId;
