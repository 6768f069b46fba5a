//! tern-db - Database layer for Tern
//!
//! This crate provides [`Db`], a thin wrapper around a DuckDB connection
//! with explicit transaction scoping, plus the database error type.

pub mod duckdb;
pub mod error;

pub use crate::duckdb::Db;
pub use error::{DbError, DbResult};

/// Re-exported so migration bodies can name the connection type.
pub use ::duckdb::Connection;
