//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tern - ordered schema migrations with one-time settings seeding
#[derive(Parser, Debug)]
#[command(name = "tern")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path from the config
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Log output format
    #[arg(
        long,
        global = true,
        value_enum,
        env = "TERN_LOG_FORMAT",
        default_value = "text"
    )]
    pub log_format: LogFormat,
}

/// Log output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations, then seed the settings table
    Migrate(MigrateArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Create and seed the settings table if it is empty
    Seed(SeedArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Skip seeding after migrations are applied
    #[arg(long)]
    pub no_seed: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Aligned columns
    Table,
    /// JSON document
    Json,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
