//! Tern CLI - apply schema migrations and seed baseline settings

use clap::Parser;
use std::process;

mod cli;
mod commands;
mod logging;

use cli::Cli;
use commands::common::ExitCode;
use commands::{migrate, seed, status};

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.global);

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Seed(args) => seed::execute(args, &cli.global),
    };

    match result {
        Ok(()) => process::ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
                return process::ExitCode::from(u8::try_from(*code).unwrap_or(1));
            }
            eprintln!("Error: {err:#}");
            process::ExitCode::FAILURE
        }
    }
}
