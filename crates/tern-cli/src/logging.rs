//! Log backend for the `tern` binary.
//!
//! Library crates log through the `log` facade; the subscriber installed
//! here bridges those records and writes them to stderr.

use crate::cli::{GlobalArgs, LogFormat};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting JSON output when set to `production`.
const APP_ENV: &str = "APP_ENV";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// with `--verbose`.
pub(crate) fn init(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(global.verbose)));
    let app_env = std::env::var(APP_ENV).ok();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    let result = if use_json(global.log_format, app_env.as_deref()) {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {e}");
    }
}

pub(crate) fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

pub(crate) fn use_json(format: LogFormat, app_env: Option<&str>) -> bool {
    format == LogFormat::Json || app_env == Some("production")
}

#[cfg(test)]
#[path = "logging_test.rs"]
mod tests;
