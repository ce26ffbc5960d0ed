// Diagnostic logging setup for the `ec` binary
use crate::errors::{EarnError, Result};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding a tracing filter, e.g. `earnclock=debug`
pub const LOG_ENV: &str = "EARNCLOCK_LOG";

/// Map `-v` repetitions to a filter level
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. `EARNCLOCK_LOG` overrides `-v`.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(spec) if !spec.trim().is_empty() => {
            EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)))
        }
        _ => EnvFilter::new(level_for(verbosity)),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| EarnError::ConfigError(format!("Failed to init logging: {}", e)))
}
