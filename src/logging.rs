//! Logging System
//!
//! Structured logging via the `tracing` crate. Logging is off by default so
//! interactive output stays clean; `--verbose`, `--log-level`, or the
//! `REPLICA_LOG` environment variable turn it on. Log lines go to stderr so
//! stdout remains the tool's own output.

use crate::error::EngineError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the logging system.
///
/// Priority order (highest to lowest):
/// 1. `REPLICA_LOG` environment variable (full filter syntax)
/// 2. `--log-level` CLI argument
/// 3. `--verbose` (implies `info`)
/// 4. Off
pub fn init_logging(verbose: bool, level: Option<&str>) -> Result<(), EngineError> {
    let filter = build_env_filter(verbose, level)?;

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}

fn build_env_filter(verbose: bool, level: Option<&str>) -> Result<EnvFilter, EngineError> {
    if let Ok(filter) = EnvFilter::try_from_env("REPLICA_LOG") {
        return Ok(filter);
    }

    let level = match level {
        Some(level) => level,
        None if verbose => "info",
        None => "off",
    };

    EnvFilter::try_new(level)
        .map_err(|e| EngineError::Render(format!("invalid log level {:?}: {}", level, e)))
}
