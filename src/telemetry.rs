use crate::{Error, Result, config::LogsConfig};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Validates that a log level string is valid
pub fn validate_log_level(level: &str) -> Result<()> {
    level.parse::<LevelFilter>().map_err(|_| {
        Error::config(format!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        ))
    })?;
    Ok(())
}

/// Resolves the effective level: `RUST_LOG` overrides the config.
pub fn resolve_log_level(logs: &LogsConfig) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| logs.level.clone())
}

/// Installs the global JSON subscriber. Call once per process.
pub fn init(logs: &LogsConfig) -> Result<String> {
    let log_level = resolve_log_level(logs);

    // RUST_LOG may carry directives (`crate=debug`), which are not plain levels.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            validate_log_level(&log_level)?;
            EnvFilter::new(&log_level)
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(log_level)
}
