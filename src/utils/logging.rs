//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;
use crate::domain::errors::DomainError;
use crate::ports::LogLevel;

/// Build the event filter: `RUST_LOG` wins over the `--log-level` value
pub fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber, writing to stderr
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<(), DomainError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| DomainError::ConfigError(format!("Failed to initialize logging: {}", e)))
}
