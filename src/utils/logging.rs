//! Structured logging setup.
//!
//! Installs a global `tracing-subscriber` from a [`LoggingConfig`]. Library code only
//! emits events through `tracing`; calling [`init_logging`] is left to the binary
//! embedding this crate.

use crate::config::LoggingConfig;
use crate::error::{constants, FingerprintError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins when set, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()))
}

/// Install the global subscriber described by `config`.
///
/// File output takes precedence over console output when both are enabled.
///
/// # Errors
/// Returns `ConfigError` when the configuration is invalid or a global subscriber is
/// already installed, and `Io` when the log file cannot be opened.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(FingerprintError::ConfigError(problems.join("; ")));
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let installed = match (config.log_to_file, config.log_file_path.as_deref()) {
        (true, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if config.json_format {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
        _ => {
            if config.json_format {
                builder.json().try_init()
            } else {
                builder.try_init()
            }
        }
    };

    installed.map_err(|_| FingerprintError::ConfigError(constants::ERR_SUBSCRIBER_INSTALLED.into()))?;
    tracing::debug!(app = %config.app_name, level = %config.log_level, "logging initialised");
    Ok(())
}
