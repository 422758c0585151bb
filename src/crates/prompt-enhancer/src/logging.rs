//! Tracing subscriber setup
//!
//! Logs go to stderr so stdout carries only prompts and model output.
//! `RUST_LOG` takes precedence over the configured level; `--verbose` raises
//! the configured level to `debug`.

use crate::config::LoggingConfig;
use crate::error::{EnhancerError, Result};
use tracing_subscriber::EnvFilter;

/// Output format of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format.trim().to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(EnhancerError::Config(format!(
                "Unknown log format '{}' (expected compact, pretty or json)",
                other
            ))),
        }
    }
}

/// Filter directive used when `RUST_LOG` is unset
pub fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let format = LogFormat::parse(&config.format)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config, verbose)))
        .map_err(|e| EnhancerError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Already-installed subscriber is not an error
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    Ok(())
}
