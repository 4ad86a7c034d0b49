//! Logging setup for the CLI

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{SplitXError, SplitXResult};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    Pretty,
    /// JSON format for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = SplitXError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(SplitXError::config(format!(
                "Invalid log format: {}. Valid formats: pretty, json",
                other
            ))),
        }
    }
}

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_filter(level: &str) -> SplitXResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| SplitXError::config(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// machine-readable reports.
pub fn init_logging(level: &str, format: LogFormat) -> SplitXResult<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| SplitXError::config(format!("Failed to initialize logging: {}", e)))
}
