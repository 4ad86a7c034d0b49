//! Error handling module for SplitX

use thiserror::Error;

use crate::domain::errors::{FetchError, ProbeError};

/// Session-level error type; anything here ends the whole run
#[derive(Error, Debug)]
pub enum SplitXError {
    /// Source acquisition failed, nothing to plan
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Source duration could not be read
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Local input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Required external tools are not installed
    #[error("Missing required dependencies: {}", .tools.join(", "))]
    DependencyMissing { tools: Vec<String> },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Archive packaging failed
    #[error("Failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Report serialization failed
    #[error("Failed to serialize report: {message}")]
    Serialization { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SplitXError {
    pub fn config(message: impl Into<String>) -> Self {
        SplitXError::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for SplitX operations
pub type SplitXResult<T> = std::result::Result<T, SplitXError>;
