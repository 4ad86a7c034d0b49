// Domain errors - Error types for the domain layer

use std::time::Duration;
use thiserror::Error;

/// Malformed time or aspect-ratio text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Time text is not seconds, MM:SS or HH:MM:SS
    #[error("invalid time '{text}': {reason}")]
    Time { text: String, reason: String },
    /// Ratio text is not "original" or "<w>:<h>" with positive numbers
    #[error("invalid aspect ratio '{text}': {reason}")]
    Ratio { text: String, reason: String },
}

impl FormatError {
    pub(crate) fn time(text: &str, reason: impl Into<String>) -> Self {
        FormatError::Time {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ratio(text: &str, reason: impl Into<String>) -> Self {
        FormatError::Ratio {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reasons a segment request is rejected while planning
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("bad time format: {0}")]
    BadTimeFormat(FormatError),
    #[error("start time ({start:.2}s) must be less than end time ({end:.2}s)")]
    StartAfterEnd { start: f64, end: f64 },
    #[error("start time ({start:.2}s) exceeds source duration ({duration:.2}s)")]
    StartBeyondSource { start: f64, duration: f64 },
    #[error("bad aspect ratio: {0}")]
    BadRatioFormat(FormatError),
}

/// Source acquisition failed; fatal to the whole session
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to acquire source: {message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Media metadata could not be read
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbeError {
    /// The probe tool could not be started or exited with an error
    #[error("probe tool failed: {0}")]
    ToolFailed(String),
    /// The container reported no usable duration
    #[error("duration unavailable for {0}")]
    DurationUnavailable(String),
}

/// Per-segment transcode failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    /// The transcode tool could not be started
    #[error("failed to launch transcoder: {0}")]
    Launch(String),
    /// The transcode did not finish within the allotted time
    #[error("timeout")]
    Timeout(Duration),
    /// The transcoder exited with a non-zero status
    #[error("{0}")]
    ToolFailed(String),
    /// The transcoder reported success but produced no file
    #[error("output file missing: {0}")]
    MissingOutput(String),
    /// Source dimensions are needed for a crop but could not be determined
    #[error("dimensions unavailable")]
    DimensionsUnavailable,
    /// Requested ratio collapses the frame to zero width or height
    #[error("crop geometry {0} is degenerate")]
    DegenerateCrop(String),
}
