// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::FormatError;

/// Time specification - a finite, non-negative number of seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse user time text: plain seconds, `MM:SS` or `HH:MM:SS`.
    ///
    /// Hours and minutes must be integers; the seconds component may carry a
    /// fraction. No upper bound is applied here.
    pub fn parse(time_str: &str) -> Result<Self, FormatError> {
        let trimmed = time_str.trim();
        if trimmed.is_empty() {
            return Err(FormatError::time(time_str, "empty time"));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        let seconds = match parts.as_slice() {
            [secs] => Self::parse_seconds(time_str, secs)?,
            [minutes, secs] => {
                let minutes = Self::parse_whole(time_str, minutes, "minutes")?;
                minutes as f64 * 60.0 + Self::parse_seconds(time_str, secs)?
            }
            [hours, minutes, secs] => {
                let hours = Self::parse_whole(time_str, hours, "hours")?;
                let minutes = Self::parse_whole(time_str, minutes, "minutes")?;
                hours as f64 * 3600.0 + minutes as f64 * 60.0 + Self::parse_seconds(time_str, secs)?
            }
            _ => {
                return Err(FormatError::time(
                    time_str,
                    "expected seconds, MM:SS or HH:MM:SS",
                ))
            }
        };

        Ok(Self::from_seconds(seconds))
    }

    fn parse_whole(text: &str, component: &str, name: &str) -> Result<u64, FormatError> {
        component
            .trim()
            .parse::<u64>()
            .map_err(|_| FormatError::time(text, format!("{} must be a whole number", name)))
    }

    fn parse_seconds(text: &str, component: &str) -> Result<f64, FormatError> {
        let value = component
            .trim()
            .parse::<f64>()
            .map_err(|_| FormatError::time(text, "seconds must be a number"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(FormatError::time(text, "seconds must be finite and non-negative"));
        }
        Ok(value)
    }

    /// Display form `M:SS.ss`; minutes are unpadded.
    pub fn format_clock(&self) -> String {
        let minutes = (self.seconds / 60.0).floor() as u64;
        let secs = self.seconds % 60.0;
        format!("{}:{:05.2}", minutes, secs)
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_clock())
    }
}

/// Target proportion for a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// Keep the source frame, no recrop
    Original,
    Ratio { width: f64, height: f64 },
}

impl AspectRatio {
    /// Parse `original` (any case) or `<w>:<h>` with both parts strictly positive
    pub fn parse(ratio_str: &str) -> Result<Self, FormatError> {
        let trimmed = ratio_str.trim();
        if trimmed.eq_ignore_ascii_case("original") {
            return Ok(AspectRatio::Original);
        }

        let (w, h) = trimmed
            .split_once(':')
            .ok_or_else(|| FormatError::ratio(ratio_str, "expected <width>:<height>"))?;
        let width = Self::parse_side(ratio_str, w)?;
        let height = Self::parse_side(ratio_str, h)?;

        Ok(AspectRatio::Ratio { width, height })
    }

    fn parse_side(text: &str, side: &str) -> Result<f64, FormatError> {
        let value = side
            .trim()
            .parse::<f64>()
            .map_err(|_| FormatError::ratio(text, format!("'{}' is not a number", side)))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(FormatError::ratio(text, "both sides must be positive"));
        }
        Ok(value)
    }

    /// Width divided by height, `None` for `Original`
    pub fn value(&self) -> Option<f64> {
        match self {
            AspectRatio::Original => None,
            AspectRatio::Ratio { width, height } => Some(width / height),
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self, AspectRatio::Original)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Original => write!(f, "original"),
            AspectRatio::Ratio { width, height } => write!(f, "{}:{}", width, height),
        }
    }
}

/// Pixel dimensions of the first video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Both sides must be non-zero
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An acquired, probed source; read-only for the rest of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMedia {
    pub path: PathBuf,
    pub duration: TimeSpec,
    pub dimensions: Option<Dimensions>,
}

impl SourceMedia {
    pub fn new(path: impl Into<PathBuf>, duration: TimeSpec, dimensions: Option<Dimensions>) -> Self {
        Self {
            path: path.into(),
            duration,
            dimensions,
        }
    }
}

/// Raw user input for one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRequest {
    pub start: String,
    pub end: String,
    pub ratio: String,
}

impl SegmentRequest {
    pub fn new(start: impl Into<String>, end: impl Into<String>, ratio: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            ratio: ratio.into(),
        }
    }
}

/// Crop rectangle; every field is an even number of pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropGeometry {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropGeometry {
    /// ffmpeg `crop` filter expression
    pub fn to_filter(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn fits_within(&self, dimensions: &Dimensions) -> bool {
        self.x + self.width <= dimensions.width && self.y + self.height <= dimensions.height
    }
}

impl fmt::Display for CropGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// How a plan's frame is cropped
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CropSpec {
    /// Frame left untouched (original ratio, or already within tolerance)
    Keep,
    /// A ratio was requested but source dimensions were unknown at plan time
    Unresolved,
    Resolved(CropGeometry),
}

/// Validated, normalized segment ready for extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPlan {
    /// 1-based position of the originating request
    pub index: usize,
    pub start: TimeSpec,
    pub duration: TimeSpec,
    pub ratio: AspectRatio,
    pub crop: CropSpec,
    /// End time was beyond the source and got clamped
    pub end_clamped: bool,
}

impl SegmentPlan {
    pub fn end(&self) -> TimeSpec {
        TimeSpec::from_seconds(self.start.seconds + self.duration.seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSuccess {
    pub index: usize,
    pub output: PathBuf,
}

impl SegmentSuccess {
    /// Base filename used for archive membership
    pub fn file_name(&self) -> Option<&str> {
        self.output.file_name().and_then(|name| name.to_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentFailure {
    pub index: usize,
    pub reason: String,
}

/// Result of attempting one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentOutcome {
    Success(SegmentSuccess),
    Failure(SegmentFailure),
}

impl SegmentOutcome {
    pub fn success(index: usize, output: impl AsRef<Path>) -> Self {
        SegmentOutcome::Success(SegmentSuccess {
            index,
            output: output.as_ref().to_path_buf(),
        })
    }

    pub fn failure(index: usize, reason: impl Into<String>) -> Self {
        SegmentOutcome::Failure(SegmentFailure {
            index,
            reason: reason.into(),
        })
    }

    pub fn index(&self) -> usize {
        match self {
            SegmentOutcome::Success(s) => s.index,
            SegmentOutcome::Failure(f) => f.index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SegmentOutcome::Success(_))
    }
}

/// Successes and failures of one processing run, each in request order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingReport {
    pub successes: Vec<SegmentSuccess>,
    pub failures: Vec<SegmentFailure>,
    pub generated_at: DateTime<Utc>,
}

impl ProcessingReport {
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests;
