//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args, ValueEnum};
use clap_num::number_range;

use crate::domain::model::SegmentRequest;

/// Report rendering
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Parse `START,END[,RATIO]`; ratio defaults to `original`.
///
/// Only the shape is checked here. Bad times or ratios are reported per
/// segment once the source is known.
pub fn parse_segment(value: &str) -> Result<SegmentRequest, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [start, end] => Ok(SegmentRequest::new(*start, *end, "original")),
        [start, end, ratio] => Ok(SegmentRequest::new(*start, *end, *ratio)),
        _ => Err(format!(
            "expected START,END[,RATIO] (e.g. 1:30,2:00,9:16), got '{}'",
            value
        )),
    }
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    number_range(value, 1, 64)
}

fn parse_timeout(value: &str) -> Result<u64, String> {
    number_range(value, 1, 86_400)
}

/// Arguments for the split command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "input"])))]
pub struct SplitArgs {
    /// Video URL to download
    #[arg(short, long)]
    pub url: Option<String>,

    /// Local video file instead of a URL
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Segment as START,END[,RATIO]; repeat for more segments.
    /// Times are seconds, MM:SS or HH:MM:SS; RATIO is "original" or W:H
    #[arg(short, long = "segment", value_name = "START,END[,RATIO]", required = true, value_parser = parse_segment)]
    pub segments: Vec<SegmentRequest>,

    /// Directory receiving the segment files and the archive
    #[arg(short, long, default_value = "splitx-output")]
    pub output_dir: PathBuf,

    /// Maximum number of segments transcoded at once
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Per-segment transcode timeout in seconds
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Aspect difference below which no crop is applied
    #[arg(long)]
    pub crop_tolerance: Option<f64>,

    /// Validate and plan segments without transcoding
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Skip the downloader check (local files only)
    #[arg(long)]
    pub local_only: bool,
}
