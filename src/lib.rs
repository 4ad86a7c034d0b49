//! SplitX Segment Extractor Library
//!
//! Fetches a video, cuts it into time-bounded segments, optionally recrops
//! each segment to a target aspect ratio, and bundles the results into a zip
//! archive. External tools (yt-dlp, ffprobe, ffmpeg) sit behind the traits in
//! [`ports`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{
    AspectRatio, CropGeometry, Dimensions, ProcessingReport, SegmentOutcome, SegmentPlan,
    SegmentRequest, SourceMedia, TimeSpec,
};
pub use error::{SplitXError, SplitXResult};
