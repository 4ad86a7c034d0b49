// Ports - Interface definitions (contracts)
//
// The core never builds a command line itself; every external tool sits
// behind one of these capability traits.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for acquiring remote source media
#[async_trait]
pub trait FetchPort: Send + Sync {
    /// Download `url` into `destination_dir` and return the local media file
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<PathBuf, FetchError>;
}

/// Duration and frame size of a media file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaMetadata {
    pub duration: TimeSpec,
    /// Absent for audio-only inputs or when the stream reports no size
    pub dimensions: Option<Dimensions>,
}

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe duration and, when available, pixel dimensions
    async fn probe(&self, file_path: &Path) -> Result<MediaMetadata, ProbeError>;

    /// Pixel dimensions only; `Ok(None)` when the file has no sized video stream
    async fn probe_dimensions(&self, file_path: &Path) -> Result<Option<Dimensions>, ProbeError> {
        Ok(self.probe(file_path).await?.dimensions)
    }
}

/// Everything the transcoder needs to cut, crop and encode one segment
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    pub input: PathBuf,
    pub start: TimeSpec,
    pub duration: TimeSpec,
    pub crop: Option<CropGeometry>,
    pub video_codec: String,
    pub audio_codec: String,
    pub output: PathBuf,
}

/// What the transcoder reported once it exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeReport {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Captured diagnostic output (stderr for ffmpeg)
    pub diagnostics: String,
}

/// Port for segment transcoding
///
/// Implementations must stop the underlying work when the returned future is
/// dropped; the caller enforces its timeout that way.
#[async_trait]
pub trait TranscodePort: Send + Sync {
    /// Run the job to completion. `Err` only when the tool could not be launched.
    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeReport, ExtractionError>;
}
