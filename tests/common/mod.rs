//! In-memory port doubles shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use splitx::app::{ExtractionSettings, SessionSettings, SplitInteractor};
use splitx::domain::errors::{ExtractionError, FetchError, ProbeError};
use splitx::ports::{FetchPort, MediaMetadata, ProbePort, TranscodeJob, TranscodePort, TranscodeReport};
use splitx::{Dimensions, TimeSpec};

/// "Downloads" by writing a placeholder file into the destination directory
pub struct FakeFetch {
    pub fail: bool,
}

#[async_trait]
impl FetchPort for FakeFetch {
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<PathBuf, FetchError> {
        if self.fail {
            return Err(FetchError::new(format!("HTTP Error 404 for {}", url)));
        }
        let path = destination_dir.join("downloaded_video.mp4");
        std::fs::write(&path, b"source").map_err(|e| FetchError::new(e.to_string()))?;
        Ok(path)
    }
}

/// Reports fixed metadata for any file
pub struct FakeProbe {
    pub duration: f64,
    pub dimensions: Option<Dimensions>,
}

impl FakeProbe {
    pub fn hd(duration: f64) -> Self {
        Self {
            duration,
            dimensions: Dimensions::new(1920, 1080),
        }
    }
}

#[async_trait]
impl ProbePort for FakeProbe {
    async fn probe(&self, _file_path: &Path) -> Result<MediaMetadata, ProbeError> {
        Ok(MediaMetadata {
            duration: TimeSpec::from_seconds(self.duration),
            dimensions: self.dimensions,
        })
    }
}

/// Writes the requested output after an optional delay; records every job
#[derive(Default)]
pub struct FakeTranscoder {
    pub jobs: Mutex<Vec<TranscodeJob>>,
    /// Delay keyed on job start time, used to force out-of-order completion
    pub delay_for: Option<fn(&TranscodeJob) -> Duration>,
}

#[async_trait]
impl TranscodePort for FakeTranscoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeReport, ExtractionError> {
        self.jobs.lock().unwrap().push(job.clone());
        if let Some(delay_for) = self.delay_for {
            tokio::time::sleep(delay_for(job)).await;
        }
        std::fs::write(&job.output, format!("segment from {}", job.start.as_seconds())).unwrap();
        Ok(TranscodeReport {
            success: true,
            exit_code: Some(0),
            diagnostics: String::new(),
        })
    }
}

/// Tracks how many transcodes are in flight at once
#[derive(Default)]
pub struct GaugeTranscoder {
    running: AtomicUsize,
    pub peak: AtomicUsize,
}

#[async_trait]
impl TranscodePort for GaugeTranscoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeReport, ExtractionError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        std::fs::write(&job.output, b"segment").unwrap();
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(TranscodeReport {
            success: true,
            exit_code: Some(0),
            diagnostics: String::new(),
        })
    }
}

pub fn settings(temp_root: &Path, max_parallel: usize) -> SessionSettings {
    SessionSettings {
        extraction: ExtractionSettings::new(PathBuf::new()),
        max_parallel,
        archive_name: "video_segments.zip".to_string(),
        temp_root: Some(temp_root.to_path_buf()),
    }
}

pub fn interactor(
    fetch: FakeFetch,
    probe: FakeProbe,
    transcoder: Arc<dyn TranscodePort>,
    settings: SessionSettings,
) -> SplitInteractor {
    SplitInteractor::new(Arc::new(fetch), Arc::new(probe), transcoder, settings)
}
