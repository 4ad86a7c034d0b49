// Segment extractor - Turns one plan into one output file or one failure

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::errors::ExtractionError;
use crate::domain::model::*;
use crate::domain::rules::{CropCalculator, DEFAULT_CROP_TOLERANCE};
use crate::ports::{ProbePort, TranscodeJob, TranscodePort};

/// Fixed encoding and naming choices shared by every segment of a session
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSettings {
    pub output_dir: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    pub extension: String,
    pub part_prefix: String,
    pub timeout: Duration,
    pub crop_tolerance: f64,
}

impl ExtractionSettings {
    /// Defaults matching the stock configuration, writing into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            extension: "mp4".to_string(),
            part_prefix: "video_part".to_string(),
            timeout: Duration::from_secs(120),
            crop_tolerance: DEFAULT_CROP_TOLERANCE,
        }
    }

    /// Deterministic output path; two-digit index keeps names sorted
    pub fn output_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{:02}.{}", self.part_prefix, index, self.extension))
    }
}

/// Executes segment plans through the transcode port
pub struct SegmentExtractor {
    probe_port: Arc<dyn ProbePort>,
    transcode_port: Arc<dyn TranscodePort>,
    settings: ExtractionSettings,
}

impl SegmentExtractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        transcode_port: Arc<dyn TranscodePort>,
        settings: ExtractionSettings,
    ) -> Self {
        Self {
            probe_port,
            transcode_port,
            settings,
        }
    }

    /// Extract one segment. Never fails as a whole; every problem becomes a
    /// `Failure` outcome for this plan only.
    pub async fn extract(&self, source: &SourceMedia, plan: &SegmentPlan) -> SegmentOutcome {
        match self.run(source, plan).await {
            Ok(output) => {
                info!(segment = plan.index, "Segment written to {}", output.display());
                SegmentOutcome::success(plan.index, output)
            }
            Err(e) => {
                warn!(segment = plan.index, "Segment failed: {}", e);
                SegmentOutcome::failure(plan.index, e.to_string())
            }
        }
    }

    async fn run(&self, source: &SourceMedia, plan: &SegmentPlan) -> Result<PathBuf, ExtractionError> {
        let crop = self.resolve_crop(source, plan).await?;
        if let Some(geometry) = &crop {
            if geometry.is_degenerate() {
                return Err(ExtractionError::DegenerateCrop(geometry.to_string()));
            }
        }

        let job = TranscodeJob {
            input: source.path.clone(),
            start: plan.start,
            duration: plan.duration,
            crop,
            video_codec: self.settings.video_codec.clone(),
            audio_codec: self.settings.audio_codec.clone(),
            output: self.settings.output_path(plan.index),
        };

        debug!(
            segment = plan.index,
            start = %plan.start,
            end = %plan.end(),
            crop = ?job.crop,
            "Transcoding segment"
        );

        // Dropping the transcode future on expiry stops the tool
        let report = tokio::time::timeout(self.settings.timeout, self.transcode_port.transcode(&job))
            .await
            .map_err(|_| ExtractionError::Timeout(self.settings.timeout))??;

        if !report.success {
            let diagnostics = if report.diagnostics.is_empty() {
                match report.exit_code {
                    Some(code) => format!("transcoder exited with status {}", code),
                    None => "transcoder terminated by signal".to_string(),
                }
            } else {
                report.diagnostics
            };
            return Err(ExtractionError::ToolFailed(diagnostics));
        }

        if !job.output.is_file() {
            return Err(ExtractionError::MissingOutput(job.output.display().to_string()));
        }

        Ok(job.output)
    }

    /// Crop to apply, re-probing the source when planning had no dimensions
    async fn resolve_crop(
        &self,
        source: &SourceMedia,
        plan: &SegmentPlan,
    ) -> Result<Option<CropGeometry>, ExtractionError> {
        match plan.crop {
            CropSpec::Keep => Ok(None),
            CropSpec::Resolved(geometry) => Ok(Some(geometry)),
            CropSpec::Unresolved => {
                let dimensions = match source.dimensions {
                    Some(dimensions) => dimensions,
                    None => self
                        .probe_port
                        .probe_dimensions(&source.path)
                        .await
                        .map_err(|e| {
                            debug!(segment = plan.index, "Dimension probe failed: {}", e);
                            ExtractionError::DimensionsUnavailable
                        })?
                        .ok_or(ExtractionError::DimensionsUnavailable)?,
                };
                Ok(CropCalculator::compute_crop(
                    dimensions,
                    plan.ratio,
                    self.settings.crop_tolerance,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ProbeError;
    use crate::ports::{MediaMetadata, TranscodeReport};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    struct FixedProbe(Option<Dimensions>);

    #[async_trait]
    impl ProbePort for FixedProbe {
        async fn probe(&self, _file_path: &Path) -> Result<MediaMetadata, ProbeError> {
            Ok(MediaMetadata {
                duration: TimeSpec::from_seconds(100.0),
                dimensions: self.0,
            })
        }
    }

    /// Records jobs and writes the output file unless told to fail
    struct RecordingTranscoder {
        jobs: Mutex<Vec<TranscodeJob>>,
        fail_with: Option<String>,
        write_output: bool,
        delay: Option<Duration>,
    }

    impl RecordingTranscoder {
        fn ok() -> Self {
            Self {
                jobs: Mutex::new(Vec::new()),
                fail_with: None,
                write_output: true,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl TranscodePort for RecordingTranscoder {
        async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeReport, ExtractionError> {
            self.jobs.lock().unwrap().push(job.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(stderr) = &self.fail_with {
                return Ok(TranscodeReport {
                    success: false,
                    exit_code: Some(1),
                    diagnostics: stderr.clone(),
                });
            }
            if self.write_output {
                std::fs::write(&job.output, b"segment").unwrap();
            }
            Ok(TranscodeReport {
                success: true,
                exit_code: Some(0),
                diagnostics: String::new(),
            })
        }
    }

    fn plan(index: usize, ratio: AspectRatio, crop: CropSpec) -> SegmentPlan {
        SegmentPlan {
            index,
            start: TimeSpec::from_seconds(5.0),
            duration: TimeSpec::from_seconds(10.0),
            ratio,
            crop,
            end_clamped: false,
        }
    }

    fn vertical() -> AspectRatio {
        AspectRatio::Ratio {
            width: 9.0,
            height: 16.0,
        }
    }

    fn extractor(
        dir: &Path,
        probe: Option<Dimensions>,
        transcoder: Arc<RecordingTranscoder>,
    ) -> SegmentExtractor {
        SegmentExtractor::new(
            Arc::new(FixedProbe(probe)),
            transcoder,
            ExtractionSettings::new(dir),
        )
    }

    #[test]
    fn test_output_path_is_zero_padded() {
        let settings = ExtractionSettings::new("/out");
        assert_eq!(settings.output_path(3), PathBuf::from("/out/video_part_03.mp4"));
        assert_eq!(settings.output_path(12), PathBuf::from("/out/video_part_12.mp4"));
    }

    #[tokio::test]
    async fn test_success_without_crop() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::ok());
        let extractor = extractor(dir.path(), None, Arc::clone(&transcoder));
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(1, AspectRatio::Original, CropSpec::Keep))
            .await;

        assert_eq!(outcome, SegmentOutcome::success(1, dir.path().join("video_part_01.mp4")));
        let jobs = transcoder.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].crop.is_none());
        assert_eq!(jobs[0].start.as_seconds(), 5.0);
        assert_eq!(jobs[0].duration.as_seconds(), 10.0);
    }

    #[tokio::test]
    async fn test_unresolved_crop_probes_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::ok());
        let extractor = extractor(dir.path(), Dimensions::new(1920, 1080), Arc::clone(&transcoder));
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(2, vertical(), CropSpec::Unresolved))
            .await;

        assert!(outcome.is_success());
        let jobs = transcoder.jobs.lock().unwrap();
        assert_eq!(
            jobs[0].crop,
            Some(CropGeometry {
                width: 606,
                height: 1080,
                x: 656,
                y: 0
            })
        );
    }

    #[tokio::test]
    async fn test_dimensions_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::ok());
        let extractor = extractor(dir.path(), None, Arc::clone(&transcoder));
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(1, vertical(), CropSpec::Unresolved))
            .await;

        assert_eq!(outcome, SegmentOutcome::failure(1, "dimensions unavailable"));
        assert!(transcoder.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tool_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder {
            fail_with: Some("Invalid data found when processing input".to_string()),
            ..RecordingTranscoder::ok()
        });
        let extractor = extractor(dir.path(), None, transcoder);
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(4, AspectRatio::Original, CropSpec::Keep))
            .await;

        assert_eq!(
            outcome,
            SegmentOutcome::failure(4, "Invalid data found when processing input")
        );
    }

    #[tokio::test]
    async fn test_missing_output_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder {
            write_output: false,
            ..RecordingTranscoder::ok()
        });
        let extractor = extractor(dir.path(), None, transcoder);
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(1, AspectRatio::Original, CropSpec::Keep))
            .await;

        assert!(!outcome.is_success());
        match outcome {
            SegmentOutcome::Failure(f) => assert!(f.reason.starts_with("output file missing")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_segment_failure() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder {
            delay: Some(Duration::from_secs(5)),
            ..RecordingTranscoder::ok()
        });
        let mut settings = ExtractionSettings::new(dir.path());
        settings.timeout = Duration::from_millis(20);
        let extractor = SegmentExtractor::new(Arc::new(FixedProbe(None)), transcoder, settings);
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(1, AspectRatio::Original, CropSpec::Keep))
            .await;

        assert_eq!(outcome, SegmentOutcome::failure(1, "timeout"));
    }

    #[tokio::test]
    async fn test_degenerate_crop_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::ok());
        let extractor = extractor(dir.path(), Dimensions::new(1, 1), Arc::clone(&transcoder));
        let source = SourceMedia::new("/src.mp4", TimeSpec::from_seconds(100.0), None);

        let outcome = extractor
            .extract(&source, &plan(1, vertical(), CropSpec::Unresolved))
            .await;

        assert!(!outcome.is_success());
        assert!(transcoder.jobs.lock().unwrap().is_empty());
    }
}
