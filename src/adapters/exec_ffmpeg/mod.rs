//! FFmpeg execution adapter
//!
//! Cuts, optionally crops, and re-encodes one segment per invocation.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::ExtractionError;
use crate::ports::{TranscodeJob, TranscodePort, TranscodeReport};

/// FFmpeg-based transcode adapter
pub struct FfmpegAdapter {
    binary: String,
}

impl FfmpegAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Seconds with millisecond precision, the form ffmpeg takes for `-ss`/`-t`
fn seconds_arg(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

/// Full ffmpeg argument list for a job.
///
/// The seek follows the input so the cut is frame accurate; timestamps are
/// shifted to start at zero.
pub fn build_ffmpeg_args(job: &TranscodeJob) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        job.input.to_string_lossy().into_owned(),
        "-ss".to_string(),
        seconds_arg(job.start.as_seconds()),
        "-t".to_string(),
        seconds_arg(job.duration.as_seconds()),
    ];

    if let Some(crop) = &job.crop {
        args.push("-vf".to_string());
        args.push(crop.to_filter());
    }

    args.extend([
        "-c:v".to_string(),
        job.video_codec.clone(),
        "-c:a".to_string(),
        job.audio_codec.clone(),
        "-avoid_negative_ts".to_string(),
        "make_zero".to_string(),
        "-y".to_string(),
        job.output.to_string_lossy().into_owned(),
    ]);

    args
}

#[async_trait]
impl TranscodePort for FfmpegAdapter {
    async fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeReport, ExtractionError> {
        let args = build_ffmpeg_args(job);
        debug!("{} {}", self.binary, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractionError::Launch(format!("{}: {}", self.binary, e)))?;

        Ok(TranscodeReport {
            success: output.status.success(),
            exit_code: output.status.code(),
            diagnostics: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
