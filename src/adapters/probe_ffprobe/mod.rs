//! FFprobe adapter for media file probing
//!
//! Reads container duration and the size of the first video stream by
//! running the `ffprobe` binary.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::ProbeError;
use crate::domain::model::{Dimensions, TimeSpec};
use crate::ports::{MediaMetadata, ProbePort};

/// FFprobe-based probe adapter
pub struct FfprobeAdapter {
    binary: String,
}

impl FfprobeAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run ffprobe with `args` followed by the file, returning stdout
    async fn run(&self, args: &[&str], file_path: &Path) -> Result<String, ProbeError> {
        debug!("{} {:?} {}", self.binary, args, file_path.display());
        let output = Command::new(&self.binary)
            .args(args)
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProbeError::ToolFailed(format!("failed to execute {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::ToolFailed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse the `format=duration` value; `None` for `N/A`, garbage or negatives
pub fn parse_duration(stdout: &str) -> Option<TimeSpec> {
    let value: f64 = stdout.lines().next()?.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then(|| TimeSpec::from_seconds(value))
}

/// Parse `width,height` as printed with `-of csv=p=0`
pub fn parse_dimensions(stdout: &str) -> Option<Dimensions> {
    let line = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
    let mut fields = line.split(',');
    let width = fields.next()?.trim().parse().ok()?;
    let height = fields.next()?.trim().parse().ok()?;
    Dimensions::new(width, height)
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe(&self, file_path: &Path) -> Result<MediaMetadata, ProbeError> {
        let stdout = self
            .run(
                &[
                    "-v",
                    "error",
                    "-show_entries",
                    "format=duration",
                    "-of",
                    "default=noprint_wrappers=1:nokey=1",
                ],
                file_path,
            )
            .await?;

        let duration = parse_duration(&stdout)
            .ok_or_else(|| ProbeError::DurationUnavailable(file_path.display().to_string()))?;

        let dimensions = match self.probe_dimensions(file_path).await {
            Ok(dimensions) => dimensions,
            Err(e) => {
                warn!("Could not read video dimensions: {}", e);
                None
            }
        };

        debug!(
            duration = duration.as_seconds(),
            dimensions = ?dimensions,
            "Probed {}",
            file_path.display()
        );
        Ok(MediaMetadata {
            duration,
            dimensions,
        })
    }

    async fn probe_dimensions(&self, file_path: &Path) -> Result<Option<Dimensions>, ProbeError> {
        let stdout = self
            .run(
                &[
                    "-v",
                    "error",
                    "-select_streams",
                    "v:0",
                    "-show_entries",
                    "stream=width,height",
                    "-of",
                    "csv=p=0",
                ],
                file_path,
            )
            .await?;
        Ok(parse_dimensions(&stdout))
    }
}
