//! yt-dlp acquisition adapter
//!
//! Downloads remote media into the session scratch area.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::domain::errors::FetchError;
use crate::ports::FetchPort;

/// Base name of the downloaded file; yt-dlp fills in the extension
const DOWNLOAD_STEM: &str = "downloaded_video";

/// Extensions accepted as downloaded media, in preference order
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mkv", "avi", "mov"];

/// yt-dlp based fetch adapter
pub struct YtDlpAdapter {
    binary: String,
    format: String,
}

impl YtDlpAdapter {
    /// Create a new adapter; `format` is a yt-dlp format selector
    pub fn new(binary: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            format: format.into(),
        }
    }

    /// Arguments for one download run
    pub fn build_args(&self, url: &str, destination_dir: &Path) -> Vec<String> {
        let template = destination_dir.join(format!("{}.%(ext)s", DOWNLOAD_STEM));
        vec![
            "--format".to_string(),
            self.format.clone(),
            "--no-warnings".to_string(),
            "--no-part".to_string(),
            "--force-overwrites".to_string(),
            "--output".to_string(),
            template.to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }
}

/// Locate the file yt-dlp produced in `dir`.
///
/// Prefers `downloaded_video.<ext>` for the known extensions, then falls back
/// to the most recently modified video file in the directory tree.
pub fn find_downloaded_file(dir: &Path) -> Option<PathBuf> {
    let direct = VIDEO_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", DOWNLOAD_STEM, ext)))
        .find(|candidate| candidate.is_file());
    if direct.is_some() {
        return direct;
    }

    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .max_by_key(|entry| {
            entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH)
        })
        .map(|entry| entry.into_path())
}

#[async_trait]
impl FetchPort for YtDlpAdapter {
    async fn fetch(&self, url: &str, destination_dir: &Path) -> Result<PathBuf, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::new("no URL given"));
        }

        info!("Downloading source: {}", url);
        let args = self.build_args(url, destination_dir);
        debug!("{} {:?}", self.binary, args);

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| FetchError::new(format!("failed to execute {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::new(format!("download failed: {}", stderr.trim())));
        }

        let downloaded = find_downloaded_file(destination_dir).ok_or_else(|| {
            FetchError::new(format!(
                "download reported success but no video file was found in {}",
                destination_dir.display()
            ))
        })?;

        info!("Downloaded source to {}", downloaded.display());
        Ok(downloaded)
    }
}
