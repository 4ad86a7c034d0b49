// TOML config adapter - Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::rules::DEFAULT_CROP_TOLERANCE;
use crate::error::{SplitXError, SplitXResult};
use crate::utils::logging::LogFormat;

/// Runtime configuration for a splitting session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Aspect difference treated as "no crop needed"
    pub crop_tolerance: f64,
    pub transcode_timeout_secs: u64,
    /// Upper bound on concurrently running transcodes
    pub max_parallel: usize,
    pub video_codec: String,
    pub audio_codec: String,
    pub output_extension: String,
    pub part_prefix: String,
    pub archive_name: String,
    /// yt-dlp format selector
    pub download_format: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub ytdlp_path: String,
    /// Parent directory for the session scratch area (system temp when unset)
    pub temp_root: Option<PathBuf>,
    pub log_level: String,
    pub log_format: String,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            crop_tolerance: DEFAULT_CROP_TOLERANCE,
            transcode_timeout_secs: 120,
            max_parallel: num_cpus::get().clamp(1, 4),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            output_extension: "mp4".to_string(),
            part_prefix: "video_part".to_string(),
            archive_name: "video_segments.zip".to_string(),
            download_format: "best[ext=mp4]/best".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            ytdlp_path: "yt-dlp".to_string(),
            temp_root: None,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl SplitterConfig {
    pub fn transcode_timeout(&self) -> Duration {
        Duration::from_secs(self.transcode_timeout_secs)
    }

    /// Reject values no session could run with
    pub fn validate(&self) -> SplitXResult<()> {
        if !self.crop_tolerance.is_finite() || self.crop_tolerance < 0.0 {
            return Err(SplitXError::config(format!(
                "crop_tolerance must be a non-negative number, got {}",
                self.crop_tolerance
            )));
        }
        if self.transcode_timeout_secs == 0 {
            return Err(SplitXError::config("transcode_timeout_secs must be at least 1"));
        }
        if self.max_parallel == 0 {
            return Err(SplitXError::config("max_parallel must be at least 1"));
        }

        let required = [
            ("video_codec", &self.video_codec),
            ("audio_codec", &self.audio_codec),
            ("output_extension", &self.output_extension),
            ("part_prefix", &self.part_prefix),
            ("archive_name", &self.archive_name),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(SplitXError::config(format!("{} cannot be empty", key)));
            }
        }

        self.log_format.parse::<LogFormat>()?;

        Ok(())
    }
}

/// On-disk layout: settings live under a `[splitx]` table
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    splitx: Option<SplitterConfig>,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Default config file locations, checked in order
    pub const SEARCH_PATHS: [&'static str; 2] = ["splitx.toml", "config/splitx.toml"];

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn parse(toml_content: &str) -> SplitXResult<SplitterConfig> {
        let parsed: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| SplitXError::config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(parsed.splitx.unwrap_or_default())
    }

    /// Load configuration from a file
    pub fn load(file_path: &Path) -> SplitXResult<SplitterConfig> {
        if !file_path.exists() {
            return Err(SplitXError::config(format!(
                "Config file does not exist: {}",
                file_path.display()
            )));
        }

        let content = std::fs::read_to_string(file_path).map_err(|e| {
            SplitXError::config(format!("Failed to read config file {}: {}", file_path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// First config file found on the search path, if any
    pub fn discover() -> Option<PathBuf> {
        Self::SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }
}
