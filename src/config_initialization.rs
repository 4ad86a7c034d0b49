//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::adapters::toml_config::{SplitterConfig, TomlConfigAdapter};
use crate::error::{SplitXError, SplitXResult};

/// Values supplied on the command line; `None` leaves lower layers in place
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub crop_tolerance: Option<f64>,
    pub transcode_timeout_secs: Option<u64>,
    pub max_parallel: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

/// Effective configuration plus where it came from.
///
/// Built before the log subscriber exists, so the caller reports these facts
/// once logging is up.
#[derive(Debug, Clone)]
pub struct LoadedConfiguration {
    pub config: SplitterConfig,
    /// File that was read, `None` when running on defaults
    pub source_file: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

impl LoadedConfiguration {
    /// Emit what was loaded; call after `init_logging`
    pub fn log_summary(&self) {
        match &self.source_file {
            Some(path) => info!("Loaded configuration from: {}", path.display()),
            None => debug!("No configuration file found, using defaults"),
        }
        debug!(
            env_overrides = self.env_overrides,
            cli_overrides = self.cli_overrides,
            "Configuration hierarchy initialized"
        );
    }
}

/// Build configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    overrides: &ConfigOverrides,
) -> SplitXResult<LoadedConfiguration> {
    let (mut config, source_file) = load_config_file(overrides.config_file.as_deref())?;

    let env_overrides = apply_environment(&mut config, |key| std::env::var(key).ok())?;
    let cli_overrides = apply_cli_overrides(&mut config, overrides);

    config.validate()?;
    Ok(LoadedConfiguration {
        config,
        source_file,
        env_overrides,
        cli_overrides,
    })
}

/// Load configuration from an explicit file, or the first one found on the search path
fn load_config_file(explicit: Option<&Path>) -> SplitXResult<(SplitterConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match TomlConfigAdapter::discover() {
            Some(path) => path,
            None => return Ok((SplitterConfig::default(), None)),
        },
    };
    let config = TomlConfigAdapter::load(&path)?;
    Ok((config, Some(path)))
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> SplitXResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SplitXError::config(format!("Invalid value for {}: {}", key, value)))
}

/// Apply `SPLITX_*` environment variables, returning how many were applied
pub fn apply_environment<F>(config: &mut SplitterConfig, lookup: F) -> SplitXResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    for key in [
        "SPLITX_CROP_TOLERANCE",
        "SPLITX_TRANSCODE_TIMEOUT",
        "SPLITX_MAX_PARALLEL",
        "SPLITX_VIDEO_CODEC",
        "SPLITX_AUDIO_CODEC",
        "SPLITX_FFMPEG_PATH",
        "SPLITX_FFPROBE_PATH",
        "SPLITX_YTDLP_PATH",
        "SPLITX_TEMP_ROOT",
        "SPLITX_OUTPUT_EXTENSION",
        "SPLITX_PART_PREFIX",
        "SPLITX_ARCHIVE_NAME",
        "SPLITX_DOWNLOAD_FORMAT",
        "SPLITX_LOG_LEVEL",
        "SPLITX_LOG_FORMAT",
    ] {
        let Some(value) = lookup(key) else {
            continue;
        };

        match key {
            "SPLITX_CROP_TOLERANCE" => config.crop_tolerance = parse_env(key, &value)?,
            "SPLITX_TRANSCODE_TIMEOUT" => config.transcode_timeout_secs = parse_env(key, &value)?,
            "SPLITX_MAX_PARALLEL" => config.max_parallel = parse_env(key, &value)?,
            "SPLITX_VIDEO_CODEC" => config.video_codec = value,
            "SPLITX_AUDIO_CODEC" => config.audio_codec = value,
            "SPLITX_FFMPEG_PATH" => config.ffmpeg_path = value,
            "SPLITX_FFPROBE_PATH" => config.ffprobe_path = value,
            "SPLITX_YTDLP_PATH" => config.ytdlp_path = value,
            "SPLITX_TEMP_ROOT" => config.temp_root = Some(PathBuf::from(value)),
            "SPLITX_OUTPUT_EXTENSION" => config.output_extension = value,
            "SPLITX_PART_PREFIX" => config.part_prefix = value,
            "SPLITX_ARCHIVE_NAME" => config.archive_name = value,
            "SPLITX_DOWNLOAD_FORMAT" => config.download_format = value,
            "SPLITX_LOG_LEVEL" => config.log_level = value,
            _ => config.log_format = value,
        }
        applied += 1;
    }

    Ok(applied)
}

/// Apply CLI argument overrides, returning how many were applied
fn apply_cli_overrides(config: &mut SplitterConfig, overrides: &ConfigOverrides) -> usize {
    let mut applied = 0;

    if let Some(tolerance) = overrides.crop_tolerance {
        config.crop_tolerance = tolerance;
        applied += 1;
    }
    if let Some(timeout) = overrides.transcode_timeout_secs {
        config.transcode_timeout_secs = timeout;
        applied += 1;
    }
    if let Some(jobs) = overrides.max_parallel {
        config.max_parallel = jobs;
        applied += 1;
    }
    if let Some(level) = &overrides.log_level {
        config.log_level = level.clone();
        applied += 1;
    }
    if let Some(format) = &overrides.log_format {
        config.log_format = format.clone();
        applied += 1;
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = SplitterConfig::default();
        let applied = apply_environment(
            &mut config,
            env(&[
                ("SPLITX_CROP_TOLERANCE", "0.2"),
                ("SPLITX_MAX_PARALLEL", "3"),
                ("SPLITX_FFMPEG_PATH", "/opt/ffmpeg/bin/ffmpeg"),
            ]),
        )
        .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(config.crop_tolerance, 0.2);
        assert_eq!(config.max_parallel, 3);
        assert_eq!(config.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
    }

    #[test]
    fn test_environment_rejects_garbage() {
        let mut config = SplitterConfig::default();
        let result = apply_environment(&mut config, env(&[("SPLITX_TRANSCODE_TIMEOUT", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = SplitterConfig::default();
        apply_environment(&mut config, env(&[("SPLITX_MAX_PARALLEL", "3")])).unwrap();

        let overrides = ConfigOverrides {
            max_parallel: Some(1),
            transcode_timeout_secs: Some(30),
            ..Default::default()
        };
        let applied = apply_cli_overrides(&mut config, &overrides);

        assert_eq!(applied, 2);
        assert_eq!(config.max_parallel, 1);
        assert_eq!(config.transcode_timeout_secs, 30);
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[splitx]\ntranscode_timeout_secs = 45\n").unwrap();

        let (config, source) = load_config_file(Some(&path)).unwrap();
        assert_eq!(config.transcode_timeout_secs, 45);
        assert_eq!(source, Some(path));
    }

    #[test]
    fn test_environment_covers_naming_and_logging_keys() {
        let mut config = SplitterConfig::default();
        let applied = apply_environment(
            &mut config,
            env(&[
                ("SPLITX_OUTPUT_EXTENSION", "mkv"),
                ("SPLITX_PART_PREFIX", "clip"),
                ("SPLITX_ARCHIVE_NAME", "clips.zip"),
                ("SPLITX_DOWNLOAD_FORMAT", "bestvideo+bestaudio"),
                ("SPLITX_LOG_FORMAT", "json"),
                ("SPLITX_LOG_LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(applied, 6);
        assert_eq!(config.output_extension, "mkv");
        assert_eq!(config.part_prefix, "clip");
        assert_eq!(config.archive_name, "clips.zip");
        assert_eq!(config.download_format, "bestvideo+bestaudio");
        assert_eq!(config.log_format, "json");
        assert_eq!(config.log_level, "debug");
        assert!(config.validate().is_ok());
    }
}
