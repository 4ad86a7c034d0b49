use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, FfprobeAdapter, SplitterConfig, YtDlpAdapter};
use crate::app::segment_extractor::ExtractionSettings;
use crate::app::split_interactor::{SessionSettings, SplitInteractor};
use crate::ports::{FetchPort, ProbePort, TranscodePort};

pub trait AppContainer: Send + Sync {
    fn split_interactor(&self) -> Arc<SplitInteractor>;
    fn probe_port(&self) -> Arc<dyn ProbePort>;
}

/// Wires the process-backed adapters from configuration
pub struct DefaultAppContainer {
    split_interactor: Arc<SplitInteractor>,
    probe_port: Arc<dyn ProbePort>,
}

impl DefaultAppContainer {
    pub fn new(config: &SplitterConfig) -> Self {
        let fetch_port: Arc<dyn FetchPort> = Arc::new(YtDlpAdapter::new(
            config.ytdlp_path.clone(),
            config.download_format.clone(),
        ));
        let probe_port: Arc<dyn ProbePort> = Arc::new(FfprobeAdapter::new(config.ffprobe_path.clone()));
        let transcode_port: Arc<dyn TranscodePort> =
            Arc::new(FfmpegAdapter::new(config.ffmpeg_path.clone()));

        let split_interactor = Arc::new(SplitInteractor::new(
            fetch_port,
            Arc::clone(&probe_port),
            transcode_port,
            session_settings(config),
        ));

        Self {
            split_interactor,
            probe_port,
        }
    }
}

/// Session settings derived from configuration; the output dir is filled in
/// per session
pub fn session_settings(config: &SplitterConfig) -> SessionSettings {
    SessionSettings {
        extraction: ExtractionSettings {
            output_dir: Default::default(),
            video_codec: config.video_codec.clone(),
            audio_codec: config.audio_codec.clone(),
            extension: config.output_extension.clone(),
            part_prefix: config.part_prefix.clone(),
            timeout: config.transcode_timeout(),
            crop_tolerance: config.crop_tolerance,
        },
        max_parallel: config.max_parallel,
        archive_name: config.archive_name.clone(),
        temp_root: config.temp_root.clone(),
    }
}

impl AppContainer for DefaultAppContainer {
    fn split_interactor(&self) -> Arc<SplitInteractor> {
        Arc::clone(&self.split_interactor)
    }

    fn probe_port(&self) -> Arc<dyn ProbePort> {
        Arc::clone(&self.probe_port)
    }
}
