// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fetch_ytdlp;
pub mod fs_scratch;
pub mod probe_ffprobe;
pub mod toml_config;
pub mod tools;

// Re-export adapters
pub use exec_ffmpeg::FfmpegAdapter;
pub use fetch_ytdlp::YtDlpAdapter;
pub use fs_scratch::ScratchArea;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::{SplitterConfig, TomlConfigAdapter};
