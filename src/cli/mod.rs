//! CLI module for SplitX
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::adapters::SplitterConfig;
use crate::config_initialization::ConfigOverrides;

pub mod args;
pub mod commands;

/// SplitX segment extractor
///
/// Fetches a video and exports several time-bounded, optionally re-cropped
/// segments, bundled into a zip archive.
#[derive(Parser, Debug)]
#[command(name = "splitter")]
#[command(about = "SplitX - Cut a video into cropped segments")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: splitx.toml or config/splitx.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level or filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format: pretty or json
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract segments from a remote or local video
    Split(args::SplitArgs),
    /// Show duration and frame size of a media file
    Inspect(args::InspectArgs),
    /// Check that the external tools are installed
    Check(args::CheckArgs),
}

impl Cli {
    /// Command-line values that take precedence over file and environment
    pub fn config_overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            config_file: self.config.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..Default::default()
        };

        if let Commands::Split(split) = &self.command {
            overrides.crop_tolerance = split.crop_tolerance;
            overrides.transcode_timeout_secs = split.timeout;
            overrides.max_parallel = split.jobs;
        }

        overrides
    }
}

/// Dispatch the parsed command
pub async fn run(command: Commands, config: &SplitterConfig) -> Result<()> {
    match command {
        Commands::Split(args) => commands::split(args, config).await,
        Commands::Inspect(args) => commands::inspect(args, config).await,
        Commands::Check(args) => commands::check(args, config).await,
    }
}
