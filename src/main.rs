//! SplitX segment extractor
//!
//! Downloads a video (or takes a local file), cuts it into several
//! time-bounded segments, recrops each to an optional aspect ratio, and
//! bundles the results into a zip archive.
//!
//! # Usage
//!
//! ```bash
//! splitter split --url "https://example.com/watch?v=abc" \
//!     --segment 0:10,0:40,9:16 --segment 1:00,1:30
//! splitter split --input talk.mp4 --segment 90,120,1:1 --format json
//! splitter inspect --input talk.mp4
//! splitter check
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

use splitx::cli::{self, Cli};
use splitx::config_initialization::initialize_configuration_hierarchy;
use splitx::utils::logging::{init_logging, LogFormat};

/// Main entry point for the SplitX CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = initialize_configuration_hierarchy(&cli.config_overrides())?;
    let log_format: LogFormat = loaded.config.log_format.parse()?;
    init_logging(&loaded.config.log_level, log_format)?;
    loaded.log_summary();

    let config = loaded.config;
    debug!(?config, "Effective configuration");

    if let Err(e) = cli::run(cli.command, &config).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
