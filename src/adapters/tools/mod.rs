//! External tool discovery

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::adapters::toml_config::SplitterConfig;
use crate::error::{SplitXError, SplitXResult};

/// An external binary and the flag that makes it print its version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub name: &'static str,
    pub binary: String,
    pub version_flag: &'static str,
}

/// Tools a session needs; yt-dlp only when the source is a URL
pub fn required_tools(config: &SplitterConfig, include_fetch: bool) -> Vec<ToolCheck> {
    let mut tools = vec![
        ToolCheck {
            name: "ffmpeg",
            binary: config.ffmpeg_path.clone(),
            version_flag: "-version",
        },
        ToolCheck {
            name: "ffprobe",
            binary: config.ffprobe_path.clone(),
            version_flag: "-version",
        },
    ];
    if include_fetch {
        tools.push(ToolCheck {
            name: "yt-dlp",
            binary: config.ytdlp_path.clone(),
            version_flag: "--version",
        });
    }
    tools
}

/// Whether the binary can be started at all
pub async fn is_available(tool: &ToolCheck) -> bool {
    match Command::new(&tool.binary)
        .arg(tool.version_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(_) => {
            debug!("Found dependency: {} ({})", tool.name, tool.binary);
            true
        }
        Err(e) => {
            warn!("Dependency '{}' not usable at '{}': {}", tool.name, tool.binary, e);
            false
        }
    }
}

/// Fail with every missing tool listed at once
pub async fn check_dependencies(tools: &[ToolCheck]) -> SplitXResult<()> {
    let mut missing = Vec::new();
    for tool in tools {
        if !is_available(tool).await {
            missing.push(tool.name.to_string());
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SplitXError::DependencyMissing { tools: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_tools() {
        let config = SplitterConfig::default();
        let local = required_tools(&config, false);
        assert_eq!(
            local.iter().map(|t| t.name).collect::<Vec<_>>(),
            vec!["ffmpeg", "ffprobe"]
        );

        let remote = required_tools(&config, true);
        assert_eq!(remote.len(), 3);
        assert_eq!(remote[2].version_flag, "--version");
    }

    #[tokio::test]
    async fn test_missing_tools_are_all_reported() {
        let tools = vec![
            ToolCheck {
                name: "ffmpeg",
                binary: "splitx-missing-a".to_string(),
                version_flag: "-version",
            },
            ToolCheck {
                name: "ffprobe",
                binary: "splitx-missing-b".to_string(),
                version_flag: "-version",
            },
        ];

        match check_dependencies(&tools).await {
            Err(SplitXError::DependencyMissing { tools }) => {
                assert_eq!(tools, vec!["ffmpeg", "ffprobe"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_tools_is_ok() {
        assert!(check_dependencies(&[]).await.is_ok());
    }
}
