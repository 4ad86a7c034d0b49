//! Command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::adapters::tools::{check_dependencies, required_tools};
use crate::adapters::SplitterConfig;
use crate::app::{AppContainer, DefaultAppContainer, SourceLocator, SplitRequest, SplitResponse};
use crate::cli::args::{CheckArgs, InspectArgs, OutputFormat, SplitArgs};
use crate::domain::model::{CropSpec, Dimensions, ProcessingReport, TimeSpec};
use crate::error::SplitXError;
use crate::utils::format_file_size;

/// Execute the split command
pub async fn split(args: SplitArgs, config: &SplitterConfig) -> Result<()> {
    let source = match (args.url, args.input) {
        (Some(url), _) => SourceLocator::Url(url),
        (None, Some(path)) => SourceLocator::LocalFile(path),
        (None, None) => anyhow::bail!("either --url or --input is required"),
    };

    let include_fetch = matches!(source, SourceLocator::Url(_));
    check_dependencies(&required_tools(config, include_fetch)).await?;

    info!("Splitting {} segment(s)", args.segments.len());
    let container = DefaultAppContainer::new(config);
    let response = container
        .split_interactor()
        .execute(SplitRequest {
            source,
            segments: args.segments,
            output_dir: args.output_dir,
            dry_run: args.dry_run,
        })
        .await?;

    print!("{}", render(&response, args.format, render_split_text)?);
    Ok(())
}

/// Media facts shown by `inspect`
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub path: String,
    pub duration: TimeSpec,
    pub dimensions: Option<Dimensions>,
    pub size_bytes: u64,
}

/// Execute the inspect command
pub async fn inspect(args: InspectArgs, config: &SplitterConfig) -> Result<()> {
    if !args.input.is_file() {
        return Err(SplitXError::InputFileNotFound {
            path: args.input.display().to_string(),
        }
        .into());
    }
    check_dependencies(&required_tools(config, false)).await?;

    let container = DefaultAppContainer::new(config);
    let metadata = container
        .probe_port()
        .probe(&args.input)
        .await
        .map_err(SplitXError::from)?;
    let size_bytes = std::fs::metadata(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?
        .len();

    let report = InspectReport {
        path: args.input.display().to_string(),
        duration: metadata.duration,
        dimensions: metadata.dimensions,
        size_bytes,
    };
    print!("{}", render(&report, args.format, render_inspect_text)?);
    Ok(())
}

/// Execute the check command
pub async fn check(args: CheckArgs, config: &SplitterConfig) -> Result<()> {
    let tools = required_tools(config, !args.local_only);
    check_dependencies(&tools).await?;
    for tool in &tools {
        println!("{:<8} ok ({})", tool.name, tool.binary);
    }
    Ok(())
}

fn render<T: Serialize>(value: &T, format: OutputFormat, text: fn(&T) -> String) -> Result<String> {
    let rendered = match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value).map_err(|e| SplitXError::Serialization {
                message: e.to_string(),
            })?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| SplitXError::Serialization {
            message: e.to_string(),
        })?,
    };
    Ok(rendered)
}

fn render_inspect_text(report: &InspectReport) -> String {
    let dimensions = report
        .dimensions
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    format!(
        "File:       {}\nDuration:   {} ({:.2}s)\nDimensions: {}\nSize:       {}\n",
        report.path,
        report.duration,
        report.duration.as_seconds(),
        dimensions,
        format_file_size(report.size_bytes)
    )
}

fn render_split_text(response: &SplitResponse) -> String {
    let mut out = format!(
        "Source: {} ({})\n",
        response.source.path.display(),
        response.source.duration
    );

    match &response.report {
        None => {
            out.push_str(&format!(
                "Planned {} of {} segment(s):\n",
                response.planned.len(),
                response.planned.len() + response.rejected.len()
            ));
            for plan in &response.planned {
                let crop = match plan.crop {
                    CropSpec::Keep => "no crop".to_string(),
                    CropSpec::Unresolved => "crop pending".to_string(),
                    CropSpec::Resolved(geometry) => geometry.to_filter(),
                };
                let clamped = if plan.end_clamped { " (end clamped)" } else { "" };
                out.push_str(&format!(
                    "  #{:02} {} - {} [{}] {}{}\n",
                    plan.index,
                    plan.start,
                    plan.end(),
                    plan.ratio,
                    crop,
                    clamped
                ));
            }
            for rejection in &response.rejected {
                out.push_str(&format!("  #{:02} rejected: {}\n", rejection.index, rejection.reason));
            }
        }
        Some(report) => {
            out.push_str(&render_report_text(report));
            if let Some(archive) = &response.archive {
                out.push_str(&format!("Archive: {}\n", archive.display()));
            }
        }
    }
    out
}

fn render_report_text(report: &ProcessingReport) -> String {
    let mut out = format!(
        "{} of {} segment(s) succeeded\n",
        report.successes.len(),
        report.total()
    );
    for success in &report.successes {
        let size = std::fs::metadata(&success.output)
            .map(|m| format_file_size(m.len()))
            .unwrap_or_else(|_| "?".to_string());
        out.push_str(&format!(
            "  #{:02} ok     {} ({})\n",
            success.index,
            success.output.display(),
            size
        ));
    }
    for failure in &report.failures {
        out.push_str(&format!("  #{:02} failed {}\n", failure.index, failure.reason));
    }
    out
}
