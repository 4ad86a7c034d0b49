// Split interactor - Orchestrates one segment extraction session

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::adapters::fs_scratch::{persist_file, ScratchArea};
use crate::app::result_aggregator::ResultAggregator;
use crate::app::segment_extractor::{ExtractionSettings, SegmentExtractor};
use crate::domain::errors::ProbeError;
use crate::domain::model::*;
use crate::domain::rules::{PlanEntry, SegmentPlanner};
use crate::error::{SplitXError, SplitXResult};
use crate::ports::{FetchPort, ProbePort, TranscodePort};

/// Where the source media comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Url(String),
    LocalFile(PathBuf),
}

/// Session-wide knobs the interactor needs beyond the requests themselves
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub extraction: ExtractionSettings,
    pub max_parallel: usize,
    pub archive_name: String,
    /// Parent for the scratch area; system temp dir when `None`
    pub temp_root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub source: SourceLocator,
    pub segments: Vec<SegmentRequest>,
    /// Where finished segments and the archive are copied
    pub output_dir: PathBuf,
    /// Plan only, run no transcodes
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitResponse {
    pub source: SourceMedia,
    /// Plans that passed validation, in request order
    pub planned: Vec<SegmentPlan>,
    /// Requests rejected while planning, in request order
    pub rejected: Vec<SegmentFailure>,
    /// `None` for dry runs
    pub report: Option<ProcessingReport>,
    /// Written only when at least one segment succeeded
    pub archive: Option<PathBuf>,
}

/// Interactor for the split use case
pub struct SplitInteractor {
    fetch_port: Arc<dyn FetchPort>,
    probe_port: Arc<dyn ProbePort>,
    transcode_port: Arc<dyn TranscodePort>,
    settings: SessionSettings,
}

impl SplitInteractor {
    /// Create new split interactor with injected ports
    pub fn new(
        fetch_port: Arc<dyn FetchPort>,
        probe_port: Arc<dyn ProbePort>,
        transcode_port: Arc<dyn TranscodePort>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            fetch_port,
            probe_port,
            transcode_port,
            settings,
        }
    }

    /// Run a full session. Only source-level problems are returned as errors;
    /// per-segment problems end up in the report.
    pub async fn execute(&self, request: SplitRequest) -> SplitXResult<SplitResponse> {
        let scratch = ScratchArea::create(self.settings.temp_root.as_deref())?;
        let result = self.run_session(&scratch, request).await;

        if let Err(e) = scratch.close() {
            warn!("Scratch area cleanup failed: {}", e);
        }
        result
    }

    async fn run_session(
        &self,
        scratch: &ScratchArea,
        request: SplitRequest,
    ) -> SplitXResult<SplitResponse> {
        let source = self.acquire_source(scratch, &request.source).await?;
        info!(
            duration = %source.duration,
            dimensions = ?source.dimensions,
            "Source ready: {}",
            source.path.display()
        );

        let planner = SegmentPlanner::new(self.settings.extraction.crop_tolerance);
        let entries = planner.plan(&request.segments, &source);
        let mut planned = Vec::new();
        let mut rejected = Vec::new();
        for entry in &entries {
            match entry {
                Ok(plan) => planned.push(plan.clone()),
                Err(rejection) => rejected.push(SegmentFailure {
                    index: rejection.index,
                    reason: rejection.error.to_string(),
                }),
            }
        }

        if request.dry_run {
            info!("Dry run: {} of {} segments valid", planned.len(), entries.len());
            return Ok(SplitResponse {
                source,
                planned,
                rejected,
                report: None,
                archive: None,
            });
        }

        let mut extraction = self.settings.extraction.clone();
        extraction.output_dir = scratch.output_dir().to_path_buf();
        let extractor = SegmentExtractor::new(
            Arc::clone(&self.probe_port),
            Arc::clone(&self.transcode_port),
            extraction,
        );

        let outcomes = self.extract_all(&extractor, &source, entries).await;
        let report = ResultAggregator::aggregate(outcomes);
        let (report, archive) = self.publish(report, &request.output_dir)?;

        Ok(SplitResponse {
            source,
            planned,
            rejected,
            report: Some(report),
            archive,
        })
    }

    /// Fetch or locate the source, then probe it. Missing duration is fatal.
    async fn acquire_source(
        &self,
        scratch: &ScratchArea,
        locator: &SourceLocator,
    ) -> SplitXResult<SourceMedia> {
        let path = match locator {
            SourceLocator::Url(url) => self.fetch_port.fetch(url, scratch.source_dir()).await?,
            SourceLocator::LocalFile(path) => {
                if !path.is_file() {
                    return Err(SplitXError::InputFileNotFound {
                        path: path.display().to_string(),
                    });
                }
                path.clone()
            }
        };

        let metadata = self.probe_port.probe(&path).await?;
        if !metadata.duration.as_seconds().is_finite() {
            return Err(ProbeError::DurationUnavailable(path.display().to_string()).into());
        }
        Ok(SourceMedia::new(path, metadata.duration, metadata.dimensions))
    }

    /// Run every plan with bounded parallelism; rejections pass straight
    /// through as failures. Output order matches input order.
    async fn extract_all(
        &self,
        extractor: &SegmentExtractor,
        source: &SourceMedia,
        entries: Vec<PlanEntry>,
    ) -> Vec<SegmentOutcome> {
        let semaphore = Semaphore::new(self.settings.max_parallel.max(1));

        let tasks = entries.into_iter().map(|entry| {
            let semaphore = &semaphore;
            async move {
                let plan = match entry {
                    Ok(plan) => plan,
                    Err(rejection) => {
                        warn!(segment = rejection.index, "Segment rejected: {}", rejection.error);
                        return SegmentOutcome::failure(rejection.index, rejection.error.to_string());
                    }
                };

                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return SegmentOutcome::failure(plan.index, "extraction cancelled"),
                };
                extractor.extract(source, &plan).await
            }
        });

        join_all(tasks).await
    }

    /// Copy successes and the archive out of the scratch area, pointing the
    /// report at the copies.
    fn publish(
        &self,
        mut report: ProcessingReport,
        output_dir: &std::path::Path,
    ) -> SplitXResult<(ProcessingReport, Option<PathBuf>)> {
        if report.successes.is_empty() {
            debug!("No successful segments, skipping archive");
            return Ok((report, None));
        }

        std::fs::create_dir_all(output_dir)?;
        let archive_bytes = ResultAggregator::bundle(&report.successes)?;
        let archive_path = output_dir.join(&self.settings.archive_name);
        std::fs::write(&archive_path, archive_bytes)?;
        info!("Archive written to {}", archive_path.display());

        for success in &mut report.successes {
            success.output = persist_file(&success.output, output_dir)?;
        }

        Ok((report, Some(archive_path)))
    }
}
