// Result aggregator - Builds the session report and the download archive

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, Cursor};

use chrono::Utc;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::model::*;
use crate::error::{SplitXError, SplitXResult};

pub struct ResultAggregator;

impl ResultAggregator {
    /// Partition outcomes into successes and failures.
    ///
    /// Outcomes are ordered by plan index first, so the report does not depend
    /// on the order in which segments finished.
    pub fn aggregate(mut outcomes: Vec<SegmentOutcome>) -> ProcessingReport {
        outcomes.sort_by_key(SegmentOutcome::index);

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                SegmentOutcome::Success(success) => successes.push(success),
                SegmentOutcome::Failure(failure) => failures.push(failure),
            }
        }

        info!(
            succeeded = successes.len(),
            failed = failures.len(),
            "Processing complete"
        );
        ProcessingReport {
            successes,
            failures,
            generated_at: Utc::now(),
        }
    }

    /// Pack each success's output under its base filename into a zip archive
    pub fn bundle(successes: &[SegmentSuccess]) -> SplitXResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut seen = BTreeSet::new();

        for success in successes {
            let name = success.file_name().ok_or_else(|| {
                SplitXError::IoError(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("output has no usable file name: {}", success.output.display()),
                ))
            })?;
            if !seen.insert(name.to_string()) {
                return Err(SplitXError::IoError(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("duplicate archive member: {}", name),
                )));
            }

            writer.start_file(name, options)?;
            let mut file = File::open(&success.output)?;
            io::copy(&mut file, &mut writer)?;
            debug!("Added {} to archive", name);
        }

        Ok(writer.finish()?.into_inner())
    }
}
