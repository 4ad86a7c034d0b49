// Domain rules - Crop geometry and segment planning policies

use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Aspect difference below which a recrop is considered a no-op
pub const DEFAULT_CROP_TOLERANCE: f64 = 0.01;

/// Business rules for turning a target ratio into a crop rectangle
pub struct CropCalculator;

impl CropCalculator {
    /// Compute the centered crop that gives `ratio` from a `dimensions` frame.
    ///
    /// Returns `None` for `Original` or when the target is within `tolerance`
    /// of the source aspect. All fields are rounded down to even values since
    /// common pixel formats reject odd crop sizes.
    pub fn compute_crop(
        dimensions: Dimensions,
        ratio: AspectRatio,
        tolerance: f64,
    ) -> Option<CropGeometry> {
        let target_aspect = ratio.value()?;
        let source_aspect = dimensions.aspect_ratio();

        if (target_aspect - source_aspect).abs() < tolerance {
            return None;
        }

        let (width, height, x, y) = if target_aspect > source_aspect {
            // Target is wider: keep full width, trim top and bottom
            let new_height = ((dimensions.width as f64 / target_aspect).floor() as u32)
                .min(dimensions.height);
            let y = (dimensions.height - new_height) / 2;
            (dimensions.width, new_height, 0, y)
        } else {
            let new_width = ((dimensions.height as f64 * target_aspect).floor() as u32)
                .min(dimensions.width);
            let x = (dimensions.width - new_width) / 2;
            (new_width, dimensions.height, x, 0)
        };

        Some(CropGeometry {
            width: round_down_even(width),
            height: round_down_even(height),
            x: round_down_even(x),
            y: round_down_even(y),
        })
    }
}

fn round_down_even(value: u32) -> u32 {
    value - (value % 2)
}

/// A request that failed validation, keeping its 1-based position
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRejection {
    pub index: usize,
    pub error: ValidationError,
}

/// One planner outcome per request
pub type PlanEntry = Result<SegmentPlan, SegmentRejection>;

/// Business rules for validating segment requests against a source
pub struct SegmentPlanner {
    crop_tolerance: f64,
}

impl Default for SegmentPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_CROP_TOLERANCE)
    }
}

impl SegmentPlanner {
    pub fn new(crop_tolerance: f64) -> Self {
        Self { crop_tolerance }
    }

    /// Validate every request in order. The output has exactly one entry per
    /// request; a rejected request never hides the ones after it.
    pub fn plan(&self, requests: &[SegmentRequest], source: &SourceMedia) -> Vec<PlanEntry> {
        requests
            .iter()
            .enumerate()
            .map(|(offset, request)| {
                let index = offset + 1;
                self.plan_one(index, request, source)
                    .map_err(|error| SegmentRejection { index, error })
            })
            .collect()
    }

    fn plan_one(
        &self,
        index: usize,
        request: &SegmentRequest,
        source: &SourceMedia,
    ) -> Result<SegmentPlan, ValidationError> {
        let start = TimeSpec::parse(&request.start).map_err(ValidationError::BadTimeFormat)?;
        let mut end = TimeSpec::parse(&request.end).map_err(ValidationError::BadTimeFormat)?;

        if start.seconds >= end.seconds {
            return Err(ValidationError::StartAfterEnd {
                start: start.seconds,
                end: end.seconds,
            });
        }

        let source_duration = source.duration.seconds;
        if start.seconds >= source_duration {
            return Err(ValidationError::StartBeyondSource {
                start: start.seconds,
                duration: source_duration,
            });
        }

        let end_clamped = end.seconds > source_duration;
        if end_clamped {
            warn!(
                segment = index,
                requested_end = end.seconds,
                source_duration,
                "End time exceeds source duration, clamping"
            );
            end = source.duration;
        }

        let duration = TimeSpec::from_seconds(end.seconds - start.seconds);
        let ratio = AspectRatio::parse(&request.ratio).map_err(ValidationError::BadRatioFormat)?;

        let crop = match (ratio.is_original(), source.dimensions) {
            (true, _) => CropSpec::Keep,
            (false, Some(dimensions)) => {
                match CropCalculator::compute_crop(dimensions, ratio, self.crop_tolerance) {
                    Some(geometry) => CropSpec::Resolved(geometry),
                    None => CropSpec::Keep,
                }
            }
            (false, None) => CropSpec::Unresolved,
        };

        debug!(
            segment = index,
            start = start.seconds,
            duration = duration.seconds,
            %ratio,
            "Planned segment"
        );

        Ok(SegmentPlan {
            index,
            start,
            duration,
            ratio,
            crop,
            end_clamped,
        })
    }
}
