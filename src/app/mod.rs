// Application layer - Use case interactors

pub mod container;
pub mod result_aggregator;
pub mod segment_extractor;
pub mod split_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use result_aggregator::ResultAggregator;
pub use segment_extractor::{ExtractionSettings, SegmentExtractor};
pub use split_interactor::{SessionSettings, SourceLocator, SplitInteractor, SplitRequest, SplitResponse};
