pub mod completeness;
pub mod series_synthesizer;
pub mod station_selector;
pub mod trend_estimator;

pub use completeness::{CompletenessAnalyzer, VariableCompleteness};
pub use series_synthesizer::SeriesSynthesizer;
pub use station_selector::{
    DatasetContext, RejectionReason, Selection, SelectionOutcome, StationFailure,
    StationSelector,
};
pub use trend_estimator::TrendEstimator;
