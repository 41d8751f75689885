pub mod period;
pub mod series;
pub mod station;
pub mod trend;
pub mod variable;

pub use period::{PeriodOfRecord, PeriodOfRecordIndex};
pub use series::{DailyObservation, StationSeriesMap, YearSeries};
pub use station::{StationId, StationMetadata};
pub use trend::{AnnualMean, CoverageFraction, CoverageRow, StationTrends, TrendResult, VariableTrend};
pub use variable::Variable;
