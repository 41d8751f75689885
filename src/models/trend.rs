use crate::models::{StationId, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Present days over calendar days for a closed year range, kept as an exact
/// ratio so persisted tables reload without rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageFraction {
    pub present_days: u64,
    pub calendar_days: u64,
}

impl CoverageFraction {
    pub fn new(present_days: u64, calendar_days: u64) -> Self {
        Self {
            present_days,
            calendar_days,
        }
    }

    /// Fraction in `[0, 1]`; an empty range has no coverage.
    pub fn value(&self) -> f64 {
        if self.calendar_days == 0 {
            0.0
        } else {
            self.present_days as f64 / self.calendar_days as f64
        }
    }

    pub fn meets(&self, threshold: f64) -> bool {
        self.value() >= threshold
    }
}

/// One line of the coverage table: a station/variable fraction over the
/// target period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRow {
    pub station_id: StationId,
    pub variable: Variable,
    pub present_days: u64,
    pub calendar_days: u64,
    pub fraction: f64,
}

impl CoverageRow {
    pub fn new(station_id: StationId, variable: Variable, coverage: CoverageFraction) -> Self {
        Self {
            station_id,
            variable,
            present_days: coverage.present_days,
            calendar_days: coverage.calendar_days,
            fraction: coverage.value(),
        }
    }

    pub fn coverage(&self) -> CoverageFraction {
        CoverageFraction::new(self.present_days, self.calendar_days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualMean {
    pub year: i32,
    pub value: f64,
}

impl AnnualMean {
    pub fn new(year: i32, value: f64) -> Self {
        Self { year, value }
    }
}

/// Least-squares line `value = intercept + slope * year`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendResult {
    pub fn predict(&self, year: i32) -> f64 {
        self.intercept + self.slope * year as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableTrend {
    pub series: Vec<AnnualMean>,
    pub trend: TrendResult,
}

/// Per-variable annual series and trend for one accepted station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationTrends {
    pub station_id: StationId,
    pub usable_years: Vec<i32>,
    pub variables: BTreeMap<Variable, VariableTrend>,
}

impl StationTrends {
    pub fn trend(&self, variable: Variable) -> Option<&TrendResult> {
        self.variables.get(&variable).map(|v| &v.trend)
    }
}
