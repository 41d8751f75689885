use crate::models::{CoverageFraction, StationSeriesMap, YearSeries};
use crate::utils::calendar::year_length;
use std::collections::BTreeSet;

/// Present days over calendar days for `[start_year, end_year]`. Years with no
/// entry in `series` still count every calendar day in the denominator.
pub fn coverage_fraction(
    series: &StationSeriesMap,
    start_year: i32,
    end_year: i32,
) -> CoverageFraction {
    let mut present_days = 0u64;
    let mut calendar_days = 0u64;

    for year in start_year..=end_year {
        calendar_days += year_length(year) as u64;
        if let Some(year_series) = series.get(year) {
            present_days += year_series.present_count() as u64;
        }
    }

    CoverageFraction::new(present_days, calendar_days)
}

/// Longest run of consecutive missing slots within one year.
pub fn longest_missing_run(year_series: &YearSeries) -> usize {
    let mut longest = 0;
    let mut current = 0;

    for slot in year_series.values() {
        if slot.is_none() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

/// Years present in `series` whose longest missing run is at most `max_run`.
pub fn good_years(series: &StationSeriesMap, max_run: usize) -> BTreeSet<i32> {
    series
        .iter()
        .filter(|year_series| longest_missing_run(year_series) <= max_run)
        .map(|year_series| year_series.year())
        .collect()
}

/// Years that are good in every set. No sets means no usable years.
pub fn intersect_year_sets<'a, I>(sets: I) -> BTreeSet<i32>
where
    I: IntoIterator<Item = &'a BTreeSet<i32>>,
{
    let mut sets = sets.into_iter();
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };

    sets.fold(first.clone(), |acc, set| {
        acc.intersection(set).copied().collect()
    })
}

/// Completeness thresholds applied per station and variable.
#[derive(Debug, Clone, Copy)]
pub struct CompletenessAnalyzer {
    min_coverage: f64,
    max_missing_run: usize,
}

/// Completeness of one variable's record over the target period.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableCompleteness {
    pub coverage: CoverageFraction,
    pub good_years: BTreeSet<i32>,
}

impl CompletenessAnalyzer {
    pub fn new(min_coverage: f64, max_missing_run: usize) -> Self {
        Self {
            min_coverage,
            max_missing_run,
        }
    }

    pub fn min_coverage(&self) -> f64 {
        self.min_coverage
    }

    pub fn max_missing_run(&self) -> usize {
        self.max_missing_run
    }

    pub fn analyze(
        &self,
        series: &StationSeriesMap,
        start_year: i32,
        end_year: i32,
    ) -> VariableCompleteness {
        VariableCompleteness {
            coverage: coverage_fraction(series, start_year, end_year),
            good_years: good_years(series, self.max_missing_run),
        }
    }

    pub fn meets_coverage(&self, completeness: &VariableCompleteness) -> bool {
        completeness.coverage.meets(self.min_coverage)
    }
}
