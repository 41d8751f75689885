use crate::error::{ProcessingError, Result};
use crate::models::{StationSeriesMap, Variable, YearSeries};
use std::collections::BTreeMap;

/// Pointwise mean of two series over the years both contain. A slot missing in
/// either input is missing in the result; years present in only one input are
/// dropped.
pub fn average_series(a: &StationSeriesMap, b: &StationSeriesMap) -> StationSeriesMap {
    let years = a.iter().filter_map(|a_year| {
        let b_year = b.get(a_year.year())?;
        Some(average_year(a_year, b_year))
    });

    StationSeriesMap::from_year_series(years)
}

fn average_year(a: &YearSeries, b: &YearSeries) -> YearSeries {
    a.combine(b, |x, y| (x + y) / 2.0)
}

/// Builds derived variables from the raw series already loaded for a station.
pub struct SeriesSynthesizer;

impl SeriesSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(
        &self,
        variable: Variable,
        raw: &BTreeMap<Variable, StationSeriesMap>,
    ) -> Result<StationSeriesMap> {
        match variable {
            Variable::MeanTemperature => {
                let tmax = Self::input(raw, Variable::MaxTemperature, variable)?;
                let tmin = Self::input(raw, Variable::MinTemperature, variable)?;
                Ok(average_series(tmax, tmin))
            }
            other => Err(ProcessingError::Config(format!(
                "{} is observed directly and cannot be synthesised",
                other
            ))),
        }
    }

    fn input(
        raw: &BTreeMap<Variable, StationSeriesMap>,
        input: Variable,
        derived: Variable,
    ) -> Result<&StationSeriesMap> {
        raw.get(&input).ok_or_else(|| {
            ProcessingError::Config(format!("{} requires {} to be loaded", derived, input))
        })
    }
}

impl Default for SeriesSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
