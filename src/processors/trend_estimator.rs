use crate::error::{ProcessingError, Result};
use crate::models::{AnnualMean, StationSeriesMap, TrendResult, YearSeries};
use std::collections::{BTreeSet, HashSet};

/// Mean of the present slots, or `None` when every day is missing.
pub fn annual_mean(year_series: &YearSeries) -> Option<f64> {
    let (sum, count) = year_series
        .present()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

/// Tenths of a degree Celsius to degrees Fahrenheit.
pub fn unit_convert(raw: f64) -> f64 {
    (raw / 10.0) * 9.0 / 5.0 + 32.0
}

/// Ordinary least squares of value against year.
pub fn fit_trend(points: &[AnnualMean]) -> Result<TrendResult> {
    let distinct_years: HashSet<i32> = points.iter().map(|p| p.year).collect();
    if distinct_years.len() < 2 {
        return Err(ProcessingError::InsufficientData(format!(
            "trend fit needs at least 2 distinct years, got {}",
            distinct_years.len()
        )));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.year as f64).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), p| {
        let dx = p.year as f64 - mean_x;
        (sxy + dx * (p.value - mean_y), sxx + dx * dx)
    });

    let slope = sxy / sxx;
    Ok(TrendResult {
        intercept: mean_y - slope * mean_x,
        slope,
    })
}

/// Annual means and their trend for one station/variable.
pub struct TrendEstimator {
    to_fahrenheit: bool,
}

impl TrendEstimator {
    pub fn new() -> Self {
        Self {
            to_fahrenheit: true,
        }
    }

    /// Keep annual means in raw tenths of a degree Celsius.
    pub fn with_raw_units() -> Self {
        Self {
            to_fahrenheit: false,
        }
    }

    /// Annual means for the requested years, skipping years that are absent
    /// or have no present days.
    pub fn annual_series(&self, series: &StationSeriesMap, years: &BTreeSet<i32>) -> Vec<AnnualMean> {
        years
            .iter()
            .filter_map(|&year| {
                let mean = annual_mean(series.get(year)?)?;
                let value = if self.to_fahrenheit {
                    unit_convert(mean)
                } else {
                    mean
                };
                Some(AnnualMean::new(year, value))
            })
            .collect()
    }

    pub fn estimate(
        &self,
        series: &StationSeriesMap,
        years: &BTreeSet<i32>,
    ) -> Result<(Vec<AnnualMean>, TrendResult)> {
        let annual = self.annual_series(series, years);
        let trend = fit_trend(&annual)?;
        Ok((annual, trend))
    }
}

impl Default for TrendEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyObservation;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_unit_convert() {
        assert_eq!(unit_convert(200.0), 68.0);
        assert_eq!(unit_convert(0.0), 32.0);
        assert_eq!(unit_convert(-400.0), -40.0);
    }

    #[test]
    fn test_annual_mean_ignores_missing_days() {
        let series = StationSeriesMap::from_observations(vec![
            DailyObservation::parse("19500101", "100").unwrap(),
            DailyObservation::parse("19500102", "200").unwrap(),
            DailyObservation::parse("19501231", "300").unwrap(),
        ])
        .unwrap();

        assert_eq!(annual_mean(series.get(1950).unwrap()), Some(200.0));
        assert_eq!(annual_mean(&YearSeries::missing(1950)), None);
    }

    #[test]
    fn test_fit_recovers_linear_trend() {
        let (slope, intercept) = (0.037, -12.5);
        let points: Vec<AnnualMean> = (1950..=2010)
            .map(|y| AnnualMean::new(y, slope * y as f64 + intercept))
            .collect();

        let trend = fit_trend(&points).unwrap();
        assert_close(trend.slope, slope);
        assert_close(trend.intercept, intercept);
    }

    #[test]
    fn test_fit_two_points() {
        let trend = fit_trend(&[AnnualMean::new(2000, 50.0), AnnualMean::new(2010, 51.0)]).unwrap();
        assert_close(trend.slope, 0.1);
        assert_close(trend.predict(2005), 50.5);
    }

    #[test]
    fn test_fit_needs_two_distinct_years() {
        assert!(matches!(
            fit_trend(&[]),
            Err(ProcessingError::InsufficientData(_))
        ));
        assert!(matches!(
            fit_trend(&[AnnualMean::new(2000, 1.0)]),
            Err(ProcessingError::InsufficientData(_))
        ));
        assert!(matches!(
            fit_trend(&[AnnualMean::new(2000, 1.0), AnnualMean::new(2000, 2.0)]),
            Err(ProcessingError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_estimator_skips_absent_and_empty_years() {
        let series = StationSeriesMap::from_observations(vec![
            DailyObservation::parse("19500601", "200").unwrap(),
            DailyObservation::parse("19510601", "210").unwrap(),
            DailyObservation::parse("19530601", "230").unwrap(),
        ])
        .unwrap();
        let years = BTreeSet::from([1950, 1951, 1952, 1953]);

        let (annual, trend) = TrendEstimator::new().estimate(&series, &years).unwrap();
        assert_eq!(
            annual.iter().map(|a| a.year).collect::<Vec<_>>(),
            vec![1950, 1951, 1953]
        );
        assert_eq!(annual[0].value, 68.0);
        assert!(trend.slope > 0.0);

        let raw = TrendEstimator::with_raw_units().annual_series(&series, &years);
        assert_eq!(raw[2].value, 230.0);
    }
}
