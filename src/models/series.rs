use crate::error::{ProcessingError, Result};
use crate::utils::calendar::{day_index, parse_date, year_length};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw daily value in tenths of a degree Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub value: i32,
}

impl DailyObservation {
    pub fn new(date: NaiveDate, value: i32) -> Self {
        Self { date, value }
    }

    /// Parse a `YYYYMMDD` date token and a signed integer value token.
    pub fn parse(date: &str, value: &str) -> Result<Self> {
        let date = parse_date(date)?;
        let value = value.trim().parse::<i32>().map_err(|_| {
            ProcessingError::Format(format!("Invalid observation value: '{}'", value.trim()))
        })?;
        Ok(Self { date, value })
    }
}

/// A single year of daily slots indexed by 0-based day of year.
/// `None` marks a missing day; the length always matches the calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    year: i32,
    values: Vec<Option<f64>>,
}

impl YearSeries {
    pub fn missing(year: i32) -> Self {
        Self {
            year,
            values: vec![None; year_length(year)],
        }
    }

    pub fn from_values(year: i32, values: Vec<Option<f64>>) -> Result<Self> {
        let expected = year_length(year);
        if values.len() != expected {
            return Err(ProcessingError::Format(format!(
                "Year {} needs {} daily slots, got {}",
                year,
                expected,
                values.len()
            )));
        }
        Ok(Self { year, values })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.len() - self.present_count()
    }

    /// Slot-wise combination with another series of the same year; a slot is
    /// present only when present on both sides.
    pub(crate) fn combine<F>(&self, other: &YearSeries, f: F) -> YearSeries
    where
        F: Fn(f64, f64) -> f64,
    {
        debug_assert_eq!(self.year, other.year);
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(x, y)| match (x, y) {
                (Some(x), Some(y)) => Some(f(*x, *y)),
                _ => None,
            })
            .collect();

        YearSeries {
            year: self.year,
            values,
        }
    }

    fn insert(&mut self, index: usize, value: f64) -> Result<()> {
        match self.values.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(value);
                Ok(())
            }
            Some(_) => Err(ProcessingError::Format(format!(
                "Duplicate observation for day {} of {}",
                index, self.year
            ))),
            None => Err(ProcessingError::Format(format!(
                "Day index {} outside year {}",
                index, self.year
            ))),
        }
    }
}

/// Year → daily series for one station and variable. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationSeriesMap {
    years: BTreeMap<i32, YearSeries>,
}

impl StationSeriesMap {
    /// Build from raw observations. Only years with at least one record get an
    /// entry; a repeated date aborts the whole build.
    pub fn from_observations<I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = DailyObservation>,
    {
        let mut years: BTreeMap<i32, YearSeries> = BTreeMap::new();

        for observation in observations {
            let year = observation.date.year();
            years
                .entry(year)
                .or_insert_with(|| YearSeries::missing(year))
                .insert(day_index(observation.date), observation.value as f64)
                .map_err(|_| {
                    ProcessingError::Format(format!(
                        "Duplicate observation for {}",
                        observation.date.format("%Y%m%d")
                    ))
                })?;
        }

        Ok(Self { years })
    }

    pub(crate) fn from_year_series<I>(series: I) -> Self
    where
        I: IntoIterator<Item = YearSeries>,
    {
        Self {
            years: series.into_iter().map(|s| (s.year(), s)).collect(),
        }
    }

    pub fn get(&self, year: i32) -> Option<&YearSeries> {
        self.years.get(&year)
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &YearSeries> {
        self.years.values()
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// First and last year with any record.
    pub fn span(&self) -> Option<(i32, i32)> {
        let first = self.years.keys().next()?;
        let last = self.years.keys().next_back()?;
        Some((*first, *last))
    }
}
