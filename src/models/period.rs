use crate::models::{StationId, Variable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Calendar span with any recorded data for one station and variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodOfRecord {
    pub station_id: StationId,
    pub variable: Variable,
    pub first_year: i32,
    pub last_year: i32,
    /// Opaque upstream status code, passed through untouched.
    pub state: Option<i64>,
}

impl PeriodOfRecord {
    pub fn covers(&self, start_year: i32, end_year: i32) -> bool {
        self.first_year <= start_year && self.last_year >= end_year
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeriodOfRecordIndex {
    entries: HashMap<(StationId, Variable), PeriodOfRecord>,
}

impl PeriodOfRecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, period: PeriodOfRecord) {
        self.entries
            .insert((period.station_id.clone(), period.variable), period);
    }

    pub fn get(&self, station_id: &StationId, variable: Variable) -> Option<&PeriodOfRecord> {
        self.entries.get(&(station_id.clone(), variable))
    }

    /// True when the station has a recorded period for `variable` spanning
    /// `[start_year, end_year]`.
    pub fn covers(
        &self,
        station_id: &StationId,
        variable: Variable,
        start_year: i32,
        end_year: i32,
    ) -> bool {
        self.get(station_id, variable)
            .is_some_and(|p| p.covers(start_year, end_year))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PeriodOfRecord> for PeriodOfRecordIndex {
    fn from_iter<T: IntoIterator<Item = PeriodOfRecord>>(iter: T) -> Self {
        let mut index = Self::new();
        for period in iter {
            index.insert(period);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(id: &str, variable: Variable, first: i32, last: i32) -> PeriodOfRecord {
        PeriodOfRecord {
            station_id: StationId::new(id),
            variable,
            first_year: first,
            last_year: last,
            state: None,
        }
    }

    #[test]
    fn test_index_covers() {
        let index: PeriodOfRecordIndex = vec![
            period("USC00000001", Variable::MaxTemperature, 1900, 2015),
            period("USC00000001", Variable::MinTemperature, 1960, 2015),
        ]
        .into_iter()
        .collect();

        let id = StationId::new("USC00000001");
        assert!(index.covers(&id, Variable::MaxTemperature, 1950, 2010));
        assert!(!index.covers(&id, Variable::MinTemperature, 1950, 2010));
        assert!(!index.covers(&StationId::new("USC00000002"), Variable::MaxTemperature, 1950, 2010));
        assert_eq!(index.len(), 2);
    }
}
