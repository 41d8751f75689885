use crate::config::PipelineConfig;
use crate::error::{ErrorKind, ProcessingError, Result};
use crate::models::{
    CoverageFraction, CoverageRow, PeriodOfRecordIndex, StationId, StationMetadata,
    StationSeriesMap, StationTrends, Variable, VariableTrend,
};
use crate::processors::completeness::intersect_year_sets;
use crate::processors::{CompletenessAnalyzer, SeriesSynthesizer, TrendEstimator};
use crate::readers::SeriesStore;
use crate::utils::constants::{DEFAULT_MAX_MISSING_RUN, DEFAULT_MIN_COVERAGE};
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, info, warn};

/// Everything the selector reads: station metadata, the optional
/// period-of-record inventory and the observation store. Built once, shared
/// read-only by every worker.
pub struct DatasetContext {
    stations: HashMap<StationId, StationMetadata>,
    inventory: Option<PeriodOfRecordIndex>,
    store: SeriesStore,
}

impl DatasetContext {
    pub fn new(stations: HashMap<StationId, StationMetadata>, store: SeriesStore) -> Self {
        Self {
            stations,
            inventory: None,
            store,
        }
    }

    pub fn with_inventory(mut self, inventory: PeriodOfRecordIndex) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn station(&self, station_id: &StationId) -> Option<&StationMetadata> {
        self.stations.get(station_id)
    }

    pub fn stations(&self) -> &HashMap<StationId, StationMetadata> {
        &self.stations
    }

    pub fn inventory(&self) -> Option<&PeriodOfRecordIndex> {
        self.inventory.as_ref()
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }

    /// Station ids in sorted order.
    pub fn station_ids(&self) -> Vec<StationId> {
        let mut ids: Vec<StationId> = self.stations.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Why a station was filtered out without an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    PeriodOfRecord {
        variable: Variable,
    },
    LowCoverage {
        variable: Variable,
        coverage: CoverageFraction,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::PeriodOfRecord { variable } => {
                write!(f, "{} period of record does not span the target period", variable)
            }
            RejectionReason::LowCoverage { variable, coverage } => write!(
                f,
                "{} coverage {:.3} ({}/{} days)",
                variable,
                coverage.value(),
                coverage.present_days,
                coverage.calendar_days
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Accepted(StationTrends),
    Rejected(RejectionReason),
}

/// A station dropped because processing it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationFailure {
    pub station_id: StationId,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct SelectionOutcome {
    pub stations: BTreeMap<StationId, StationTrends>,
    pub rejected: BTreeMap<StationId, RejectionReason>,
    pub failed: Vec<StationFailure>,
}

impl SelectionOutcome {
    pub fn total(&self) -> usize {
        self.stations.len() + self.rejected.len() + self.failed.len()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Station Selection Summary\n");
        summary.push_str("=========================\n");
        summary.push_str(&format!("Stations considered: {}\n", self.total()));
        summary.push_str(&format!("Accepted: {}\n", self.stations.len()));
        summary.push_str(&format!("Rejected: {}\n", self.rejected.len()));
        summary.push_str(&format!("Failed: {}\n", self.failed.len()));

        if !self.rejected.is_empty() {
            let mut period = 0;
            let mut coverage = 0;
            for reason in self.rejected.values() {
                match reason {
                    RejectionReason::PeriodOfRecord { .. } => period += 1,
                    RejectionReason::LowCoverage { .. } => coverage += 1,
                }
            }
            summary.push_str("\nRejections:\n");
            summary.push_str(&format!("  Period of record: {}\n", period));
            summary.push_str(&format!("  Low coverage: {}\n", coverage));
        }

        if !self.failed.is_empty() {
            summary.push_str("\nFailures:\n");
            for failure in self.failed.iter().take(10) {
                summary.push_str(&format!(
                    "  {} [{}]: {}\n",
                    failure.station_id, failure.kind, failure.message
                ));
            }
            if self.failed.len() > 10 {
                summary.push_str(&format!("  ... and {} more\n", self.failed.len() - 10));
            }
        }

        summary
    }
}

/// Picks stations with long, well-covered records over a target period and
/// builds their annual series and trends.
pub struct StationSelector {
    start_year: i32,
    end_year: i32,
    variables: Vec<Variable>,
    outputs: Vec<Variable>,
    analyzer: CompletenessAnalyzer,
    synthesizer: SeriesSynthesizer,
    estimator: TrendEstimator,
    max_workers: usize,
    strict_format: bool,
}

impl StationSelector {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
            variables: vec![Variable::MaxTemperature, Variable::MinTemperature],
            outputs: vec![
                Variable::MaxTemperature,
                Variable::MinTemperature,
                Variable::MeanTemperature,
            ],
            analyzer: CompletenessAnalyzer::new(DEFAULT_MIN_COVERAGE, DEFAULT_MAX_MISSING_RUN),
            synthesizer: SeriesSynthesizer::new(),
            estimator: TrendEstimator::new(),
            max_workers: num_cpus::get(),
            strict_format: false,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.start_year, config.end_year)
            .with_thresholds(config.min_coverage, config.max_missing_run)
            .with_variables(config.variables.clone(), config.derive_mean)
            .with_max_workers(config.max_workers)
    }

    pub fn with_thresholds(mut self, min_coverage: f64, max_missing_run: usize) -> Self {
        self.analyzer = CompletenessAnalyzer::new(min_coverage, max_missing_run);
        self
    }

    /// Observed variables that must all pass; TAVG is appended to the
    /// outputs when `derive_mean` is set.
    pub fn with_variables(mut self, mut variables: Vec<Variable>, derive_mean: bool) -> Self {
        variables.sort();
        variables.dedup();
        let mut outputs = variables.clone();
        if derive_mean {
            outputs.push(Variable::MeanTemperature);
        }
        self.variables = variables;
        self.outputs = outputs;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_estimator(mut self, estimator: TrendEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Abort the whole batch on the first malformed input instead of
    /// excluding the station.
    pub fn with_strict_format(mut self, strict_format: bool) -> Self {
        self.strict_format = strict_format;
        self
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn output_variables(&self) -> &[Variable] {
        &self.outputs
    }

    /// Cheap metadata filter. Without an inventory every station passes.
    pub fn check_period_of_record(
        &self,
        inventory: Option<&PeriodOfRecordIndex>,
        station_id: &StationId,
    ) -> Option<RejectionReason> {
        let inventory = inventory?;
        self.variables
            .iter()
            .find(|&&variable| {
                !inventory.covers(station_id, variable, self.start_year, self.end_year)
            })
            .map(|&variable| RejectionReason::PeriodOfRecord { variable })
    }

    pub fn load_series(
        &self,
        store: &SeriesStore,
        station_id: &StationId,
    ) -> Result<BTreeMap<Variable, StationSeriesMap>> {
        self.variables
            .iter()
            .map(|&variable| Ok((variable, store.load(station_id, variable)?)))
            .collect()
    }

    /// Coverage filter, usable years and trends for one station's loaded
    /// series. Pure: depends only on its arguments.
    pub fn evaluate(
        &self,
        station_id: &StationId,
        raw: &BTreeMap<Variable, StationSeriesMap>,
    ) -> Result<Selection> {
        let mut good_year_sets = Vec::with_capacity(self.variables.len());

        for &variable in &self.variables {
            let series = raw.get(&variable).ok_or_else(|| {
                ProcessingError::Config(format!("{} series not loaded for {}", variable, station_id))
            })?;

            if !series
                .years()
                .any(|year| (self.start_year..=self.end_year).contains(&year))
            {
                return Err(ProcessingError::InsufficientData(format!(
                    "{} record for {} lies wholly outside {}-{}",
                    variable, station_id, self.start_year, self.end_year
                )));
            }

            let completeness = self.analyzer.analyze(series, self.start_year, self.end_year);
            if !self.analyzer.meets_coverage(&completeness) {
                return Ok(Selection::Rejected(RejectionReason::LowCoverage {
                    variable,
                    coverage: completeness.coverage,
                }));
            }
            good_year_sets.push(completeness.good_years);
        }

        let usable: BTreeSet<i32> = intersect_year_sets(&good_year_sets)
            .into_iter()
            .filter(|year| (self.start_year..=self.end_year).contains(year))
            .collect();

        let mut variables = BTreeMap::new();
        for &variable in &self.outputs {
            let derived;
            let series = if variable.is_derived() {
                derived = self.synthesizer.synthesize(variable, raw)?;
                &derived
            } else {
                raw.get(&variable).ok_or_else(|| {
                    ProcessingError::Config(format!(
                        "{} series not loaded for {}",
                        variable, station_id
                    ))
                })?
            };

            let (series, trend) = self.estimator.estimate(series, &usable).map_err(|e| match e {
                ProcessingError::InsufficientData(msg) => ProcessingError::InsufficientData(
                    format!("{} {}: {}", station_id, variable, msg),
                ),
                other => other,
            })?;
            variables.insert(variable, VariableTrend { series, trend });
        }

        Ok(Selection::Accepted(StationTrends {
            station_id: station_id.clone(),
            usable_years: usable.into_iter().collect(),
            variables,
        }))
    }

    pub fn process_station(&self, ctx: &DatasetContext, station_id: &StationId) -> Result<Selection> {
        if let Some(reason) = self.check_period_of_record(ctx.inventory(), station_id) {
            return Ok(Selection::Rejected(reason));
        }

        let raw = self.load_series(ctx.store(), station_id)?;
        self.evaluate(station_id, &raw)
    }

    /// Run the selection over every station in `ctx` on a bounded worker
    /// pool. A failing station is recorded and skipped; in strict mode a
    /// malformed file stops the pool and fails the batch.
    pub fn select(
        &self,
        ctx: &DatasetContext,
        progress: Option<&ProgressReporter>,
    ) -> Result<SelectionOutcome> {
        let station_ids = ctx.station_ids();
        info!(
            stations = station_ids.len(),
            start_year = self.start_year,
            end_year = self.end_year,
            workers = self.max_workers,
            "selecting stations"
        );

        let results = self.run_parallel(&station_ids, progress, |station_id| {
            self.process_station(ctx, station_id)
        })?;

        let mut outcome = SelectionOutcome::default();
        for (station_id, result) in results {
            match result {
                Ok(Selection::Accepted(trends)) => {
                    outcome.stations.insert(station_id, trends);
                }
                Ok(Selection::Rejected(reason)) => {
                    debug!(%station_id, %reason, "station rejected");
                    outcome.rejected.insert(station_id, reason);
                }
                Err(e) => {
                    warn!(%station_id, kind = %e.kind(), error = %e, "station excluded");
                    outcome.failed.push(StationFailure {
                        station_id,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!(
                "Selected {} of {} stations",
                outcome.stations.len(),
                station_ids.len()
            ));
        }
        info!(
            accepted = outcome.stations.len(),
            rejected = outcome.rejected.len(),
            failed = outcome.failed.len(),
            "selection complete"
        );

        Ok(outcome)
    }

    /// Coverage of each required variable over the target period for every
    /// station. Stations whose files cannot be loaded are returned as failures.
    pub fn coverage_table(
        &self,
        ctx: &DatasetContext,
        progress: Option<&ProgressReporter>,
    ) -> Result<(Vec<CoverageRow>, Vec<StationFailure>)> {
        let station_ids = ctx.station_ids();

        let results = self.run_parallel(&station_ids, progress, |station_id| {
            let raw = self.load_series(ctx.store(), station_id)?;
            Ok(raw
                .iter()
                .map(|(&variable, series)| {
                    let completeness =
                        self.analyzer.analyze(series, self.start_year, self.end_year);
                    CoverageRow::new(station_id.clone(), variable, completeness.coverage)
                })
                .collect::<Vec<_>>())
        })?;

        let mut rows = Vec::new();
        let mut failed = Vec::new();
        for (station_id, result) in results {
            match result {
                Ok(station_rows) => rows.extend(station_rows),
                Err(e) => {
                    warn!(%station_id, kind = %e.kind(), error = %e, "coverage skipped");
                    failed.push(StationFailure {
                        station_id,
                        kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Computed coverage for {} stations", station_ids.len()));
        }

        Ok((rows, failed))
    }

    fn run_parallel<T, F>(
        &self,
        station_ids: &[StationId],
        progress: Option<&ProgressReporter>,
        f: F,
    ) -> Result<Vec<(StationId, Result<T>)>>
    where
        T: Send,
        F: Fn(&StationId) -> Result<T> + Sync + Send,
    {
        if let Some(p) = progress {
            p.set_length(station_ids.len() as u64);
            p.set_message(&format!("Processing {} stations...", station_ids.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        // Collecting into a Result stops scheduling stations after the first Err.
        pool.install(|| {
            station_ids
                .par_iter()
                .map(|station_id| {
                    let result = f(station_id);
                    if let Some(p) = progress {
                        p.increment(1);
                    }
                    match result {
                        Err(e) if self.is_fatal(&e) => {
                            Err(ProcessingError::Format(format!("{}: {}", station_id, e)))
                        }
                        result => Ok((station_id.clone(), result)),
                    }
                })
                .collect()
        })
    }

    fn is_fatal(&self, error: &ProcessingError) -> bool {
        self.strict_format && error.kind() == ErrorKind::Format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyObservation, PeriodOfRecord};
    use crate::utils::calendar::{date_from_index, year_length};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Full-year series where each day's value is `base + year offset`, minus
    /// the listed (year, day) gaps.
    fn series(years: std::ops::RangeInclusive<i32>, base: i32, gaps: &[(i32, usize)]) -> StationSeriesMap {
        let mut observations = Vec::new();
        for year in years {
            for day in 0..year_length(year) {
                if !gaps.contains(&(year, day)) {
                    let date = date_from_index(year, day).unwrap();
                    observations.push(DailyObservation::new(date, base + (year - 1950)));
                }
            }
        }
        StationSeriesMap::from_observations(observations).unwrap()
    }

    fn raw(tmax: StationSeriesMap, tmin: StationSeriesMap) -> BTreeMap<Variable, StationSeriesMap> {
        BTreeMap::from([
            (Variable::MaxTemperature, tmax),
            (Variable::MinTemperature, tmin),
        ])
    }

    fn write_csv(dir: &Path, station: &str, element: &str, years: std::ops::RangeInclusive<i32>) {
        let mut contents = String::new();
        for year in years {
            for day in 0..year_length(year) {
                let date = date_from_index(year, day).unwrap();
                contents.push_str(&format!("{},{}\n", date.format("%Y%m%d"), 150));
            }
        }
        fs::write(dir.join(format!("{}_{}.csv", station, element)), contents).unwrap();
    }

    fn context(dir: &Path, ids: &[&str]) -> DatasetContext {
        let stations = ids
            .iter()
            .map(|id| {
                let id = StationId::from(*id);
                (id.clone(), StationMetadata::new(id, "TEST".to_string(), 40.0, -100.0))
            })
            .collect();
        DatasetContext::new(stations, SeriesStore::new(dir))
    }

    #[test]
    fn test_evaluate_accepts_complete_station() {
        let selector = StationSelector::new(1950, 1959);
        let id = StationId::from("USC00000001");
        let raw = raw(series(1950..=1959, 200, &[]), series(1950..=1959, 100, &[]));

        let Selection::Accepted(trends) = selector.evaluate(&id, &raw).unwrap() else {
            panic!("station should be accepted");
        };

        assert_eq!(trends.usable_years, (1950..=1959).collect::<Vec<_>>());
        assert_eq!(trends.variables.len(), 3);

        let tavg = &trends.variables[&Variable::MeanTemperature];
        assert_eq!(tavg.series[0].value, 59.0);
        // one tenth of a degree Celsius per year
        assert!((tavg.trend.slope - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_from_config_orders_variables() {
        let config = PipelineConfig {
            variables: vec![
                Variable::MinTemperature,
                Variable::MaxTemperature,
                Variable::MinTemperature,
            ],
            ..PipelineConfig::default()
        };
        let selector = StationSelector::from_config(&config);
        assert_eq!(
            selector.variables(),
            &[Variable::MaxTemperature, Variable::MinTemperature]
        );
        assert_eq!(
            selector.output_variables(),
            &[
                Variable::MaxTemperature,
                Variable::MinTemperature,
                Variable::MeanTemperature
            ]
        );

        let observed_only = StationSelector::from_config(&PipelineConfig {
            variables: vec![Variable::MaxTemperature],
            derive_mean: false,
            ..PipelineConfig::default()
        });
        assert_eq!(observed_only.output_variables(), &[Variable::MaxTemperature]);
    }

    #[test]
    fn test_usable_years_intersect_good_years() {
        let selector = StationSelector::new(1950, 1959);
        let id = StationId::from("USC00000002");
        let tmax_gaps: Vec<(i32, usize)> = (10..20).map(|d| (1951, d)).collect();
        let tmin_gaps: Vec<(i32, usize)> = (100..110).map(|d| (1955, d)).collect();
        let raw = raw(
            series(1950..=1959, 200, &tmax_gaps),
            series(1950..=1959, 100, &tmin_gaps),
        );

        let Selection::Accepted(trends) = selector.evaluate(&id, &raw).unwrap() else {
            panic!("station should be accepted");
        };
        assert!(!trends.usable_years.contains(&1951));
        assert!(!trends.usable_years.contains(&1955));
        assert_eq!(trends.usable_years.len(), 8);
        for variable in trends.variables.values() {
            assert_eq!(variable.series.len(), 8);
        }
    }

    #[test]
    fn test_low_coverage_is_rejected() {
        let selector = StationSelector::new(1950, 1969);
        let id = StationId::from("USC00000003");
        let raw = raw(series(1950..=1969, 200, &[]), series(1960..=1969, 100, &[]));

        match selector.evaluate(&id, &raw).unwrap() {
            Selection::Rejected(RejectionReason::LowCoverage { variable, coverage }) => {
                assert_eq!(variable, Variable::MinTemperature);
                assert!(coverage.value() < 0.9);
            }
            other => panic!("unexpected selection {:?}", other),
        }
    }

    #[test]
    fn test_record_outside_period_is_insufficient() {
        let selector = StationSelector::new(1950, 1959);
        let id = StationId::from("USC00000004");
        let raw = raw(series(1970..=1975, 200, &[]), series(1970..=1975, 100, &[]));

        let err = selector.evaluate(&id, &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn test_single_usable_year_is_insufficient() {
        let selector = StationSelector::new(1950, 1951).with_thresholds(0.4, 7);
        let id = StationId::from("USC00000005");
        let gaps: Vec<(i32, usize)> = (0..30).map(|d| (1951, d)).collect();
        let raw = raw(series(1950..=1951, 200, &gaps), series(1950..=1951, 100, &[]));

        let err = selector.evaluate(&id, &raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(err.to_string().contains("USC00000005"));
    }

    #[test]
    fn test_period_of_record_filter() {
        let selector = StationSelector::new(1950, 2010);
        let id = StationId::from("USC00000006");
        assert_eq!(selector.check_period_of_record(None, &id), None);

        let inventory: PeriodOfRecordIndex = [
            PeriodOfRecord {
                station_id: id.clone(),
                variable: Variable::MaxTemperature,
                first_year: 1940,
                last_year: 2015,
                state: None,
            },
            PeriodOfRecord {
                station_id: id.clone(),
                variable: Variable::MinTemperature,
                first_year: 1955,
                last_year: 2015,
                state: Some(3),
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(
            selector.check_period_of_record(Some(&inventory), &id),
            Some(RejectionReason::PeriodOfRecord {
                variable: Variable::MinTemperature
            })
        );
    }

    #[test]
    fn test_select_isolates_failures() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "USC00000010", "TMAX", 1950..=1955);
        write_csv(dir.path(), "USC00000010", "TMIN", 1950..=1955);
        write_csv(dir.path(), "USC00000011", "TMAX", 1950..=1955);
        fs::write(dir.path().join("USC00000012_TMAX.csv"), "19500101,abc\n").unwrap();
        write_csv(dir.path(), "USC00000012", "TMIN", 1950..=1955);

        let ctx = context(dir.path(), &["USC00000010", "USC00000011", "USC00000012"]);
        let selector = StationSelector::new(1950, 1955).with_max_workers(2);
        let outcome = selector.select(&ctx, None).unwrap();

        assert_eq!(outcome.stations.len(), 1);
        assert!(outcome.stations.contains_key(&StationId::from("USC00000010")));
        assert_eq!(outcome.failed.len(), 2);

        let kinds: BTreeMap<String, ErrorKind> = outcome
            .failed
            .iter()
            .map(|f| (f.station_id.to_string(), f.kind))
            .collect();
        assert_eq!(kinds["USC00000011"], ErrorKind::MissingFile);
        assert_eq!(kinds["USC00000012"], ErrorKind::Format);
        assert!(outcome.summary().contains("Failed: 2"));

        let strict = StationSelector::new(1950, 1955).with_strict_format(true);
        assert!(matches!(
            strict.select(&ctx, None),
            Err(ProcessingError::Format(_))
        ));
    }

    #[test]
    fn test_strict_mode_stops_at_first_malformed_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("USC00000030_TMAX.csv"), "19500101,abc
").unwrap();
        write_csv(dir.path(), "USC00000030", "TMIN", 1950..=1955);

        let mut ids = vec!["USC00000030".to_string()];
        for n in 31..=45 {
            let id = format!("USC000000{}", n);
            write_csv(dir.path(), &id, "TMAX", 1950..=1955);
            write_csv(dir.path(), &id, "TMIN", 1950..=1955);
            ids.push(id);
        }
        let id_refs: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        let ctx = context(dir.path(), &id_refs);

        let progress = ProgressReporter::hidden();
        let strict = StationSelector::new(1950, 1955)
            .with_max_workers(1)
            .with_strict_format(true);
        let result = strict.select(&ctx, Some(&progress));

        match result {
            Err(ProcessingError::Format(message)) => assert!(message.starts_with("USC00000030")),
            other => panic!("expected a format error, got {:?}", other.map(|o| o.total())),
        }
        assert!(progress.position() < ids.len() as u64);
    }

    #[test]
    fn test_coverage_table_rows() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "USC00000020", "TMAX", 1950..=1959);
        write_csv(dir.path(), "USC00000020", "TMIN", 1955..=1959);

        let ctx = context(dir.path(), &["USC00000020", "USC00000021"]);
        let selector = StationSelector::new(1950, 1959).with_max_workers(1);
        let (rows, failed) = selector.coverage_table(&ctx, None).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].variable, Variable::MaxTemperature);
        assert_eq!(rows[0].fraction, 1.0);
        assert_eq!(rows[1].variable, Variable::MinTemperature);
        assert_eq!(rows[1].calendar_days, 3652);
        assert_eq!(rows[1].present_days, 1826);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].kind, ErrorKind::MissingFile);
    }
}
