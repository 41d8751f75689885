use crate::error::{ProcessingError, Result};
use crate::models::{DailyObservation, StationId, StationSeriesMap, Variable};
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, OBSERVATION_EXTENSION_GZ, OBSERVATION_EXTENSION_PLAIN,
};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads one station/variable daily file (`date,value` lines, optionally
/// gzip-compressed) into a year-indexed series.
pub struct ObservationReader {
    has_headers: bool,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self { has_headers: false }
    }

    pub fn with_headers(has_headers: bool) -> Self {
        Self { has_headers }
    }

    /// Path of the observation file for a station and variable, preferring the
    /// compressed form: `<dir>/<STATION>_<ELEMENT>.csv.gz`, then `.csv`.
    pub fn locate(data_dir: &Path, station_id: &StationId, variable: Variable) -> Result<PathBuf> {
        let stem = format!("{}_{}", station_id, variable.element_code());
        let compressed = data_dir.join(format!("{}.{}", stem, OBSERVATION_EXTENSION_GZ));
        if compressed.is_file() {
            return Ok(compressed);
        }

        let plain = data_dir.join(format!("{}.{}", stem, OBSERVATION_EXTENSION_PLAIN));
        if plain.is_file() {
            return Ok(plain);
        }

        Err(ProcessingError::MissingFile { path: compressed })
    }

    /// Read a station/variable file into a [`StationSeriesMap`]. Any malformed
    /// token or repeated date fails the whole file.
    pub fn read_series(&self, path: &Path) -> Result<StationSeriesMap> {
        let observations = self.read_observations(path)?;
        let series = StationSeriesMap::from_observations(observations).map_err(|e| {
            ProcessingError::Format(format!("{}: {}", path.display(), e))
        })?;

        debug!(
            path = %path.display(),
            years = series.len(),
            "loaded observation series"
        );
        Ok(series)
    }

    pub fn read_observations(&self, path: &Path) -> Result<Vec<DailyObservation>> {
        if !path.is_file() {
            return Err(ProcessingError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let is_gzip = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

        let source: Box<dyn Read> = if is_gzip {
            Box::new(GzDecoder::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
        } else {
            Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
        };

        self.parse_observations(source)
            .map_err(|e| match e {
                ProcessingError::Format(message) => {
                    ProcessingError::Format(format!("{}: {}", path.display(), message))
                }
                other => other,
            })
    }

    /// Parse `date,value` records from any reader.
    pub fn parse_observations<R: Read>(&self, source: R) -> Result<Vec<DailyObservation>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut observations = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| match e.kind() {
                csv::ErrorKind::Io(io) if !is_corrupt_stream(io) => ProcessingError::Csv(e),
                _ => ProcessingError::Format(format!("record {}: {}", index + 1, e)),
            })?;

            if record.len() != 2 {
                return Err(ProcessingError::Format(format!(
                    "record {}: expected 'date,value', found {} fields",
                    index + 1,
                    record.len()
                )));
            }

            observations.push(DailyObservation::parse(&record[0], &record[1]).map_err(
                |e| ProcessingError::Format(format!("record {}: {}", index + 1, e)),
            )?);
        }

        Ok(observations)
    }
}

/// Decoder errors for a corrupt or truncated gzip stream, as opposed to the
/// file becoming unreadable.
fn is_corrupt_stream(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof
    )
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}
