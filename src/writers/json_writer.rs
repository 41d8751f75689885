use crate::error::{ProcessingError, Result};
use crate::models::{StationId, StationMetadata, StationTrends, Variable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Annual series and fitted line for one variable, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedVariable {
    pub series: Vec<(i32, f64)>,
    pub intercept: f64,
    pub slope: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedStation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub variables: BTreeMap<Variable, ExportedVariable>,
}

impl ExportedStation {
    pub fn new(metadata: &StationMetadata, trends: &StationTrends) -> Self {
        let variables = trends
            .variables
            .iter()
            .map(|(&variable, result)| {
                (
                    variable,
                    ExportedVariable {
                        series: result.series.iter().map(|a| (a.year, a.value)).collect(),
                        intercept: result.trend.intercept,
                        slope: result.trend.slope,
                    },
                )
            })
            .collect();

        Self {
            name: metadata.name.clone(),
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            variables,
        }
    }
}

/// Final per-station mapping written by the `trends` command.
pub type TrendExport = BTreeMap<StationId, ExportedStation>;

/// Join accepted trends with station metadata.
pub fn build_export(
    trends: &BTreeMap<StationId, StationTrends>,
    stations: &HashMap<StationId, StationMetadata>,
) -> Result<TrendExport> {
    trends
        .iter()
        .map(|(station_id, station_trends)| {
            let metadata = stations.get(station_id).ok_or_else(|| {
                ProcessingError::Config(format!("No metadata for station {}", station_id))
            })?;
            Ok((
                station_id.clone(),
                ExportedStation::new(metadata, station_trends),
            ))
        })
        .collect()
}

pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn write_export(&self, export: &TrendExport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, export)?;
        } else {
            serde_json::to_writer(&mut writer, export)?;
        }
        writer.flush()?;

        info!(stations = export.len(), path = %path.display(), "wrote trend export");
        Ok(())
    }

    pub fn read_export(&self, path: &Path) -> Result<TrendExport> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
