use crate::error::{ProcessingError, Result};
use crate::models::{StationId, StationMetadata};
use crate::readers::fixed_width::{field, parse_field, required_field, strip_line_ending};
use crate::utils::constants::MISSING_ELEVATION;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;
use validator::Validate;

// Byte ranges of the fixed-width station listing.
const ID: std::ops::Range<usize> = 0..11;
const LATITUDE: std::ops::Range<usize> = 12..20;
const LONGITUDE: std::ops::Range<usize> = 21..30;
const ELEVATION: std::ops::Range<usize> = 31..37;
const STATE: std::ops::Range<usize> = 38..40;
const NAME: std::ops::Range<usize> = 41..71;
const GSN_FLAG: std::ops::Range<usize> = 72..75;
const NETWORK: std::ops::Range<usize> = 76..79;
const WMO_ID: std::ops::Range<usize> = 80..85;

pub struct StationReader {
    state_filter: Option<String>,
}

impl StationReader {
    pub fn new() -> Self {
        Self { state_filter: None }
    }

    /// Only keep stations whose state/province code matches.
    pub fn with_state_filter(state: Option<String>) -> Self {
        Self {
            state_filter: state,
        }
    }

    /// Read station metadata from the fixed-width station listing
    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationMetadata>> {
        let file = File::open(path)?;
        self.read_stations_from(BufReader::new(file))
    }

    pub fn read_stations_from<R: BufRead>(&self, reader: R) -> Result<Vec<StationMetadata>> {
        let mut stations = Vec::new();

        for (index, line_result) in reader.split(b'\n').enumerate() {
            let raw = line_result?;
            let line = strip_line_ending(&raw);

            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            let station = self.parse_station_line(line, index + 1)?;
            if let Some(state) = &self.state_filter {
                if !station.in_state(state) {
                    continue;
                }
            }
            stations.push(station);
        }

        debug!(count = stations.len(), "read station listing");
        Ok(stations)
    }

    /// Parse a single line from the station listing
    fn parse_station_line(&self, line: &[u8], line_number: usize) -> Result<StationMetadata> {
        if line.len() <= NAME.start {
            return Err(ProcessingError::Format(format!(
                "Line {}: truncated station record ({} bytes)",
                line_number,
                line.len()
            )));
        }

        let id = required_field(line, ID, "station id", line_number)?;
        let latitude = parse_field::<f64>(
            &required_field(line, LATITUDE, "latitude", line_number)?,
            "latitude",
            line_number,
        )?;
        let longitude = parse_field::<f64>(
            &required_field(line, LONGITUDE, "longitude", line_number)?,
            "longitude",
            line_number,
        )?;

        let elevation = match field(line, ELEVATION) {
            Some(value) => {
                let elevation = parse_field::<f64>(&value, "elevation", line_number)?;
                (elevation != MISSING_ELEVATION).then_some(elevation)
            }
            None => None,
        };

        let station = StationMetadata {
            id: StationId::new(id),
            latitude,
            longitude,
            elevation,
            state: field(line, STATE),
            name: required_field(line, NAME, "name", line_number)?,
            gsn_flag: field(line, GSN_FLAG),
            network: field(line, NETWORK),
            wmo_id: field(line, WMO_ID),
        };

        station.validate().map_err(|e| {
            ProcessingError::Format(format!("Line {}: {}", line_number, e))
        })?;

        Ok(station)
    }

    /// Read station metadata keyed by station id; ids must be unique.
    pub fn read_stations_map(&self, path: &Path) -> Result<HashMap<StationId, StationMetadata>> {
        let stations = self.read_stations(path)?;
        let mut map = HashMap::with_capacity(stations.len());

        for station in stations {
            let id = station.id.clone();
            if map.insert(id.clone(), station).is_some() {
                return Err(ProcessingError::Format(format!(
                    "Station {} listed more than once",
                    id
                )));
            }
        }

        Ok(map)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DEATH_VALLEY: &str =
        "USC00042319  36.4622 -116.8669  -59.1 CA DEATH VALLEY                       HCN 72391";
    const ANTARCTIC: &str =
        "AYM00089009 -90.0000    0.0000 2835.0    AMUNDSEN-SCOTT                 GSN     89009";

    #[test]
    fn test_parse_station_line() {
        let reader = StationReader::new();
        let station = reader
            .parse_station_line(DEATH_VALLEY.as_bytes(), 1)
            .unwrap();

        assert_eq!(station.id.as_str(), "USC00042319");
        assert!((station.latitude - 36.4622).abs() < 1e-9);
        assert!((station.longitude - -116.8669).abs() < 1e-9);
        assert_eq!(station.elevation, Some(-59.1));
        assert_eq!(station.state.as_deref(), Some("CA"));
        assert_eq!(station.name, "DEATH VALLEY");
        assert_eq!(station.gsn_flag, None);
        assert_eq!(station.network.as_deref(), Some("HCN"));
        assert_eq!(station.wmo_id.as_deref(), Some("72391"));
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let reader = StationReader::new();
        let station = reader.parse_station_line(ANTARCTIC.as_bytes(), 1).unwrap();

        assert_eq!(station.state, None);
        assert_eq!(station.name, "AMUNDSEN-SCOTT");
        assert_eq!(station.gsn_flag.as_deref(), Some("GSN"));
        assert_eq!(station.network, None);
        assert_eq!(station.wmo_id.as_deref(), Some("89009"));
    }

    #[test]
    fn test_missing_elevation_sentinel() {
        let line = "USC00000001  40.0000 -100.0000 -999.9 NE SOMEWHERE";
        let station = StationReader::new()
            .parse_station_line(line.as_bytes(), 1)
            .unwrap();
        assert_eq!(station.elevation, None);
        assert_eq!(station.name, "SOMEWHERE");
    }

    #[test]
    fn test_truncated_and_malformed_lines() {
        let reader = StationReader::new();

        let truncated = "USC00042319  36.4622 -116.8669  -59.1 CA";
        assert!(matches!(
            reader.parse_station_line(truncated.as_bytes(), 3),
            Err(ProcessingError::Format(_))
        ));

        let bad_latitude =
            "USC00042319  36.46x2 -116.8669  -59.1 CA DEATH VALLEY                       HCN 72391";
        assert!(matches!(
            reader.parse_station_line(bad_latitude.as_bytes(), 4),
            Err(ProcessingError::Format(_))
        ));

        let out_of_range =
            "USC00042319  96.4622 -116.8669  -59.1 CA DEATH VALLEY                       HCN 72391";
        assert!(reader
            .parse_station_line(out_of_range.as_bytes(), 5)
            .is_err());
    }

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", DEATH_VALLEY)?;
        writeln!(temp_file)?;
        write!(temp_file, "{}\r\n", ANTARCTIC)?;

        let stations = StationReader::new().read_stations(temp_file.path())?;
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].wmo_id.as_deref(), Some("89009"));

        let california = StationReader::with_state_filter(Some("CA".to_string()))
            .read_stations_map(temp_file.path())?;
        assert_eq!(california.len(), 1);
        assert!(california.contains_key(&StationId::new("USC00042319")));

        Ok(())
    }

    #[test]
    fn test_duplicate_station_ids() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", DEATH_VALLEY)?;
        writeln!(temp_file, "{}", DEATH_VALLEY)?;

        let result = StationReader::new().read_stations_map(temp_file.path());
        assert!(matches!(result, Err(ProcessingError::Format(_))));
        Ok(())
    }
}
