//! On-disk cache of parsed observation series.
//!
//! Entries are keyed by station and variable and carry a fingerprint of the
//! raw file they were built from. A fingerprint mismatch means the raw input
//! changed, so the entry is ignored and rebuilt from source.

use crate::error::Result;
use crate::models::{StationId, StationSeriesMap, Variable};
use crate::utils::constants::SERIES_CACHE_EXTENSION;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};

/// Size and modification time of a raw observation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub len: u64,
    pub modified_secs: u64,
    pub modified_nanos: u32,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Ok(Self {
            len: metadata.len(),
            modified_secs: modified.as_secs(),
            modified_nanos: modified.subsec_nanos(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedSeries {
    fingerprint: SourceFingerprint,
    series: StationSeriesMap,
}

pub struct SeriesCache {
    dir: PathBuf,
}

impl SeriesCache {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, station_id: &StationId, variable: Variable) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.{}",
            station_id,
            variable.element_code(),
            SERIES_CACHE_EXTENSION
        ))
    }

    /// Cached series if present and built from a file with this fingerprint.
    /// Unreadable entries are treated as absent.
    pub fn load(
        &self,
        station_id: &StationId,
        variable: Variable,
        fingerprint: &SourceFingerprint,
    ) -> Option<StationSeriesMap> {
        let path = self.entry_path(station_id, variable);
        let file = File::open(&path).ok()?;

        let cached: CachedSeries = match serde_json::from_reader(BufReader::new(file)) {
            Ok(cached) => cached,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable cache entry");
                return None;
            }
        };

        if cached.fingerprint != *fingerprint {
            debug!(%station_id, %variable, "cache entry is stale");
            return None;
        }

        Some(cached.series)
    }

    pub fn store(
        &self,
        station_id: &StationId,
        variable: Variable,
        fingerprint: SourceFingerprint,
        series: &StationSeriesMap,
    ) -> Result<()> {
        let path = self.entry_path(station_id, variable);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(
            &mut writer,
            &CachedSeriesRef {
                fingerprint,
                series,
            },
        )?;
        writer.flush()?;
        Ok(())
    }

    pub fn invalidate(&self, station_id: &StationId, variable: Variable) -> Result<()> {
        let path = self.entry_path(station_id, variable);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct CachedSeriesRef<'a> {
    fingerprint: SourceFingerprint,
    series: &'a StationSeriesMap,
}
