use crate::cache::{SeriesCache, SourceFingerprint};
use crate::error::Result;
use crate::models::{StationId, StationSeriesMap, Variable};
use crate::readers::ObservationReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolves station/variable series from the observation directory, going
/// through the series cache when one is configured.
pub struct SeriesStore {
    data_dir: PathBuf,
    reader: ObservationReader,
    cache: Option<SeriesCache>,
}

impl SeriesStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            reader: ObservationReader::new(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: SeriesCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load(&self, station_id: &StationId, variable: Variable) -> Result<StationSeriesMap> {
        let path = ObservationReader::locate(&self.data_dir, station_id, variable)?;

        let Some(cache) = &self.cache else {
            return self.reader.read_series(&path);
        };

        let fingerprint = SourceFingerprint::of(&path)?;
        if let Some(series) = cache.load(station_id, variable, &fingerprint) {
            debug!(%station_id, %variable, "series served from cache");
            return Ok(series);
        }

        let series = self.reader.read_series(&path)?;
        if let Err(e) = cache.store(station_id, variable, fingerprint, &series) {
            warn!(%station_id, %variable, error = %e, "failed to write series cache");
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cached_and_uncached_loads_agree() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::write(
            dir.path().join("USC00042319_TMAX.csv"),
            "19500101,125\n19500102,130\n19510101,-4\n",
        )?;
        let id = StationId::new("USC00042319");

        let plain = SeriesStore::new(dir.path()).load(&id, Variable::MaxTemperature)?;

        let cached_store = SeriesStore::new(dir.path())
            .with_cache(SeriesCache::new(dir.path().join("cache"))?);
        let first = cached_store.load(&id, Variable::MaxTemperature)?;
        let second = cached_store.load(&id, Variable::MaxTemperature)?;

        assert_eq!(plain, first);
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_changed_source_is_reloaded() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("USC00042319_TMIN.csv");
        std::fs::write(&path, "19500101,10\n")?;
        let id = StationId::new("USC00042319");

        let store = SeriesStore::new(dir.path())
            .with_cache(SeriesCache::new(dir.path().join("cache"))?);
        let before = store.load(&id, Variable::MinTemperature)?;
        assert_eq!(before.get(1950).unwrap().get(0), Some(10.0));

        // A different length changes the fingerprint regardless of mtime resolution
        std::fs::write(&path, "19500101,10\n19500102,20\n")?;
        let after = store.load(&id, Variable::MinTemperature)?;
        assert_eq!(after.get(1950).unwrap().get(1), Some(20.0));
        Ok(())
    }
}
