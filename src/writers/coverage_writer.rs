use crate::error::Result;
use crate::models::CoverageRow;
use std::fs;
use std::path::Path;
use tracing::info;

/// Coverage table as CSV: station, variable, present days, calendar days,
/// fraction.
pub struct CoverageWriter;

impl CoverageWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_rows(&self, rows: &[CoverageRow], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!(rows = rows.len(), path = %path.display(), "wrote coverage table");
        Ok(())
    }

    pub fn read_rows(&self, path: &Path) -> Result<Vec<CoverageRow>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

impl Default for CoverageWriter {
    fn default() -> Self {
        Self::new()
    }
}
