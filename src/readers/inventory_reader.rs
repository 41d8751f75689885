use crate::error::{ProcessingError, Result};
use crate::models::{PeriodOfRecord, PeriodOfRecordIndex, StationId, Variable};
use crate::readers::fixed_width::{field, parse_field, required_field, strip_line_ending};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const ID: std::ops::Range<usize> = 0..11;
const ELEMENT: std::ops::Range<usize> = 31..35;
const FIRST_YEAR: std::ops::Range<usize> = 36..40;
const LAST_YEAR: std::ops::Range<usize> = 41..45;
const STATE_START: usize = 45;

/// Reads the period-of-record inventory: one line per station and element
/// with the first and last year of data.
pub struct InventoryReader;

impl InventoryReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_inventory(&self, path: &Path) -> Result<PeriodOfRecordIndex> {
        let file = File::open(path)?;
        self.read_inventory_from(BufReader::new(file))
    }

    pub fn read_inventory_from<R: BufRead>(&self, reader: R) -> Result<PeriodOfRecordIndex> {
        let mut index = PeriodOfRecordIndex::new();
        let mut skipped = 0usize;

        for (line_index, line_result) in reader.split(b'\n').enumerate() {
            let raw = line_result?;
            let line = strip_line_ending(&raw);

            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            match self.parse_inventory_line(line, line_index + 1)? {
                Some(period) => index.insert(period),
                None => skipped += 1,
            }
        }

        debug!(entries = index.len(), skipped, "read period-of-record inventory");
        Ok(index)
    }

    /// Parse one inventory line; elements that are not temperature variables
    /// yield `None`.
    fn parse_inventory_line(
        &self,
        line: &[u8],
        line_number: usize,
    ) -> Result<Option<PeriodOfRecord>> {
        if line.len() < LAST_YEAR.end {
            return Err(ProcessingError::Format(format!(
                "Line {}: truncated inventory record ({} bytes)",
                line_number,
                line.len()
            )));
        }

        let element = required_field(line, ELEMENT, "element", line_number)?;
        let Some(variable) = Variable::from_element_code(&element) else {
            return Ok(None);
        };

        let station_id = StationId::new(required_field(line, ID, "station id", line_number)?);
        let first_year = parse_field::<i32>(
            &required_field(line, FIRST_YEAR, "first year", line_number)?,
            "first year",
            line_number,
        )?;
        let last_year = parse_field::<i32>(
            &required_field(line, LAST_YEAR, "last year", line_number)?,
            "last year",
            line_number,
        )?;

        if first_year > last_year {
            return Err(ProcessingError::Format(format!(
                "Line {}: first year {} after last year {}",
                line_number, first_year, last_year
            )));
        }

        let state = match field(line, STATE_START..line.len()) {
            Some(token) => Some(parse_field::<i64>(&token, "state", line_number)?),
            None => None,
        };

        Ok(Some(PeriodOfRecord {
            station_id,
            variable,
            first_year,
            last_year,
            state,
        }))
    }
}

impl Default for InventoryReader {
    fn default() -> Self {
        Self::new()
    }
}
