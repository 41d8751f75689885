use crate::error::{ProcessingError, Result};
use crate::models::{StationId, StationTrends, Variable};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel};
use parquet::file::properties::WriterProperties;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// One annual mean with the trend of its station/variable repeated on the row.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSeriesRow {
    pub station_id: StationId,
    pub variable: Variable,
    pub year: i32,
    pub value: f64,
    pub slope: f64,
    pub intercept: f64,
}

impl AnnualSeriesRow {
    /// Flatten accepted trends into rows ordered by station, variable, year.
    pub fn from_trends(trends: &BTreeMap<StationId, StationTrends>) -> Vec<Self> {
        let mut rows = Vec::new();
        for (station_id, station) in trends {
            for (&variable, result) in &station.variables {
                rows.extend(result.series.iter().map(|annual| AnnualSeriesRow {
                    station_id: station_id.clone(),
                    variable,
                    year: annual.year,
                    value: annual.value,
                    slope: result.trend.slope,
                    intercept: result.trend.intercept,
                }));
            }
        }
        rows
    }
}

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(parquet::basic::ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write annual series rows to a Parquet file. No rows still gives a
    /// readable file carrying only the schema.
    pub fn write_rows(&self, rows: &[AnnualSeriesRow], path: &Path) -> Result<()> {
        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in rows.chunks(self.row_group_size.max(1)) {
            let batch = self.rows_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("station_id", DataType::Utf8, false),
            Field::new("variable", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("value", DataType::Float64, false),
            Field::new("slope", DataType::Float64, false),
            Field::new("intercept", DataType::Float64, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn rows_to_batch(&self, rows: &[AnnualSeriesRow], schema: Arc<Schema>) -> Result<RecordBatch> {
        let station_ids: Vec<&str> = rows.iter().map(|r| r.station_id.as_str()).collect();
        let variables: Vec<&str> = rows.iter().map(|r| r.variable.element_code()).collect();
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        let slopes: Vec<f64> = rows.iter().map(|r| r.slope).collect();
        let intercepts: Vec<f64> = rows.iter().map(|r| r.intercept).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(station_ids)),
                Arc::new(StringArray::from(variables)),
                Arc::new(Int32Array::from(years)),
                Arc::new(Float64Array::from(values)),
                Arc::new(Float64Array::from(slopes)),
                Arc::new(Float64Array::from(intercepts)),
            ],
        )?;

        Ok(batch)
    }

    /// Read up to `limit` rows back from a file written by `write_rows`.
    pub fn read_rows(&self, path: &Path, limit: usize) -> Result<Vec<AnnualSeriesRow>> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let file = File::open(path)?;
        let parquet_reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(limit.clamp(1, 8192))
            .build()?;

        let mut rows = Vec::new();

        for batch_result in parquet_reader {
            let batch = batch_result?;

            let station_ids = column::<StringArray>(&batch, 0, "station_id")?;
            let variables = column::<StringArray>(&batch, 1, "variable")?;
            let years = column::<Int32Array>(&batch, 2, "year")?;
            let values = column::<Float64Array>(&batch, 3, "value")?;
            let slopes = column::<Float64Array>(&batch, 4, "slope")?;
            let intercepts = column::<Float64Array>(&batch, 5, "intercept")?;

            for i in 0..batch.num_rows() {
                if rows.len() >= limit {
                    return Ok(rows);
                }

                let variable = Variable::from_element_code(variables.value(i)).ok_or_else(|| {
                    ProcessingError::Format(format!(
                        "Unknown variable '{}' in Parquet file",
                        variables.value(i)
                    ))
                })?;

                rows.push(AnnualSeriesRow {
                    station_id: StationId::new(station_ids.value(i)),
                    variable,
                    year: years.value(i),
                    value: values.value(i),
                    slope: slopes.value(i),
                    intercept: intercepts.value(i),
                });
            }
        }

        Ok(rows)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let file_metadata = metadata.file_metadata();
        let row_groups = metadata.num_row_groups();
        let total_rows = file_metadata.num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let mut row_group_sizes = Vec::new();
        for i in 0..row_groups {
            let rg_metadata = metadata.row_group(i);
            row_group_sizes.push(rg_metadata.num_rows());
        }

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, index: usize, name: &str) -> Result<&'a T> {
    batch
        .column(index)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::Format(format!("Invalid {} column type", name)))
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            avg_rows
        )
    }
}
