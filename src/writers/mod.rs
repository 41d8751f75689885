pub mod coverage_writer;
pub mod json_writer;
pub mod parquet_writer;

pub use coverage_writer::CoverageWriter;
pub use json_writer::{build_export, ExportedStation, ExportedVariable, JsonWriter, TrendExport};
pub use parquet_writer::{AnnualSeriesRow, ParquetFileInfo, ParquetWriter};
