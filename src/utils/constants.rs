/// Element codes as they appear in GHCN-Daily file names and inventories
pub const ELEMENT_TMAX: &str = "TMAX";
pub const ELEMENT_TMIN: &str = "TMIN";
pub const ELEMENT_TAVG: &str = "TAVG";

/// File naming
pub const OBSERVATION_EXTENSION_GZ: &str = "csv.gz";
pub const OBSERVATION_EXTENSION_PLAIN: &str = "csv";
pub const SERIES_CACHE_EXTENSION: &str = "series.json";

/// Sentinel used by the station listing for an unknown elevation
pub const MISSING_ELEVATION: f64 = -999.9;

/// Selection defaults
pub const DEFAULT_MIN_COVERAGE: f64 = 0.9;
pub const DEFAULT_MAX_MISSING_RUN: usize = 7;
pub const DEFAULT_START_YEAR: i32 = 1950;
pub const DEFAULT_END_YEAR: i32 = 2010;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "GHCND_TRENDS";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
