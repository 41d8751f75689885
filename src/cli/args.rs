use crate::config::PipelineConfig;
use crate::models::Variable;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghcnd-trends")]
#[command(about = "Station completeness screening and annual temperature trends for GHCN-Daily data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide progress bars and summaries")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select stations and compute annual series and trends
    Trends {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(
            short,
            long,
            help = "Output JSON export path [default: output/ghcnd-trends-{YYMMDD}.json]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Also write the annual series as a Parquet table")]
        parquet_file: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, help = "Abort the run on the first malformed input file")]
        strict: bool,
    },

    /// Compute the coverage table for every station
    Coverage {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: output/ghcnd-coverage-{YYMMDD}.csv]"
        )]
        output_file: Option<PathBuf>,
    },

    /// List stations from the station listing
    Stations {
        #[arg(short, long, help = "Fixed-width station listing")]
        stations_file: PathBuf,

        #[arg(long, help = "Only stations in this state/province")]
        state: Option<String>,

        #[arg(short, long, default_value = "20", help = "Rows to print (0 = all)")]
        limit: usize,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(short, long, help = "Directory of <STATION>_<ELEMENT>.csv[.gz] files")]
    pub data_dir: PathBuf,

    #[arg(short, long, help = "Fixed-width station listing")]
    pub stations_file: PathBuf,

    #[arg(long, help = "Period-of-record inventory")]
    pub inventory_file: Option<PathBuf>,
}

/// Flags that override the loaded configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    #[arg(long)]
    pub start_year: Option<i32>,

    #[arg(long)]
    pub end_year: Option<i32>,

    #[arg(long, help = "Minimum fraction of days present, 0-1")]
    pub min_coverage: Option<f64>,

    #[arg(long, help = "Longest run of missing days in a good year")]
    pub max_missing_run: Option<usize>,

    #[arg(long, value_delimiter = ',', help = "Observed elements, e.g. TMAX,TMIN")]
    pub variables: Option<Vec<Variable>>,

    #[arg(long, help = "Do not derive TAVG from TMAX and TMIN")]
    pub no_derive_mean: bool,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub max_workers: Option<usize>,

    #[arg(long, help = "Directory for parsed series cache entries")]
    pub cache_dir: Option<PathBuf>,
}

impl SelectionArgs {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(start_year) = self.start_year {
            config.start_year = start_year;
        }
        if let Some(end_year) = self.end_year {
            config.end_year = end_year;
        }
        if let Some(min_coverage) = self.min_coverage {
            config.min_coverage = min_coverage;
        }
        if let Some(max_missing_run) = self.max_missing_run {
            config.max_missing_run = max_missing_run;
        }
        if let Some(variables) = &self.variables {
            config.variables = variables.clone();
        }
        if self.no_derive_mean {
            config.derive_mean = false;
        }
        if self.state.is_some() {
            config.state = self.state.clone();
        }
        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }
        if self.cache_dir.is_some() {
            config.cache_dir = self.cache_dir.clone();
        }
    }
}
