use crate::cache::SeriesCache;
use crate::cli::args::{Cli, Commands, InputArgs, SelectionArgs};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::{DatasetContext, StationSelector};
use crate::readers::{InventoryReader, SeriesStore, StationReader};
use crate::utils::filename::{generate_default_coverage_filename, generate_default_export_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::{build_export, AnnualSeriesRow, CoverageWriter, JsonWriter, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Trends {
            input,
            selection,
            output_file,
            parquet_file,
            compression,
            strict,
        } => {
            let config = load_config(cli.config.as_deref(), &selection)?;
            let output_file = output_file.unwrap_or_else(generate_default_export_filename);
            let parquet_writer = ParquetWriter::new().with_compression(&compression)?;
            let quiet = cli.quiet;

            info!(
                data_dir = %input.data_dir.display(),
                output = %output_file.display(),
                start_year = config.start_year,
                end_year = config.end_year,
                "computing station trends"
            );

            let (outcome, export) = tokio::task::spawn_blocking(move || -> Result<_> {
                let ctx = build_context(&input, &config)?;
                let selector = StationSelector::from_config(&config).with_strict_format(strict);
                let progress = ProgressReporter::new(0, "Selecting stations...", quiet);

                let outcome = selector.select(&ctx, Some(&progress))?;
                let export = build_export(&outcome.stations, ctx.stations())?;
                Ok((outcome, export))
            })
            .await??;

            if !cli.quiet {
                println!("\n{}", outcome.summary());
            }

            JsonWriter::new().write_export(&export, &output_file)?;

            if let Some(parquet_file) = parquet_file {
                if let Some(parent) = parquet_file.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                let rows = AnnualSeriesRow::from_trends(&outcome.stations);
                if rows.is_empty() {
                    warn!(
                        path = %parquet_file.display(),
                        "no stations accepted; writing an empty Parquet table"
                    );
                }
                parquet_writer.write_rows(&rows, &parquet_file)?;

                if !cli.quiet {
                    let file_info = parquet_writer.get_file_info(&parquet_file)?;
                    println!("\n{}", file_info.summary());
                }
            }

            if !cli.quiet {
                println!(
                    "Wrote {} stations to {}",
                    export.len(),
                    output_file.display()
                );
            }
        }

        Commands::Coverage {
            input,
            selection,
            output_file,
        } => {
            let config = load_config(cli.config.as_deref(), &selection)?;
            let output_file = output_file.unwrap_or_else(generate_default_coverage_filename);
            let quiet = cli.quiet;

            let (rows, failed) = tokio::task::spawn_blocking(move || {
                let ctx = build_context(&input, &config)?;
                let selector = StationSelector::from_config(&config);
                let progress = ProgressReporter::new(0, "Computing coverage...", quiet);
                selector.coverage_table(&ctx, Some(&progress))
            })
            .await??;

            CoverageWriter::new().write_rows(&rows, &output_file)?;

            if !cli.quiet {
                println!(
                    "Wrote {} coverage rows to {} ({} stations skipped)",
                    rows.len(),
                    output_file.display(),
                    failed.len()
                );
            }
        }

        Commands::Stations {
            stations_file,
            state,
            limit,
        } => {
            let reader = StationReader::with_state_filter(state);
            let mut stations = reader.read_stations(&stations_file)?;
            stations.sort_by(|a, b| a.id.cmp(&b.id));

            let shown = if limit == 0 {
                stations.len()
            } else {
                limit.min(stations.len())
            };

            println!("{} stations in {}", stations.len(), stations_file.display());
            for station in stations.iter().take(shown) {
                println!(
                    "{}  {:>8.4} {:>9.4}  {:<2}  {}",
                    station.id,
                    station.latitude,
                    station.longitude,
                    station.state.as_deref().unwrap_or(""),
                    station.name
                );
            }
            if shown < stations.len() {
                println!("... and {} more", stations.len() - shown);
            }
        }
    }

    Ok(())
}

/// Defaults, then the config file and environment, then command-line flags.
fn load_config(path: Option<&Path>, overrides: &SelectionArgs) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::load(path)?;
    overrides.apply(&mut config);
    config.check()?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

fn build_context(input: &InputArgs, config: &PipelineConfig) -> Result<DatasetContext> {
    let stations =
        StationReader::with_state_filter(config.state.clone()).read_stations_map(&input.stations_file)?;
    info!(stations = stations.len(), "station listing loaded");

    let mut store = SeriesStore::new(&input.data_dir);
    if let Some(cache_dir) = &config.cache_dir {
        store = store.with_cache(SeriesCache::new(cache_dir)?);
    }

    let mut ctx = DatasetContext::new(stations, store);
    if let Some(inventory_file) = &input.inventory_file {
        let inventory = InventoryReader::new().read_inventory(inventory_file)?;
        info!(entries = inventory.len(), "period-of-record inventory loaded");
        ctx = ctx.with_inventory(inventory);
    }

    Ok(ctx)
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// `--verbose`.
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ghcnd_trends={}", log_level)));

    // A second initialisation (tests, embedding) keeps the first subscriber.
    let _ = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
