use chrono::{Datelike, Local};
use std::path::PathBuf;

fn date_stamp() -> String {
    let now = Local::now();
    format!("{:02}{:02}{:02}", now.year() % 100, now.month(), now.day())
}

/// Default export path: output/ghcnd-trends-{YYMMDD}.json
pub fn generate_default_export_filename() -> PathBuf {
    PathBuf::from("output").join(format!("ghcnd-trends-{}.json", date_stamp()))
}

/// Default coverage table path: output/ghcnd-coverage-{YYMMDD}.csv
pub fn generate_default_coverage_filename() -> PathBuf {
    PathBuf::from("output").join(format!("ghcnd-coverage-{}.csv", date_stamp()))
}
