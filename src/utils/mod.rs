pub mod calendar;
pub mod constants;
pub mod filename;
pub mod progress;

pub use calendar::{day_of_year_index, is_leap_year, year_length};
pub use constants::*;
pub use filename::{generate_default_coverage_filename, generate_default_export_filename};
pub use progress::ProgressReporter;
