use crate::error::{ProcessingError, Result};
use crate::models::Variable;
use crate::utils::constants::{
    DEFAULT_END_YEAR, DEFAULT_MAX_MISSING_RUN, DEFAULT_MIN_COVERAGE, DEFAULT_START_YEAR,
    ENV_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Settings for one selection run. Loaded from defaults, an optional TOML
/// file and `GHCND_TRENDS_*` environment variables, in that order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    pub start_year: i32,

    pub end_year: i32,

    #[validate(range(min = 0.0, max = 1.0))]
    pub min_coverage: f64,

    #[validate(range(max = 366))]
    pub max_missing_run: usize,

    #[validate(length(min = 1))]
    pub variables: Vec<Variable>,

    pub derive_mean: bool,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    /// Restrict processing to stations in this state/province.
    pub state: Option<String>,

    pub cache_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            min_coverage: DEFAULT_MIN_COVERAGE,
            max_missing_run: DEFAULT_MAX_MISSING_RUN,
            variables: vec![Variable::MaxTemperature, Variable::MinTemperature],
            derive_mean: true,
            max_workers: num_cpus::get(),
            state: None,
            cache_dir: None,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("variables"),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Field ranges plus the cross-field rules the derive cannot express.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.start_year > self.end_year {
            return Err(ProcessingError::Config(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }

        if let Some(derived) = self.variables.iter().find(|v| v.is_derived()) {
            return Err(ProcessingError::Config(format!(
                "{} is derived and cannot be listed as an observed variable",
                derived
            )));
        }

        if self.derive_mean
            && !(self.variables.contains(&Variable::MaxTemperature)
                && self.variables.contains(&Variable::MinTemperature))
        {
            return Err(ProcessingError::Config(
                "deriving TAVG requires both TMAX and TMIN".to_string(),
            ));
        }

        Ok(())
    }
}
