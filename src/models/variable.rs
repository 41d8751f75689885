use crate::utils::constants::{ELEMENT_TAVG, ELEMENT_TMAX, ELEMENT_TMIN};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "TMAX")]
    MaxTemperature,
    #[serde(rename = "TMIN")]
    MinTemperature,
    /// Daily mean synthesised from TMAX and TMIN.
    #[serde(rename = "TAVG")]
    MeanTemperature,
}

impl Variable {
    pub fn from_element_code(code: &str) -> Option<Self> {
        match code.trim() {
            ELEMENT_TMAX => Some(Variable::MaxTemperature),
            ELEMENT_TMIN => Some(Variable::MinTemperature),
            ELEMENT_TAVG => Some(Variable::MeanTemperature),
            _ => None,
        }
    }

    pub fn element_code(&self) -> &'static str {
        match self {
            Variable::MaxTemperature => ELEMENT_TMAX,
            Variable::MinTemperature => ELEMENT_TMIN,
            Variable::MeanTemperature => ELEMENT_TAVG,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variable::MaxTemperature => "Temperature (Max)",
            Variable::MinTemperature => "Temperature (Min)",
            Variable::MeanTemperature => "Temperature (Mean)",
        }
    }

    /// Units of the raw daily values.
    pub fn units(&self) -> &'static str {
        "0.1°C"
    }

    /// Derived variables have no observation file of their own.
    pub fn is_derived(&self) -> bool {
        matches!(self, Variable::MeanTemperature)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element_code())
    }
}

impl std::str::FromStr for Variable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::from_element_code(&s.to_ascii_uppercase())
            .ok_or_else(|| format!("Unknown element code: '{}'", s))
    }
}
