use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Opaque station identifier, e.g. `USC00042319`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    pub id: StationId,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: Option<f64>,

    pub state: Option<String>,

    #[validate(length(min = 1))]
    pub name: String,

    pub gsn_flag: Option<String>,

    /// HCN/CRN network membership flag.
    pub network: Option<String>,

    pub wmo_id: Option<String>,
}

impl StationMetadata {
    pub fn new(id: StationId, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
            elevation: None,
            state: None,
            name,
            gsn_flag: None,
            network: None,
            wmo_id: None,
        }
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    /// FIPS country code carried in the first two characters of the id.
    pub fn country_code(&self) -> &str {
        self.id.as_str().get(..2).unwrap_or("")
    }

    pub fn in_state(&self, state: &str) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let station = StationMetadata::new(
            StationId::new("USC00042319"),
            "DEATH VALLEY".to_string(),
            36.4622,
            -116.8669,
        )
        .with_state("CA");

        assert!(station.validate().is_ok());
        assert_eq!(station.country_code(), "US");
        assert!(station.in_state("ca"));
        assert!(!station.in_state("NV"));
    }

    #[test]
    fn test_invalid_coordinates() {
        let station = StationMetadata::new(
            StationId::new("USC00000001"),
            "Invalid Station".to_string(),
            91.0, // Invalid latitude
            -0.1278,
        );

        assert!(station.validate().is_err());
    }
}
