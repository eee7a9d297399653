use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::WeatherError;

/// A single reading at one instant.
///
/// Daily summaries produced by [`crate::Forecast::daily`] use the same shape,
/// with `date` set to midnight and the other fields holding aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: DateTime<FixedOffset>,
    pub temperature: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity: f64,
}

/// Measurement system requested from the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Kelvin,
    Imperial,
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Kelvin => "kelvin",
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Kelvin, Units::Imperial, Units::Metric]
    }

    /// Suffix used when printing temperatures.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Kelvin => "K",
            Units::Imperial => "°F",
            Units::Metric => "°C",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "kelvin" => Ok(Units::Kelvin),
            "imperial" => Ok(Units::Imperial),
            "metric" => Ok(Units::Metric),
            _ => Err(WeatherError::UnknownUnits(value.to_string())),
        }
    }
}
