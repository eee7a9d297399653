use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};
use std::fmt::Debug;

use crate::{
    Forecast, Observation,
    error::{Result, WeatherError},
};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Source of observations for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, zip: &str) -> Result<Observation>;

    async fn forecast(&self, zip: &str) -> Result<Forecast>;
}

/// Resolve a unix timestamp into the location's offset.
///
/// `utc_shift` is the shift in seconds reported by the API for the location.
/// Without it the machine's local offset at that instant is used.
pub(crate) fn timestamp_in_zone(ts: i64, utc_shift: Option<i32>) -> Result<DateTime<FixedOffset>> {
    let utc = DateTime::from_timestamp(ts, 0).ok_or(WeatherError::InvalidTimestamp(ts))?;

    match utc_shift {
        Some(secs) => {
            let offset = FixedOffset::east_opt(secs).ok_or(WeatherError::InvalidOffset(secs))?;
            Ok(utc.with_timezone(&offset))
        }
        None => Ok(utc.with_timezone(&Local).fixed_offset()),
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
