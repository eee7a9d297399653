use async_trait::async_trait;
use bon::bon;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    Forecast, Observation, Units,
    error::{Result, WeatherError},
};

use super::{WeatherProvider, timestamp_in_zone, truncate_body};

pub const OPEN_WEATHER_MAP_URL: &str = "https://api.openweathermap.org/data/2.5/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the OpenWeatherMap 2.5 API.
///
/// Options are fixed at construction:
///
/// ```no_run
/// use weather_core::{OpenWeatherClient, Units};
///
/// let client = OpenWeatherClient::builder()
///     .api_key("my-key")
///     .units(Units::Imperial)
///     .build()?;
/// # Ok::<(), weather_core::WeatherError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

#[bon]
impl OpenWeatherClient {
    /// Unset options fall back to an empty key, Kelvin, a 5 second timeout
    /// and [`OPEN_WEATHER_MAP_URL`].
    #[builder]
    pub fn new(
        #[builder(into)] api_key: Option<String>,
        units: Option<Units>,
        timeout: Option<Duration>,
        #[builder(into)] base_url: Option<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(WeatherError::Client)?;

        Ok(Self {
            api_key: api_key.unwrap_or_default(),
            units: units.unwrap_or_default(),
            base_url: base_url.unwrap_or_else(|| OPEN_WEATHER_MAP_URL.to_string()),
            http,
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    fn request(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<reqwest::Request> {
        let mut builder = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .query(params)
            .query(&[("APPID", self.api_key.as_str())]);

        // Kelvin is what the API returns when no units are given.
        if self.units != Units::Kelvin {
            builder = builder.query(&[("units", self.units.as_str())]);
        }

        builder.build().map_err(|source| WeatherError::Request {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        let request = self.request(endpoint, params)?;
        debug!(endpoint, units = %self.units, "Sending OpenWeatherMap request");

        let res = self.http.execute(request).await.map_err(|source| WeatherError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| WeatherError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if status != StatusCode::OK {
            warn!(endpoint, %status, "OpenWeatherMap request failed");
            return Err(WeatherError::Status {
                endpoint: endpoint.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, zip: &str) -> Result<Observation> {
        let body = self.get("weather", &[("zip", zip)]).await?;
        parse_current(&body)
    }

    async fn forecast(&self, zip: &str) -> Result<Forecast> {
        let body = self.get("forecast", &[("zip", zip)]).await?;
        let forecast = parse_forecast(&body)?;
        debug!(observations = forecast.len(), "Decoded OpenWeatherMap forecast");
        Ok(forecast)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    #[serde(default)]
    timezone: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    city: Option<OwCity>,
    list: Vec<OwForecastEntry>,
}

fn observation(dt: i64, main: &OwMain, utc_shift: Option<i32>) -> Result<Observation> {
    Ok(Observation {
        date: timestamp_in_zone(dt, utc_shift)?,
        temperature: main.temp,
        temperature_min: main.temp_min,
        temperature_max: main.temp_max,
        humidity: main.humidity,
    })
}

/// Decode a body returned by the `weather` endpoint.
pub fn parse_current(body: &str) -> Result<Observation> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|source| WeatherError::Decode {
        endpoint: "weather".to_string(),
        source,
    })?;

    observation(parsed.dt, &parsed.main, parsed.timezone)
}

/// Decode a body returned by the `forecast` endpoint, keeping the order of `list`.
pub fn parse_forecast(body: &str) -> Result<Forecast> {
    let parsed: OwForecastResponse = serde_json::from_str(body).map_err(|source| WeatherError::Decode {
        endpoint: "forecast".to_string(),
        source,
    })?;

    let utc_shift = parsed.city.and_then(|c| c.timezone);

    parsed
        .list
        .iter()
        .map(|entry| observation(entry.dt, &entry.main, utc_shift))
        .collect::<Result<Vec<_>>>()
        .map(Forecast::new)
}
