use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to OpenWeatherMap ({endpoint})")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeatherMap {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeatherMap {endpoint} JSON")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("UTC shift of {0} seconds is out of range")]
    InvalidOffset(i32),

    #[error("Unknown units '{0}'. Supported units: kelvin, imperial, metric.")]
    UnknownUnits(String),
}
