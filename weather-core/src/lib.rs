//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Shared domain models (observations, units)
//! - Forecast statistics and the reduction to daily summaries
//! - The OpenWeatherMap client
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::{Result, WeatherError};
pub use forecast::Forecast;
pub use model::{Observation, Units};
pub use provider::{OpenWeatherClient, WeatherProvider};
