use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{OpenWeatherClient, Units};

/// Environment variable consulted for the API key.
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_APIKEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "imperial"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub units: Option<Units>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Pick the API key: explicit value, then the environment, then the file.
    pub fn resolve_api_key(&self, explicit: Option<&str>, env: Option<&str>) -> Result<String> {
        explicit
            .or(env)
            .or(self.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeatherMap API key configured.\n\
                     Hint: pass --api-key, set {API_KEY_ENV}, or run `weather configure`."
                )
            })
    }

    /// Pick the units: explicit value, then the file, then Kelvin.
    pub fn resolve_units(&self, explicit: Option<Units>) -> Units {
        explicit.or(self.units).unwrap_or_default()
    }

    /// Build a client from the resolved options.
    pub fn client(&self, api_key: Option<&str>, units: Option<Units>) -> Result<OpenWeatherClient> {
        let env = std::env::var(API_KEY_ENV).ok();
        let api_key = self.resolve_api_key(api_key, env.as_deref())?;

        OpenWeatherClient::builder()
            .api_key(api_key)
            .units(self.resolve_units(units))
            .build()
            .context("Failed to create OpenWeatherMap client")
    }
}
