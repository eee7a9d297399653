use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use tracing::info;
use weather_core::{Config, OpenWeatherClient, Units, WeatherProvider};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "OpenWeatherMap CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// OpenWeatherMap API key; overrides the environment and the config file.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Units to request: kelvin, imperial or metric.
    #[arg(long, global = true)]
    pub units: Option<Units>,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default units.
    Configure,

    /// Show current weather for a zip code.
    Current {
        /// Zip code, optionally with a country code, e.g. "90210,us".
        zip: String,
    },

    /// Show the forecast for a zip code.
    Forecast {
        zip: String,

        /// Reduce the forecast to one summary per day.
        #[arg(long)]
        daily: bool,
    },

    /// Show current weather, the forecast and daily summaries.
    All { zip: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            command => {
                let client = config.client(self.api_key.as_deref(), self.units)?;
                execute(command, &client, self.json).await
            }
        }
    }
}

async fn execute(command: Command, client: &OpenWeatherClient, json: bool) -> anyhow::Result<()> {
    let units = client.units();

    match command {
        Command::Configure => {}
        Command::Current { zip } => {
            let current = client.current_weather(&zip).await?;
            output::print_observations("Current weather", &[current], units, json)?;
        }
        Command::Forecast { zip, daily } => {
            let forecast = client.forecast(&zip).await?;
            if daily {
                let days = forecast.daily();
                info!(days = days.len(), "Aggregated daily forecast");
                output::print_observations("Daily forecast", &days, units, json)?;
            } else {
                output::print_observations("Forecast", &forecast, units, json)?;
            }
        }
        Command::All { zip } => {
            let current = client.current_weather(&zip).await?;
            output::print_observations("Current weather", &[current], units, json)?;

            let forecast = client.forecast(&zip).await?;
            output::print_observations("Forecast", &forecast, units, json)?;

            let days = forecast.daily();
            info!(days = days.len(), "Aggregated daily forecast");
            output::print_observations("Daily forecast", &days, units, json)?;
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current = config.units.unwrap_or_default();
    let start = Units::all().iter().position(|u| *u == current).unwrap_or(0);
    let units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read units")?;
    config.units = Some(units);

    config.save()?;

    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
