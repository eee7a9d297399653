use anyhow::Context;
use std::fmt::Write;
use weather_core::{Observation, Units};

pub fn print_observations(
    title: &str,
    observations: &[Observation],
    units: Units,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(observations)
            .context("Failed to serialize observations to JSON")?;
        println!("{out}");
    } else {
        print!("{}", render_table(title, observations, units));
    }

    Ok(())
}

/// Human-readable table, one row per observation.
pub fn render_table(title: &str, observations: &[Observation], units: Units) -> String {
    let suffix = units.temperature_suffix();
    let mut out = String::new();

    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "{:<20} {:>10} {:>10} {:>10} {:>9}",
        "date", "temp", "min", "max", "humidity"
    );

    if observations.is_empty() {
        let _ = writeln!(out, "(no data)");
    }

    for o in observations {
        let _ = writeln!(
            out,
            "{:<20} {:>10} {:>10} {:>10} {:>8.0}%",
            o.date.format("%Y-%m-%d %H:%M %:z"),
            format!("{:.1}{suffix}", o.temperature),
            format!("{:.1}{suffix}", o.temperature_min),
            format!("{:.1}{suffix}", o.temperature_max),
            o.humidity,
        );
    }
    out.push('\n');

    out
}
