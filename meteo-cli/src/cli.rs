use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use meteo_core::{Config, WeatherProvider, fetch_icons, provider_from_config};
use tracing::{error, info, warn};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current weather and forecast for one location")]
pub struct Cli {
    /// OpenWeatherMap API key; takes precedence over the configured one.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and the location to show.
    Configure,

    /// Show current weather and the daily forecast.
    Show {
        /// Location name; defaults to the configured one.
        #[arg(long)]
        location: Option<String>,

        /// Directory to write condition icons into, as `<code>.png`.
        #[arg(long)]
        icons_dir: Option<PathBuf>,

        /// Number of forecast days to show.
        #[arg(long, default_value_t = 5)]
        days: usize,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { location, icons_dir, days } => {
                let config = with_api_key_override(config, self.api_key);
                let location = resolve_location(location, &config)?;
                let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

                show(provider, &location, icons_dir.as_deref(), days, &mut std::io::stdout()).await
            }
        }
    }
}

/// A key given on the command line or in the environment wins over the configured one.
fn with_api_key_override(mut config: Config, api_key: Option<String>) -> Config {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(key);
    }
    config
}

/// `--location` first, then the configured location.
fn resolve_location(flag: Option<String>, config: &Config) -> anyhow::Result<String> {
    match flag.filter(|l| !l.trim().is_empty()) {
        Some(location) => Ok(location),
        None => Ok(config.location()?.to_string()),
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut location_prompt = Text::new("Location:");
    if let Some(current) = config.location.as_deref() {
        location_prompt = location_prompt.with_default(current);
    }
    let location = location_prompt.prompt().context("Failed to read location")?;

    config.api_key = Some(api_key.trim().to_string());
    config.location = Some(location.trim().to_string());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

/// Render current weather and forecast to `out`, then load icons.
///
/// Each part fails on its own: a missing current report does not hide the
/// forecast, and a failed icon does not stop the others from being written.
async fn show(
    provider: Arc<dyn WeatherProvider>,
    location: &str,
    icons_dir: Option<&Path>,
    days: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}", render::title(location))?;

    let mut icon_codes = Vec::new();

    match provider.current_weather(location).await {
        Ok(current) => {
            for line in render::current(&current) {
                writeln!(out, "  {line}")?;
            }
            if let Some(condition) = current.primary_condition() {
                icon_codes.push(condition.icon.clone());
            }
        }
        Err(e) => {
            error!(error = %e, "current weather request failed");
            writeln!(out, "  {}", render::LOAD_ERROR)?;
        }
    }

    match provider.forecast(location).await {
        Ok(series) => {
            writeln!(out)?;
            for sample in series.first_days(days) {
                writeln!(out, "  {}", render::forecast_row(sample, &Local))?;
                if let Some(condition) = sample.primary_condition() {
                    icon_codes.push(condition.icon.clone());
                }
            }
        }
        Err(e) => error!(error = %e, "forecast request failed"),
    }

    if icon_codes.is_empty() {
        return Ok(());
    }

    let icons = fetch_icons(Arc::clone(&provider), icon_codes).await;

    let mut codes: Vec<&String> = icons.keys().collect();
    codes.sort();

    if let Some(dir) = icons_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create icon directory: {}", dir.display()))?;
    }

    for code in codes {
        match &icons[code] {
            Ok(icon) => match icons_dir {
                Some(dir) => {
                    let path = dir.join(icon.file_name());
                    match tokio::fs::write(&path, &icon.bytes).await {
                        Ok(()) => info!(code = %code, path = %path.display(), "icon saved"),
                        Err(e) => warn!(code = %code, error = %e, "failed to write icon"),
                    }
                }
                None => info!(code = %code, len = icon.bytes.len(), "icon loaded"),
            },
            Err(e) => warn!(code = %code, error = %e, "icon request failed"),
        }
    }

    Ok(())
}
