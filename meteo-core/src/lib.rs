//! Core library for the `meteo` weather viewer.
//!
//! This crate defines:
//! - The OpenWeatherMap client (current conditions, forecast, icons)
//! - Reduction of the 3-hourly forecast feed to one sample per day
//! - Concurrent icon loading keyed by icon code
//! - Configuration & credentials handling
//!
//! It is used by `meteo-cli`, but any front end can consume the
//! [`WeatherProvider`] trait and the plain records in [`model`].

pub mod config;
pub mod error;
pub mod forecast;
pub mod icons;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::daily_samples;
pub use icons::fetch_icons;
pub use model::{Condition, CurrentWeather, ForecastSample, ForecastSeries, IconBytes, Temperature};
pub use provider::{
    WeatherProvider,
    openweather::{ClientSettings, OpenWeatherClient},
    provider_from_config,
};
