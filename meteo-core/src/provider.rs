use crate::{
    Config, CurrentWeather, ForecastSeries, IconBytes, WeatherError,
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// What a presentation layer needs from a weather source.
///
/// Implementations hold no mutable state and may be called concurrently.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, location: &str) -> Result<CurrentWeather, WeatherError>;

    /// One sample per local day, see [`crate::forecast::daily_samples`].
    async fn forecast(&self, location: &str) -> Result<ForecastSeries, WeatherError>;

    async fn icon(&self, code: &str) -> Result<IconBytes, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let settings = config.client_settings()?;
    let client = OpenWeatherClient::new(settings)?;
    Ok(Box::new(client))
}
