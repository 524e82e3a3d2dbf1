use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    forecast::daily_samples,
    model::{Condition, CurrentWeather, ForecastSample, ForecastSeries, IconBytes, Temperature},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_LANG: &str = "fr";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const UNITS: &str = "metric";

/// Everything needed to talk to OpenWeatherMap.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub icon_base_url: String,
    pub lang: String,
    pub timeout: Duration,
}

impl ClientSettings {
    /// Settings for the public endpoints with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            icon_base_url: DEFAULT_ICON_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// OpenWeatherMap client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    settings: ClientSettings,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(settings: ClientSettings) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { settings, http })
    }

    /// `GET <base>/<endpoint>?q=..&appid=..&units=metric&lang=..`, location percent-encoded.
    fn endpoint_request(&self, endpoint: &str, location: &str) -> Result<Request, WeatherError> {
        let url = format!("{}/{endpoint}", self.settings.base_url.trim_end_matches('/'));

        let request = self
            .http
            .get(url)
            .query(&[
                ("q", location),
                ("appid", self.settings.api_key.as_str()),
                ("units", UNITS),
                ("lang", self.settings.lang.as_str()),
            ])
            .build()?;

        Ok(request)
    }

    fn icon_url(&self, code: &str) -> String {
        format!("{}/{code}@2x.png", self.settings.icon_base_url.trim_end_matches('/'))
    }

    /// Sends the request and returns the body of a 200 response.
    async fn fetch_json_body(&self, request: Request) -> Result<String, WeatherError> {
        debug!(url = %redacted(request.url()), "requesting weather service");

        let res = self.http.execute(request).await?;
        let status = res.status();

        if status != StatusCode::OK {
            // The status alone decides the error; the body is only an excerpt.
            let body = res.text().await.unwrap_or_default();
            return Err(WeatherError::UpstreamStatus { status, body: truncate_body(&body) });
        }

        Ok(res.text().await?)
    }

    #[instrument(skip(self))]
    pub async fn fetch_current_weather(&self, location: &str) -> Result<CurrentWeather, WeatherError> {
        let request = self.endpoint_request("weather", location)?;
        let body = self.fetch_json_body(request).await?;

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        Ok(parsed.into())
    }

    #[instrument(skip(self))]
    pub async fn fetch_forecast(&self, location: &str) -> Result<ForecastSeries, WeatherError> {
        let request = self.endpoint_request("forecast", location)?;
        let body = self.fetch_json_body(request).await?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)?;
        let raw_len = parsed.list.len();

        let series = daily_samples(parsed.list.into_iter().map(ForecastSample::from), &Local);
        debug!(raw_len, days = series.len(), "forecast reduced to daily samples");

        Ok(series)
    }

    /// Raw icon bytes. Any HTTP status is accepted; only transport failures are errors.
    #[instrument(skip(self))]
    pub async fn fetch_icon(&self, code: &str) -> Result<IconBytes, WeatherError> {
        let url = self.icon_url(code);
        debug!(url = %url, "requesting icon");

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;

        if !status.is_success() {
            warn!(%status, code, len = bytes.len(), "icon endpoint returned non-success status");
        }

        Ok(IconBytes { code: code.to_string(), bytes: bytes.to_vec() })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, location: &str) -> Result<CurrentWeather, WeatherError> {
        self.fetch_current_weather(location).await
    }

    async fn forecast(&self, location: &str) -> Result<ForecastSeries, WeatherError> {
        self.fetch_forecast(location).await
    }

    async fn icon(&self, code: &str) -> Result<IconBytes, WeatherError> {
        self.fetch_icon(code).await
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl From<OwWeather> for Condition {
    fn from(w: OwWeather) -> Self {
        Condition { description: w.description, icon: w.icon }
    }
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(r: OwCurrentResponse) -> Self {
        CurrentWeather {
            location_name: r.name,
            conditions: r.weather.into_iter().map(Condition::from).collect(),
            temperature: Temperature(r.main.temp),
        }
    }
}

impl From<OwForecastEntry> for ForecastSample {
    fn from(e: OwForecastEntry) -> Self {
        ForecastSample {
            timestamp: e.dt,
            temperature: Temperature(e.main.temp),
            conditions: e.weather.into_iter().map(Condition::from).collect(),
        }
    }
}

/// URL with the `appid` value masked, for logging.
fn redacted(url: &reqwest::Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
