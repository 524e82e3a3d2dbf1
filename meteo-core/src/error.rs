pub use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by weather providers.
///
/// Every operation surfaces one of these to the caller; nothing is retried.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP exchange itself failed: DNS, connect, timeout or body read.
    #[error("request to weather service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with something other than 200.
    #[error("weather service returned status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// The response body did not match the expected JSON shape.
    #[error("failed to decode weather service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    /// HTTP status carried by an `UpstreamStatus` error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WeatherError::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
