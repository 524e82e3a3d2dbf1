use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(pub f64);

impl Temperature {
    pub fn celsius(self) -> f64 {
        self.0
    }

    /// Whole-degree rendering, e.g. `18 °C`.
    pub fn rounded(self) -> String {
        format!("{:.0} °C", self.0)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} °C", self.0)
    }
}

/// A weather description plus the short icon code the upstream attaches to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub conditions: Vec<Condition>,
    pub temperature: Temperature,
}

impl CurrentWeather {
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}

/// One forecast time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp, seconds.
    pub timestamp: i64,
    pub temperature: Temperature,
    pub conditions: Vec<Condition>,
}

impl ForecastSample {
    /// `None` when the timestamp is outside chrono's representable range.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}

/// Forecast holding at most one sample per local calendar day, in upstream order.
///
/// Built by [`crate::forecast::daily_samples`]; there is no other public constructor,
/// so the one-per-day invariant always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    pub(crate) fn from_filtered(samples: Vec<ForecastSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastSample> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[ForecastSample] {
        &self.samples
    }

    /// The first `n` days of the series.
    pub fn first_days(&self, n: usize) -> &[ForecastSample] {
        &self.samples[..n.min(self.samples.len())]
    }

    /// Distinct primary icon codes, in series order.
    pub fn icon_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for code in self.samples.iter().filter_map(|s| s.primary_condition()).map(|c| &c.icon) {
            if !codes.contains(code) {
                codes.push(code.clone());
            }
        }
        codes
    }

    pub fn into_vec(self) -> Vec<ForecastSample> {
        self.samples
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a ForecastSample;
    type IntoIter = std::slice::Iter<'a, ForecastSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Raw icon image, keyed by the code it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBytes {
    pub code: String,
    pub bytes: Vec<u8>,
}

impl IconBytes {
    /// File name the icon is conventionally stored under.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: i64, icon: &str) -> ForecastSample {
        ForecastSample {
            timestamp: ts,
            temperature: Temperature(10.0),
            conditions: vec![Condition { description: "ciel dégagé".into(), icon: icon.into() }],
        }
    }

    #[test]
    fn temperature_formats() {
        assert_eq!(Temperature(12.34).to_string(), "12.3 °C");
        assert_eq!(Temperature(17.6).rounded(), "18 °C");
        assert_eq!(Temperature(-0.2).to_string(), "-0.2 °C");
    }

    #[test]
    fn icon_codes_are_distinct_and_ordered() {
        let series = ForecastSeries::from_filtered(vec![
            sample(1, "04d"),
            sample(2, "01d"),
            sample(3, "04d"),
        ]);

        assert_eq!(series.icon_codes(), vec!["04d".to_string(), "01d".to_string()]);
    }

    #[test]
    fn first_days_clamps_to_len() {
        let series = ForecastSeries::from_filtered(vec![sample(1, "01d"), sample(2, "02d")]);

        assert_eq!(series.first_days(5).len(), 2);
        assert_eq!(series.first_days(1)[0].timestamp, 1);
        assert!(series.first_days(0).is_empty());
    }

    #[test]
    fn sample_time_from_unix_seconds() {
        let s = sample(1_700_000_000, "01d");
        let t = s.time().expect("timestamp in range");
        assert_eq!(t.format("%Y-%m-%d %H:%M").to_string(), "2023-11-14 22:13");
    }

    #[test]
    fn current_weather_without_conditions() {
        let current = CurrentWeather {
            location_name: "Paris".into(),
            conditions: vec![],
            temperature: Temperature(3.0),
        };
        assert!(current.primary_condition().is_none());
    }
}
