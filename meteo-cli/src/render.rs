//! Plain-text rendering of weather records.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use meteo_core::{CurrentWeather, ForecastSample};

/// Shown in place of the current conditions when they could not be fetched.
pub const LOAD_ERROR: &str = "Failed to load current weather";

/// Upper-case the first letter of every word: `"couvert nuageux"` → `"Couvert Nuageux"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if at_word_start && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }

    out
}

pub fn title(location: &str) -> String {
    format!("Weather for {location}")
}

/// Temperature on the first line, description on the second if there is one.
pub fn current(weather: &CurrentWeather) -> Vec<String> {
    let mut lines = vec![weather.temperature.to_string()];
    if let Some(condition) = weather.primary_condition() {
        lines.push(title_case(&condition.description));
    }
    lines
}

/// Abbreviated weekday and day of month, e.g. `Mon 02`.
pub fn day_label<Tz>(sample: &ForecastSample, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match DateTime::from_timestamp(sample.timestamp, 0) {
        Some(t) => t.with_timezone(tz).format("%a %d").to_string(),
        None => "?".to_string(),
    }
}

pub fn forecast_row<Tz>(sample: &ForecastSample, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let description = sample
        .primary_condition()
        .map(|c| title_case(&c.description))
        .unwrap_or_default();

    format!("{:<8}{:>7}  {description}", day_label(sample, tz), sample.temperature.rounded())
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meteo_core::{Condition, Temperature};

    fn condition(description: &str) -> Condition {
        Condition { description: description.into(), icon: "04d".into() }
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("couvert nuageux"), "Couvert Nuageux");
        assert_eq!(title_case("éclaircies"), "Éclaircies");
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("  légère  pluie"), "  Légère  Pluie");
    }

    #[test]
    fn current_lines() {
        let weather = CurrentWeather {
            location_name: "Lyon".into(),
            conditions: vec![condition("ciel dégagé")],
            temperature: Temperature(21.46),
        };

        assert_eq!(current(&weather), vec!["21.5 °C".to_string(), "Ciel Dégagé".to_string()]);
    }

    #[test]
    fn current_without_condition_shows_temperature_only() {
        let weather = CurrentWeather {
            location_name: "Lyon".into(),
            conditions: vec![],
            temperature: Temperature(4.0),
        };

        assert_eq!(current(&weather), vec!["4.0 °C".to_string()]);
    }

    #[test]
    fn forecast_row_layout() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap().timestamp();
        let sample = ForecastSample {
            timestamp: ts,
            temperature: Temperature(19.6),
            conditions: vec![condition("pluie modérée")],
        };

        assert_eq!(day_label(&sample, &Utc), "Mon 03");
        assert_eq!(forecast_row(&sample, &Utc), "Mon 03    20 °C  Pluie Modérée");
    }
}
