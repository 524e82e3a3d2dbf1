//! Reduction of the 3-hourly forecast feed to one sample per day.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use tracing::debug;

use crate::model::{ForecastSample, ForecastSeries};

/// First local hour a sample may have to represent its day.
pub const NOON: u32 = 12;

/// Keep, for each local calendar day, the first sample at or after noon.
///
/// Single pass in input order. A day whose samples all fall before noon
/// contributes nothing. This is "first at/after noon", not "closest to noon":
/// on an hour-ascending feed the two coincide.
pub fn daily_samples<I, Tz>(samples: I, tz: &Tz) -> ForecastSeries
where
    I: IntoIterator<Item = ForecastSample>,
    Tz: TimeZone,
{
    let mut claimed: HashSet<NaiveDate> = HashSet::new();
    let mut kept = Vec::new();

    for sample in samples {
        let Some(local) = DateTime::from_timestamp(sample.timestamp, 0).map(|t| t.with_timezone(tz))
        else {
            debug!(timestamp = sample.timestamp, "skipping forecast sample with out-of-range timestamp");
            continue;
        };

        if local.hour() >= NOON && claimed.insert(local.date_naive()) {
            kept.push(sample);
        }
    }

    ForecastSeries::from_filtered(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Temperature};
    use chrono::{Datelike, FixedOffset, Utc};

    fn at(day: u32, hour: u32, temp: f64) -> ForecastSample {
        let ts = Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap().timestamp();
        ForecastSample {
            timestamp: ts,
            temperature: Temperature(temp),
            conditions: vec![Condition { description: "nuageux".into(), icon: "04d".into() }],
        }
    }

    fn hours(series: &ForecastSeries) -> Vec<(u32, u32)> {
        series
            .iter()
            .map(|s| {
                let t = s.time().unwrap();
                (t.day(), t.hour())
            })
            .collect()
    }

    #[test]
    fn keeps_first_afternoon_sample_per_day() {
        let input = vec![at(1, 9, 14.0), at(1, 15, 20.0), at(2, 13, 18.0), at(2, 18, 16.0)];

        let series = daily_samples(input, &Utc);

        assert_eq!(hours(&series), vec![(1, 15), (2, 13)]);
        let temps: Vec<f64> = series.iter().map(|s| s.temperature.celsius()).collect();
        assert_eq!(temps, vec![20.0, 18.0]);
    }

    #[test]
    fn morning_only_day_is_dropped() {
        let series = daily_samples(vec![at(1, 6, 9.0), at(1, 8, 11.0)], &Utc);
        assert!(series.is_empty());
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = daily_samples(Vec::new(), &Utc);
        assert!(series.is_empty());
    }

    #[test]
    fn noon_exactly_is_kept() {
        let series = daily_samples(vec![at(3, 12, 21.0)], &Utc);
        assert_eq!(hours(&series), vec![(3, 12)]);
    }

    #[test]
    fn first_match_wins_even_if_later_is_closer_to_noon() {
        // Non-chronological feed: 21:00 arrives before 12:00 for the same day.
        let series = daily_samples(vec![at(4, 21, 15.0), at(4, 12, 22.0)], &Utc);

        assert_eq!(series.len(), 1);
        assert_eq!(series.as_slice()[0].temperature, Temperature(15.0));
    }

    #[test]
    fn refiltering_is_idempotent() {
        let mut input = Vec::new();
        for day in 1..=5 {
            for hour in (0..24).step_by(3) {
                input.push(at(day, hour, f64::from(hour)));
            }
        }

        let once = daily_samples(input, &Utc);
        let twice = daily_samples(once.clone().into_vec(), &Utc);

        assert_eq!(once.len(), 5);
        assert_eq!(once, twice);
    }

    #[test]
    fn at_most_one_sample_per_day_and_all_after_noon() {
        let mut input = Vec::new();
        for day in 1..=6 {
            for hour in (0..24).step_by(3) {
                input.push(at(day, hour, 0.0));
            }
        }
        let distinct_days = 6;

        let series = daily_samples(input, &Utc);

        assert!(series.len() <= distinct_days);
        let mut days: Vec<u32> = series.iter().map(|s| s.time().unwrap().day()).collect();
        days.dedup();
        assert_eq!(days.len(), series.len());
        assert!(series.iter().all(|s| s.time().unwrap().hour() >= NOON));
    }

    #[test]
    fn day_and_hour_follow_the_given_zone() {
        // 10:00 UTC is 12:00 at UTC+2, 23:00 UTC is 01:00 the next day.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let input = vec![at(1, 10, 17.0), at(1, 23, 12.0), at(2, 11, 19.0)];

        let series = daily_samples(input.clone(), &plus_two);
        let local: Vec<(u32, u32)> = series
            .iter()
            .map(|s| {
                let t = s.time().unwrap().with_timezone(&plus_two);
                (t.day(), t.hour())
            })
            .collect();
        assert_eq!(local, vec![(1, 12), (2, 13)]);

        // In UTC the only afternoon sample is 23:00 on day 1.
        assert_eq!(hours(&daily_samples(input, &Utc)), vec![(1, 23)]);
    }

    #[test]
    fn out_of_range_timestamp_is_skipped() {
        let mut bad = at(1, 15, 0.0);
        bad.timestamp = i64::MAX;

        let series = daily_samples(vec![bad, at(1, 16, 5.0)], &Utc);

        assert_eq!(hours(&series), vec![(1, 16)]);
    }
}
