use chrono::{NaiveDate, TimeZone};

use crate::model::ForecastSample;

/// Maximum number of days shown from a forecast.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Collapse a forecast to one sample per calendar date in `tz`.
///
/// The first sample encountered for each date wins; dates keep the order in
/// which they first appear, and at most [`MAX_FORECAST_DAYS`] are returned.
pub fn daily_samples<'a, Tz: TimeZone>(
    samples: &'a [ForecastSample],
    tz: &Tz,
) -> Vec<(NaiveDate, &'a ForecastSample)> {
    let mut days: Vec<(NaiveDate, &ForecastSample)> = Vec::with_capacity(MAX_FORECAST_DAYS);

    for sample in samples {
        let date = sample.time.with_timezone(tz).date_naive();
        if days.iter().any(|(seen, _)| *seen == date) {
            continue;
        }
        days.push((date, sample));
    }

    days.truncate(MAX_FORECAST_DAYS);
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};

    fn sample(ts: i64, temp: f64) -> ForecastSample {
        ForecastSample {
            time: DateTime::<Utc>::from_timestamp(ts, 0).unwrap(),
            temperature_c: temp,
            description: "clear sky".into(),
            icon: "01d".into(),
            humidity_pct: 50,
            wind_speed_mps: 1.0,
        }
    }

    // 2024-03-01T00:00:00Z
    const DAY0: i64 = 1_709_251_200;
    const HOUR: i64 = 3600;
    const DAY: i64 = 24 * HOUR;

    #[test]
    fn three_dates_yield_three_groups_of_earliest_samples() {
        let samples = vec![
            sample(DAY0 + 3 * HOUR, 1.0),
            sample(DAY0 + 6 * HOUR, 2.0),
            sample(DAY0 + DAY, 3.0),
            sample(DAY0 + DAY + 9 * HOUR, 4.0),
            sample(DAY0 + 2 * DAY + 12 * HOUR, 5.0),
            sample(DAY0 + 2 * DAY + 15 * HOUR, 6.0),
        ];

        let days = daily_samples(&samples, &Utc);
        let temps: Vec<f64> = days.iter().map(|(_, s)| s.temperature_c).collect();

        assert_eq!(days.len(), 3);
        assert_eq!(temps, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn keeps_at_most_five_days() {
        let samples: Vec<_> = (0..8).map(|d| sample(DAY0 + d * DAY, d as f64)).collect();

        let days = daily_samples(&samples, &Utc);

        assert_eq!(days.len(), MAX_FORECAST_DAYS);
        assert_eq!(days[4].1.temperature_c, 4.0);
    }

    #[test]
    fn grouping_uses_the_given_timezone() {
        // 23:00Z and 01:00Z next day are the same date at UTC-2.
        let samples = vec![
            sample(DAY0 + 23 * HOUR, 1.0),
            sample(DAY0 + DAY + HOUR, 2.0),
        ];

        let utc_days = daily_samples(&samples, &Utc);
        let west = FixedOffset::west_opt(2 * 3600).unwrap();
        let west_days = daily_samples(&samples, &west);

        assert_eq!(utc_days.len(), 2);
        assert_eq!(west_days.len(), 1);
        assert_eq!(west_days[0].1.temperature_c, 1.0);
    }

    #[test]
    fn empty_forecast_yields_no_days() {
        assert!(daily_samples(&[], &Utc).is_empty());
    }
}
