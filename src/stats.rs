//! Activity aggregation: running totals, best day, best week.
//!
//! All functions here are pure: they recompute their result from the
//! full (pre-filtered) record collection on every call, with no caching
//! or cross-call state. Records missing a numeric measure contribute 0;
//! records missing a date are skipped by the calendar bucketing.
//!
//! Day and week buckets are kept in insertion order, and a best bucket is
//! selected by strict-greater comparison against a maximum seeded at 0.
//! The first bucket to reach the maximum therefore wins ties, matching
//! the dashboard's historical behavior.
//!
//! ## Example
//! ```rust
//! use activity_stats::{find_best_day, ActivityRecord};
//!
//! let records = vec![
//!     ActivityRecord {
//!         date: Some("2025-01-01".to_string()),
//!         elevation_gain_m: 500.0,
//!         ..Default::default()
//!     },
//!     ActivityRecord {
//!         date: Some("2025-01-01T17:30:00".to_string()),
//!         elevation_gain_m: 300.0,
//!         ..Default::default()
//!     },
//! ];
//!
//! let best = find_best_day(&records).unwrap();
//! assert_eq!(best.date, "1er janvier 2025");
//! assert_eq!(best.elevation, 800.0);
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::display::format_date_fr;
use crate::ActivityRecord;

/// Dashboard headline totals, pre-rounded for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of elevation gain in meters.
    pub total_elevation: f64,
    /// Number of records in the collection.
    pub activity_count: usize,
    /// Sum of distance in kilometers, rounded to 2 decimal places.
    pub total_distance_km: f64,
    /// Sum of moving time in hours, rounded to the nearest integer.
    pub total_time_h: f64,
}

/// The calendar day with the highest cumulative elevation gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestDay {
    /// French long-form date, e.g. `1er janvier 2025`.
    pub date: String,
    /// Cumulative elevation gain in meters.
    pub elevation: f64,
}

/// The week with the highest cumulative elevation gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestWeek {
    /// Span of observed activity dates, `"{min} - {max}"` in French
    /// long form.
    pub period: String,
    /// Cumulative elevation gain in meters.
    pub elevation: f64,
}

/// Compute headline totals over the full record collection.
///
/// Empty input yields all-zero totals, not an error.
pub fn summarize(records: &[ActivityRecord]) -> Totals {
    let total_elevation: f64 = records.iter().map(|r| r.elevation_gain_m).sum();
    let total_distance_m: f64 = records.iter().map(|r| r.distance_m).sum();
    let total_time_s: f64 = records.iter().map(|r| r.moving_time_s).sum();

    Totals {
        total_elevation,
        activity_count: records.len(),
        total_distance_km: round2(total_distance_m / 1000.0),
        total_time_h: (total_time_s / 3600.0).round(),
    }
}

/// Find the calendar day with the highest cumulative elevation gain.
///
/// Records are bucketed by the date portion of their timestamp; records
/// without a parseable date are skipped. Returns `None` when no day has
/// elevation above 0.
pub fn find_best_day(records: &[ActivityRecord]) -> Option<BestDay> {
    let mut buckets: Vec<(NaiveDate, f64)> = Vec::new();

    for record in records {
        let Some(day) = record.date.as_deref().and_then(parse_day) else {
            continue;
        };
        match buckets.iter_mut().find(|(d, _)| *d == day) {
            Some((_, elevation)) => *elevation += record.elevation_gain_m,
            None => buckets.push((day, record.elevation_gain_m)),
        }
    }

    let mut best: Option<(NaiveDate, f64)> = None;
    let mut best_elevation = 0.0;
    for &(day, elevation) in &buckets {
        if elevation > best_elevation {
            best_elevation = elevation;
            best = Some((day, elevation));
        }
    }

    best.map(|(day, elevation)| BestDay {
        date: format_date_fr(day),
        elevation,
    })
}

/// Per-week accumulator: elevation plus the observed timestamp span.
struct WeekBucket {
    elevation: f64,
    min: NaiveDateTime,
    max: NaiveDateTime,
}

/// Find the week with the highest cumulative elevation gain.
///
/// Weeks are keyed `{year}-{week}` using the dashboard's historical
/// week-number formula (see [`week_number`]); the min/max timestamps
/// observed per week label the period but never affect bucket identity.
/// Returns `None` when no week has elevation above 0.
pub fn find_best_week(records: &[ActivityRecord]) -> Option<BestWeek> {
    let mut buckets: Vec<(String, WeekBucket)> = Vec::new();

    for record in records {
        let Some(timestamp) = record.date.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let key = format!(
            "{}-{}",
            timestamp.year(),
            week_number(timestamp.date())
        );
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => {
                bucket.elevation += record.elevation_gain_m;
                if timestamp < bucket.min {
                    bucket.min = timestamp;
                }
                if timestamp > bucket.max {
                    bucket.max = timestamp;
                }
            }
            None => buckets.push((
                key,
                WeekBucket {
                    elevation: record.elevation_gain_m,
                    min: timestamp,
                    max: timestamp,
                },
            )),
        }
    }

    let mut best: Option<&WeekBucket> = None;
    let mut best_elevation = 0.0;
    for (_, bucket) in &buckets {
        if bucket.elevation > best_elevation {
            best_elevation = bucket.elevation;
            best = Some(bucket);
        }
    }

    best.map(|bucket| BestWeek {
        period: format!(
            "{} - {}",
            format_date_fr(bucket.min.date()),
            format_date_fr(bucket.max.date())
        ),
        elevation: bucket.elevation,
    })
}

/// Week number within the year, counted from 1.
///
/// `ceil((days_since_jan_1 + weekday_of_jan_1 + 1) / 7)` with Sunday-based
/// weekdays and whole-day counting. This is the dashboard's historical
/// formula, kept as-is: it is not ISO-8601 week numbering and is not
/// corrected near year boundaries.
pub fn week_number(date: NaiveDate) -> u32 {
    let jan_1 = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .expect("January 1st exists in every year");
    let days_since_jan_1 = date.ordinal0();
    let jan_1_weekday = jan_1.weekday().num_days_from_sunday();
    let numerator = days_since_jan_1 + jan_1_weekday + 1;
    numerator.div_ceil(7)
}

/// Parse the calendar-date portion of an ISO-8601 timestamp.
fn parse_day(date: &str) -> Option<NaiveDate> {
    let day_part = date.split('T').next()?;
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Parse a full ISO-8601 timestamp; date-only input maps to midnight.
fn parse_timestamp(date: &str) -> Option<NaiveDateTime> {
    let trimmed = date.strip_suffix('Z').unwrap_or(date);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| parse_day(trimmed).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, elevation: f64) -> ActivityRecord {
        ActivityRecord {
            athlete_id: "1".to_string(),
            date: Some(date.to_string()),
            elevation_gain_m: elevation,
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize_empty() {
        let totals = summarize(&[]);
        assert_eq!(totals.total_elevation, 0.0);
        assert_eq!(totals.activity_count, 0);
        assert_eq!(totals.total_distance_km, 0.0);
        assert_eq!(totals.total_time_h, 0.0);
    }

    #[test]
    fn test_summarize_rounding() {
        let records = vec![
            ActivityRecord {
                distance_m: 12345.0,
                moving_time_s: 5000.0,
                elevation_gain_m: 400.0,
                ..Default::default()
            },
            ActivityRecord {
                distance_m: 111.0,
                moving_time_s: 400.0,
                ..Default::default()
            },
        ];
        let totals = summarize(&records);
        assert_eq!(totals.activity_count, 2);
        assert_eq!(totals.total_elevation, 400.0);
        assert_eq!(totals.total_distance_km, 12.46);
        // 5400s = 1.5h rounds to 2h
        assert_eq!(totals.total_time_h, 2.0);
    }

    #[test]
    fn test_best_day_sums_per_calendar_day() {
        let records = vec![
            record("2025-01-01", 500.0),
            record("2025-01-01", 300.0),
            record("2025-01-02", 200.0),
        ];
        let best = find_best_day(&records).unwrap();
        assert_eq!(best.date, "1er janvier 2025");
        assert_eq!(best.elevation, 800.0);
    }

    #[test]
    fn test_best_day_ignores_time_of_day() {
        let records = vec![
            record("2025-03-15T06:00:00", 400.0),
            record("2025-03-15T18:00:00", 400.0),
        ];
        let best = find_best_day(&records).unwrap();
        assert_eq!(best.date, "15 mars 2025");
        assert_eq!(best.elevation, 800.0);
    }

    #[test]
    fn test_best_day_tie_first_encountered_wins() {
        // The later calendar date appears first in the input; insertion
        // order decides the tie, not date order.
        let records = vec![
            record("2025-06-10", 800.0),
            record("2025-02-01", 800.0),
        ];
        let best = find_best_day(&records).unwrap();
        assert_eq!(best.date, "10 juin 2025");
    }

    #[test]
    fn test_best_day_none_without_elevation() {
        assert_eq!(find_best_day(&[]), None);
        assert_eq!(find_best_day(&[record("2025-01-01", 0.0)]), None);
    }

    #[test]
    fn test_best_day_skips_dateless_records() {
        let records = vec![
            ActivityRecord {
                elevation_gain_m: 9999.0,
                ..Default::default()
            },
            record("2025-05-04", 100.0),
        ];
        let best = find_best_day(&records).unwrap();
        assert_eq!(best.elevation, 100.0);
    }

    #[test]
    fn test_week_number_formula() {
        // 2025-01-01 is a Wednesday: Jan 1 weekday (Sunday-based) = 3.
        let jan_1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(week_number(jan_1), 1);

        // 2025-01-04 (Saturday) closes the first week: (3+3+1)/7 = 1.
        let jan_4 = NaiveDate::from_ymd_opt(2025, 1, 4).unwrap();
        assert_eq!(week_number(jan_4), 1);

        // 2025-01-05 (Sunday) opens the second: ceil((4+3+1)/7) = 2.
        let jan_5 = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(week_number(jan_5), 2);

        let dec_31 = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(week_number(dec_31), 53);
    }

    #[test]
    fn test_best_week_labels_observed_span() {
        // Both activities land in 2025 week 2 (Jan 5 - Jan 11).
        let records = vec![
            record("2025-01-06T09:00:00", 600.0),
            record("2025-01-09T10:00:00", 700.0),
            record("2025-01-20", 300.0),
        ];
        let best = find_best_week(&records).unwrap();
        assert_eq!(best.elevation, 1300.0);
        assert_eq!(best.period, "6 janvier 2025 - 9 janvier 2025");
    }

    #[test]
    fn test_best_week_single_activity_span() {
        let records = vec![record("2025-01-01", 250.0)];
        let best = find_best_week(&records).unwrap();
        assert_eq!(best.period, "1er janvier 2025 - 1er janvier 2025");
    }

    #[test]
    fn test_best_week_tie_first_encountered_wins() {
        let records = vec![
            record("2025-06-10", 800.0),
            record("2025-02-03", 800.0),
        ];
        let best = find_best_week(&records).unwrap();
        assert_eq!(best.period, "10 juin 2025 - 10 juin 2025");
    }

    #[test]
    fn test_best_week_none_without_elevation() {
        assert_eq!(find_best_week(&[]), None);
        assert_eq!(find_best_week(&[record("2025-01-01", 0.0)]), None);
    }
}
