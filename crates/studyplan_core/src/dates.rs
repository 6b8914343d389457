//! crates/studyplan_core/src/dates.rs
//!
//! Calendar arithmetic shared by the scheduler. Everything here works on
//! `NaiveDate`, so time-of-day can never leak into comparisons or keys.

use chrono::{Datelike, Duration, NaiveDate};

use crate::clock::Clock;

/// Day-of-week labels, Sunday first.
pub const DAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Canonical `YYYY-MM-DD` key used for map keys and completion keys.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Absolute whole-day distance between two dates (symmetric in argument
/// order).
pub fn days_between(a: NaiveDate, b: NaiveDate) -> u32 {
    (b - a).num_days().unsigned_abs() as u32
}

/// Sunday-first weekday label for `date`.
pub fn day_of_week(date: NaiveDate) -> &'static str {
    DAY_LABELS[date.weekday().num_days_from_sunday() as usize]
}

/// The Sunday opening the week that contains `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// The Saturday closing the week that contains `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    week_start(date) + Duration::days(6)
}

/// Every date from `start` through `end`, inclusive on both ends.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        dates.push(cursor);
        cursor = cursor + Duration::days(1);
    }
    dates
}

pub fn is_today(date: NaiveDate, clock: &dyn Clock) -> bool {
    date == clock.today()
}

pub fn is_past(date: NaiveDate, clock: &dyn Clock) -> bool {
    date < clock.today()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_date_is_iso_day_key() {
        assert_eq!(format_date(date(2024, 1, 3)), "2024-01-03");
    }

    #[test]
    fn days_between_is_symmetric() {
        let a = date(2024, 1, 1);
        let b = date(2024, 1, 10);
        assert_eq!(days_between(a, b), 9);
        assert_eq!(days_between(b, a), 9);
        assert_eq!(days_between(a, a), 0);
    }

    #[test]
    fn week_bounds_are_sunday_to_saturday() {
        // 2024-01-03 is a Wednesday.
        let wednesday = date(2024, 1, 3);
        assert_eq!(week_start(wednesday), date(2023, 12, 31));
        assert_eq!(week_end(wednesday), date(2024, 1, 6));

        // A Sunday is its own week start.
        let sunday = date(2023, 12, 31);
        assert_eq!(week_start(sunday), sunday);
        assert_eq!(week_end(sunday), date(2024, 1, 6));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let range = date_range(date(2023, 12, 31), date(2024, 1, 6));
        assert_eq!(range.len(), 7);
        assert_eq!(range[0], date(2023, 12, 31));
        assert_eq!(range[6], date(2024, 1, 6));

        assert_eq!(date_range(date(2024, 1, 1), date(2024, 1, 1)).len(), 1);
    }

    #[test]
    fn day_labels_are_sunday_first() {
        assert_eq!(day_of_week(date(2023, 12, 31)), "Sunday");
        assert_eq!(day_of_week(date(2024, 1, 1)), "Monday");
        assert_eq!(day_of_week(date(2024, 1, 6)), "Saturday");
    }

    #[test]
    fn today_and_past_use_date_only_semantics() {
        let clock = FixedClock(date(2024, 1, 5));
        assert!(is_today(date(2024, 1, 5), &clock));
        assert!(!is_today(date(2024, 1, 4), &clock));
        assert!(is_past(date(2024, 1, 4), &clock));
        assert!(!is_past(date(2024, 1, 5), &clock));
        assert!(!is_past(date(2024, 1, 6), &clock));
    }
}
