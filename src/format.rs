//! Display helpers for timestamps and counters.

use chrono::{DateTime, Utc};

const UNITS: [(&str, i64); 7] = [
    ("year", 365 * 24 * 60 * 60),
    ("month", 30 * 24 * 60 * 60),
    ("week", 7 * 24 * 60 * 60),
    ("day", 24 * 60 * 60),
    ("hour", 60 * 60),
    ("minute", 60),
    ("second", 1),
];

/// Relative time of `created` seen from `now`, such as `3 months ago`.
///
/// The largest unit with a non-zero count wins. Future dates read as
/// `0 seconds ago`.
pub fn timestamp(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds().max(0);

    let (unit, n) = UNITS
        .iter()
        .map(|(unit, len)| (*unit, secs / len))
        .find(|(_, n)| *n > 0)
        .unwrap_or(("second", 0));

    match n {
        1 => format!("1 {} ago", unit),
        n => format!("{} {}s ago", n, unit),
    }
}

/// `1.5M`, `2.3K` or the number itself. Halves round up.
pub fn abbreviate(n: u64) -> String {
    let tenths = |unit: u64| (n + unit / 20) / (unit / 10);

    match n {
        n if n >= 1_000_000 => {
            let t = tenths(1_000_000);
            format!("{}.{}M", t / 10, t % 10)
        },
        n if n >= 1_000 => {
            let t = tenths(1_000);
            format!("{}.{}K", t / 10, t % 10)
        },
        n => n.to_string(),
    }
}

/// `Month YYYY`.
pub fn joined_date(date: DateTime<Utc>) -> String { date.format("%B %Y").to_string() }

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn ago(d: Duration) -> String {
        let now = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
        timestamp(now - d, now)
    }

    #[test]
    fn largest_unit_wins() {
        assert_eq!(ago(Duration::days(90)), "3 months ago");
        assert_eq!(ago(Duration::days(400)), "1 year ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
        assert_eq!(ago(Duration::days(14)), "2 weeks ago");
        assert_eq!(ago(Duration::days(1)), "1 day ago");
        assert_eq!(ago(Duration::minutes(59)), "59 minutes ago");
        assert_eq!(ago(Duration::seconds(1)), "1 second ago");
        assert_eq!(ago(Duration::zero()), "0 seconds ago");
    }

    #[test]
    fn abbreviates_large_numbers() {
        assert_eq!(abbreviate(1_500_000), "1.5M");
        assert_eq!(abbreviate(2_340), "2.3K");
        assert_eq!(abbreviate(1_000), "1.0K");
        assert_eq!(abbreviate(150), "150");
    }

    #[test]
    fn abbreviation_rounds_halves_up() {
        assert_eq!(abbreviate(1_250), "1.3K");
        assert_eq!(abbreviate(2_250), "2.3K");
        assert_eq!(abbreviate(1_249), "1.2K");
        assert_eq!(abbreviate(1_250_000), "1.3M");
        assert_eq!(abbreviate(999_999), "1000.0K");
    }

    #[test]
    fn joined_date_is_month_and_year() {
        let d = Utc.with_ymd_and_hms(2021, 3, 14, 0, 0, 0).unwrap();
        assert_eq!(joined_date(d), "March 2021");
    }
}
