//! RR registration number generation.
//!
//! Minted once, at front-desk validation: `RR` + two-digit year + two-digit
//! month + four-digit daily sequence. The sequence is the count of
//! applications already validated that UTC day plus one, read inside the
//! validation transaction. The counter resets daily and is not serialized
//! across concurrent validations; see DESIGN.md for the accepted race.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};

/// Format an RR number for a validation at `at` with `prior_same_day`
/// applications already validated that day.
pub fn mint(at: DateTime<Utc>, prior_same_day: i64) -> String {
    format!(
        "RR{:02}{:02}{:04}",
        at.year() % 100,
        at.month(),
        prior_same_day + 1
    )
}

/// UTC day bucket containing `at`: `[start, end)`.
pub fn day_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn fourth_validation_of_the_day() {
        // Three prior same-day validations on 2025-05-10.
        assert_eq!(mint(at("2025-05-10T14:00:00Z"), 3), "RR25050004");
    }

    #[test]
    fn first_validation_of_the_day() {
        assert_eq!(mint(at("2025-01-01T00:00:01Z"), 0), "RR25010001");
    }

    #[test]
    fn year_and_month_are_zero_padded() {
        assert_eq!(mint(at("2031-11-30T23:59:59Z"), 41), "RR31110042");
        assert_eq!(mint(at("2009-02-03T12:00:00Z"), 0), "RR09020001");
    }

    #[test]
    fn sequence_is_four_digits() {
        assert_eq!(mint(at("2025-05-10T14:00:00Z"), 998), "RR25050999");
        assert_eq!(mint(at("2025-05-10T14:00:00Z"), 9998), "RR25059999");
    }

    #[test]
    fn day_bounds_cover_the_utc_day() {
        let (start, end) = day_bounds(at("2025-05-10T14:23:45Z"));
        assert_eq!(start, at("2025-05-10T00:00:00Z"));
        assert_eq!(end, at("2025-05-11T00:00:00Z"));
        assert!(start <= at("2025-05-10T14:23:45Z"));
        assert!(at("2025-05-10T14:23:45Z") < end);
    }
}
