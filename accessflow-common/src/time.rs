//! Timestamp utilities

use chrono::{DateTime, Months, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Calendar date one year after `from`
///
/// Feb 29 clamps to Feb 28 in non-leap years.
pub fn one_year_after(from: DateTime<Utc>) -> NaiveDate {
    let date = from.date_naive();
    date.checked_add_months(Months::new(12)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_millis_to_duration() {
        assert_eq!(millis_to_duration(0), Duration::ZERO);
        assert_eq!(millis_to_duration(300), Duration::from_millis(300));
        assert_eq!(millis_to_duration(8000), Duration::from_secs(8));
    }

    #[test]
    fn test_one_year_after_regular_date() {
        let from = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        assert_eq!(
            one_year_after(from),
            NaiveDate::from_ymd_opt(2027, 10, 17).unwrap()
        );
    }

    #[test]
    fn test_one_year_after_leap_day_clamps() {
        let from = Utc.with_ymd_and_hms(2028, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(
            one_year_after(from),
            NaiveDate::from_ymd_opt(2029, 2, 28).unwrap()
        );
    }
}
