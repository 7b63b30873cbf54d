//! Input parsing for stop fields.
//!
//! This module parses the user-entered strings the engine works with:
//! - clock times (`HH:MM`, 24-hour)
//! - calendar dates (`YYYY-MM-DD`)
//! - bucket names (`earlyMorning`, `early-morning`, `Early Morning`, ...)
//! - RFC3339 timestamps (`2024-06-01T14:05:00Z`)

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::{TIME_BUCKETS, TimeBucket};

/// Parse a 24-hour "HH:MM" clock time.
///
/// Exactly two hour digits, a colon, and two minute digits are accepted.
///
/// # Examples
///
/// ```
/// use itinerary_core::parse::parse_clock_time;
///
/// assert!(parse_clock_time("00:00").is_ok());
/// assert!(parse_clock_time("23:59").is_ok());
/// assert!(parse_clock_time("9:30").is_err());
/// assert!(parse_clock_time("24:00").is_err());
/// ```
pub fn parse_clock_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTime(input.to_string());
    let bytes = input.as_bytes();

    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }

    let hour = two_digits(&bytes[0..2]).ok_or_else(invalid)?;
    let minute = two_digits(&bytes[3..5]).ok_or_else(invalid)?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

fn two_digits(bytes: &[u8]) -> Option<u32> {
    match bytes {
        [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => {
            Some(u32::from(a - b'0') * 10 + u32::from(b - b'0'))
        }
        _ => None,
    }
}

/// Minutes since midnight for a clock time.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}. Expected YYYY-MM-DD", input, e))
}

/// Parse an RFC3339 timestamp into UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid RFC3339 timestamp '{}': {}", input, e))
}

impl FromStr for TimeBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        TIME_BUCKETS
            .iter()
            .find(|info| normalize(info.name) == wanted)
            .map(|info| info.bucket)
            .ok_or_else(|| {
                let names: Vec<&str> = TIME_BUCKETS.iter().map(|info| info.name).collect();
                format!(
                    "Unknown time bucket: '{}'. Expected one of: {}",
                    s,
                    names.join(", ")
                )
            })
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_clock_times() {
        assert_eq!(
            parse_clock_time("09:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert_eq!(
            parse_clock_time("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn parse_invalid_clock_times() {
        for input in ["", "9:30", "0930", "09:3", "24:00", "12:60", "ab:cd", "09-30", " 09:30"] {
            assert_eq!(
                parse_clock_time(input),
                Err(ValidationError::InvalidTime(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn minute_of_day_counts_from_midnight() {
        assert_eq!(minute_of_day(parse_clock_time("00:00").unwrap()), 0);
        assert_eq!(minute_of_day(parse_clock_time("11:30").unwrap()), 690);
        assert_eq!(minute_of_day(parse_clock_time("23:59").unwrap()), 1439);
    }

    #[test]
    fn bucket_from_str_accepts_spellings() {
        assert_eq!(
            TimeBucket::from_str("earlyMorning").unwrap(),
            TimeBucket::EarlyMorning
        );
        assert_eq!(
            TimeBucket::from_str("late-afternoon").unwrap(),
            TimeBucket::LateAfternoon
        );
        assert_eq!(
            TimeBucket::from_str("Late Night").unwrap(),
            TimeBucket::LateNight
        );
        assert!(TimeBucket::from_str("brunch").is_err());
    }

    #[test]
    fn parse_dates() {
        assert_eq!(
            parse_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(parse_date("06/01/2024").is_err());
    }

    #[test]
    fn parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-06-01T14:05:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-06-01T12:05:00+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }
}
