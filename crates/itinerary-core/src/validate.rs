//! Stop validation.
//!
//! Checks run before the editor accepts a new or edited stop. A failed
//! check rejects the operation; dates are never clamped.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ValidationError;
use crate::models::{Itinerary, Stop, StopId, TimeMode};
use crate::parse::parse_clock_time;

/// Check a stop date against an itinerary's inclusive date range.
///
/// Passes when the stop has no date or either bound is missing.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use itinerary_core::validate::validate_stop_date;
///
/// let d = |m, d| NaiveDate::from_ymd_opt(2024, m, d);
/// assert!(validate_stop_date(d(6, 1), d(6, 1), d(6, 10)).is_ok());
/// assert!(validate_stop_date(d(5, 31), d(6, 1), d(6, 10)).is_err());
/// assert!(validate_stop_date(d(5, 31), None, d(6, 10)).is_ok());
/// ```
pub fn validate_stop_date(
    date: Option<NaiveDate>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    let (Some(date), Some(start), Some(end)) = (date, start, end) else {
        return Ok(());
    };

    if date < start || date > end {
        return Err(ValidationError::DateOutOfRange { date, start, end });
    }

    Ok(())
}

/// Check that an itinerary's end date is not before its start date.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(ValidationError::InvalidDateRange { start, end })
        }
        _ => Ok(()),
    }
}

/// Run every entry-time check for a stop: name, time format, date range.
pub fn validate_stop(
    stop: &Stop,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if stop.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }

    // A stale time in bucket mode is ignored, so it is not checked either.
    if stop.time_mode == TimeMode::Fixed {
        if let Some(time) = stop.time.as_deref().filter(|t| !t.is_empty()) {
            parse_clock_time(time)?;
        }
    }

    validate_stop_date(stop.date, start, end)
}

/// A stored stop that fails the entry-time checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub stop_id: StopId,
    pub stop_name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: ValidationError,
}

fn serialize_display<S: serde::Serializer>(
    error: &ValidationError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Audit stored stops.
///
/// Existing data may drift out of range after the itinerary dates change;
/// this reports it without repairing anything.
pub fn find_violations(itinerary: &Itinerary) -> Vec<Violation> {
    itinerary
        .stops
        .iter()
        .filter_map(|stop| {
            validate_stop(stop, itinerary.start_date, itinerary.end_date)
                .err()
                .map(|error| Violation {
                    stop_id: stop.id.clone(),
                    stop_name: stop.name.clone(),
                    error,
                })
        })
        .collect()
}
