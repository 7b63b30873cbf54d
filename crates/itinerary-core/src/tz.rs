//! Timezone handling for displayed timestamps.
//!
//! Completion timestamps are stored in UTC and shown in the traveller's
//! wall-clock time.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{ItineraryError, Result};

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use itinerary_core::tz::parse_tz;
///
/// let tz = parse_tz("Europe/Paris").unwrap();
/// assert_eq!(tz.to_string(), "Europe/Paris");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ItineraryError::InvalidTimezone(name.to_string()))
}

/// Format a UTC instant as local "YYYY-MM-DD HH:MM".
pub fn format_local(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}
