//! Time bucket classification.
//!
//! Maps a clock time to one of the eight day-part buckets and resolves the
//! bucket a stop is displayed under. Boundaries are half-open except for
//! midday, which includes both 11:30 and 13:00:
//!
//! | bucket          | range            |
//! |-----------------|------------------|
//! | early morning   | [05:00, 08:00)   |
//! | morning         | [08:00, 11:30)   |
//! | midday          | [11:30, 13:00]   |
//! | early afternoon | (13:00, 15:30)   |
//! | late afternoon  | [15:30, 18:00)   |
//! | evening         | [18:00, 20:30)   |
//! | night           | [20:30, 24:00)   |
//! | late night      | everything else  |

use chrono::NaiveTime;
use serde::Serialize;

use crate::models::{Stop, TimeBucket, TimeMode};
use crate::parse::{minute_of_day, parse_clock_time};

/// Classify a clock time.
pub fn classify_time(time: NaiveTime) -> TimeBucket {
    match minute_of_day(time) {
        300..480 => TimeBucket::EarlyMorning,
        480..690 => TimeBucket::Morning,
        690..=780 => TimeBucket::Midday,
        781..930 => TimeBucket::EarlyAfternoon,
        930..1080 => TimeBucket::LateAfternoon,
        1080..1230 => TimeBucket::Evening,
        1230..1440 => TimeBucket::Night,
        _ => TimeBucket::LateNight,
    }
}

/// Classify an optional "HH:MM" string.
///
/// Missing or malformed times fall into [`TimeBucket::LateNight`].
///
/// # Examples
///
/// ```
/// use itinerary_core::classify::classify_by_clock_time;
/// use itinerary_core::models::TimeBucket;
///
/// assert_eq!(classify_by_clock_time(Some("11:30")), TimeBucket::Midday);
/// assert_eq!(classify_by_clock_time(Some("11:29")), TimeBucket::Morning);
/// assert_eq!(classify_by_clock_time(None), TimeBucket::LateNight);
/// ```
pub fn classify_by_clock_time(time: Option<&str>) -> TimeBucket {
    time.and_then(|t| parse_clock_time(t).ok())
        .map(classify_time)
        .unwrap_or(TimeBucket::LateNight)
}

/// The bucket a stop is shown under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayBucket {
    Bucket(TimeBucket),
    /// No bucket and no usable clock time.
    Unscheduled,
}

impl DisplayBucket {
    pub fn label(self) -> &'static str {
        match self {
            DisplayBucket::Bucket(bucket) => bucket.label(),
            DisplayBucket::Unscheduled => "Unscheduled",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            DisplayBucket::Bucket(bucket) => bucket.icon(),
            DisplayBucket::Unscheduled => "clock",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            DisplayBucket::Bucket(bucket) => bucket.color(),
            DisplayBucket::Unscheduled => "gray",
        }
    }

    pub fn badge(self) -> BucketBadge {
        BucketBadge {
            key: match self {
                DisplayBucket::Bucket(bucket) => bucket.name(),
                DisplayBucket::Unscheduled => "unscheduled",
            },
            label: self.label(),
            icon: self.icon(),
            color: self.color(),
        }
    }
}

/// Render-ready bucket description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketBadge {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Resolve the bucket a stop is displayed under.
///
/// The current `time_mode` decides which stored field is read first; the
/// other one is only a fallback, so stale values never override the mode.
pub fn resolve_display_bucket(stop: &Stop) -> DisplayBucket {
    let explicit = stop.time_bucket;
    let derived = stop
        .time
        .as_deref()
        .and_then(|t| parse_clock_time(t).ok())
        .map(classify_time);

    let resolved = match stop.time_mode {
        TimeMode::Bucket => explicit.or(derived),
        TimeMode::Fixed => derived.or(explicit),
    };

    resolved.map_or(DisplayBucket::Unscheduled, DisplayBucket::Bucket)
}

/// Short time label for a stop row: the clock time in fixed mode, the
/// bucket label in bucket mode.
pub fn time_label(stop: &Stop) -> String {
    match (stop.time_mode, stop.time.as_deref(), stop.time_bucket) {
        (TimeMode::Fixed, Some(time), _) if parse_clock_time(time).is_ok() => time.to_string(),
        (TimeMode::Bucket, _, Some(bucket)) => bucket.label().to_string(),
        _ => resolve_display_bucket(stop).label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(t: &str) -> TimeBucket {
        classify_by_clock_time(Some(t))
    }

    #[test]
    fn boundaries() {
        assert_eq!(classify("04:59"), TimeBucket::LateNight);
        assert_eq!(classify("05:00"), TimeBucket::EarlyMorning);
        assert_eq!(classify("07:59"), TimeBucket::EarlyMorning);
        assert_eq!(classify("08:00"), TimeBucket::Morning);
        assert_eq!(classify("11:00"), TimeBucket::Morning);
        assert_eq!(classify("11:29"), TimeBucket::Morning);
        assert_eq!(classify("11:30"), TimeBucket::Midday);
        assert_eq!(classify("13:00"), TimeBucket::Midday);
        assert_eq!(classify("13:01"), TimeBucket::EarlyAfternoon);
        assert_eq!(classify("15:29"), TimeBucket::EarlyAfternoon);
        assert_eq!(classify("15:30"), TimeBucket::LateAfternoon);
        assert_eq!(classify("17:59"), TimeBucket::LateAfternoon);
        assert_eq!(classify("18:00"), TimeBucket::Evening);
        assert_eq!(classify("20:29"), TimeBucket::Evening);
        assert_eq!(classify("20:30"), TimeBucket::Night);
        assert_eq!(classify("21:00"), TimeBucket::Night);
        assert_eq!(classify("23:59"), TimeBucket::Night);
        assert_eq!(classify("00:00"), TimeBucket::LateNight);
        assert_eq!(classify("02:00"), TimeBucket::LateNight);
    }

    #[test]
    fn missing_or_malformed_time_is_late_night() {
        assert_eq!(classify_by_clock_time(None), TimeBucket::LateNight);
        assert_eq!(classify("noon"), TimeBucket::LateNight);
    }

    #[test]
    fn explicit_bucket_wins_in_bucket_mode() {
        let mut stop = Stop::new("s1", "Dinner").in_bucket(TimeBucket::Evening);
        stop.time = Some("08:00".to_string());
        assert_eq!(
            resolve_display_bucket(&stop),
            DisplayBucket::Bucket(TimeBucket::Evening)
        );
    }

    #[test]
    fn clock_time_wins_in_fixed_mode() {
        let mut stop = Stop::new("s1", "Breakfast").at("08:15");
        stop.time_bucket = Some(TimeBucket::Night);
        assert_eq!(
            resolve_display_bucket(&stop),
            DisplayBucket::Bucket(TimeBucket::Morning)
        );
    }

    #[test]
    fn stale_bucket_is_used_when_fixed_time_missing() {
        let mut stop = Stop::new("s1", "Walk");
        stop.time_bucket = Some(TimeBucket::Midday);
        assert_eq!(
            resolve_display_bucket(&stop),
            DisplayBucket::Bucket(TimeBucket::Midday)
        );
    }

    #[test]
    fn no_time_information_is_unscheduled() {
        let stop = Stop::new("s1", "Somewhere");
        assert_eq!(resolve_display_bucket(&stop), DisplayBucket::Unscheduled);
        let badge = resolve_display_bucket(&stop).badge();
        assert_eq!(badge.label, "Unscheduled");
        assert_eq!(badge.icon, "clock");
    }

    #[test]
    fn time_labels() {
        assert_eq!(time_label(&Stop::new("a", "A").at("09:30")), "09:30");
        assert_eq!(
            time_label(&Stop::new("b", "B").in_bucket(TimeBucket::LateAfternoon)),
            "Late Afternoon"
        );
        assert_eq!(time_label(&Stop::new("c", "C")), "Unscheduled");
    }
}
