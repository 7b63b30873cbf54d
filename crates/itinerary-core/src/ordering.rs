//! Ordering of stops within a day.
//!
//! Stops are compared level by level, first non-tie wins:
//! 1. manual order, when both stops have one
//! 2. a stop with a manual order before one without
//! 3. effective sort key ("HH:MM" strings compare correctly as text)
//! 4. name, case-sensitive

use std::cmp::Ordering;

use crate::error::OrderingConflict;
use crate::grouping::DayKey;
use crate::models::{Stop, TimeMode};
use crate::parse::parse_clock_time;

/// Sort key used for stops without any time information.
pub const UNTIMED_SORT_KEY: &str = "23:59";

/// The "HH:MM" string a stop is sorted by when manual order does not decide.
///
/// Fixed mode uses `time`; bucket mode uses the bucket's canonical key even
/// if a stale `time` is stored alongside it. A malformed `time` counts as no
/// time, matching how the stop is displayed.
///
/// # Examples
///
/// ```
/// use itinerary_core::models::{Stop, TimeBucket};
/// use itinerary_core::ordering::effective_sort_key;
///
/// let mut stop = Stop::new("s1", "Dinner").in_bucket(TimeBucket::Evening);
/// stop.time = Some("08:00".to_string());
/// assert_eq!(effective_sort_key(&stop), "19:00");
/// ```
pub fn effective_sort_key(stop: &Stop) -> &str {
    match stop.time_mode {
        TimeMode::Fixed => stop
            .time
            .as_deref()
            .filter(|t| parse_clock_time(t).is_ok())
            .unwrap_or(UNTIMED_SORT_KEY),
        TimeMode::Bucket => stop
            .time_bucket
            .map(|bucket| bucket.sort_key())
            .unwrap_or(UNTIMED_SORT_KEY),
    }
}

/// Compare two stops of the same day.
pub fn compare_stops(a: &Stop, b: &Stop) -> Ordering {
    compare_manual_order(a.manual_order, b.manual_order)
        .then_with(|| effective_sort_key(a).cmp(effective_sort_key(b)))
        .then_with(|| a.name.cmp(&b.name))
}

fn compare_manual_order(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        // Explicitly placed stops come before auto-sorted ones.
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort a day's stops in place. The sort is stable.
pub fn sort_stops(stops: &mut [&Stop]) {
    stops.sort_by(|a, b| compare_stops(a, b));
}

/// Direction of a manual move within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Towards the start of the day.
    Up,
    /// Towards the end of the day.
    Down,
}

impl MoveDirection {
    pub(crate) fn preposition(self) -> &'static str {
        match self {
            MoveDirection::Up => "before",
            MoveDirection::Down => "after",
        }
    }

    pub(crate) fn conflict_relation(self) -> &'static str {
        match self {
            MoveDirection::Up => "earlier",
            MoveDirection::Down => "later",
        }
    }
}

impl std::fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveDirection::Up => write!(f, "up"),
            MoveDirection::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for MoveDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            _ => Err(format!("Invalid direction '{}'. Expected: up, down", s)),
        }
    }
}

/// Work out which neighbour a stop would swap with.
///
/// `day` must already be sorted with [`compare_stops`]. Returns `Ok(None)`
/// when the stop is already first (moving up) or last (moving down).
/// Swapping is refused when the neighbour's effective sort key is strictly
/// earlier (moving up) or strictly later (moving down) than the stop's.
pub fn plan_move(
    day: &[&Stop],
    index: usize,
    direction: MoveDirection,
    key: DayKey,
) -> Result<Option<usize>, OrderingConflict> {
    let neighbour_index = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&i| i < day.len()),
    };
    let Some(neighbour_index) = neighbour_index else {
        return Ok(None);
    };

    let stop = day[index];
    let neighbour = day[neighbour_index];
    let stop_key = effective_sort_key(stop);
    let neighbour_key = effective_sort_key(neighbour);

    let conflict = match direction {
        MoveDirection::Up => neighbour_key < stop_key,
        MoveDirection::Down => neighbour_key > stop_key,
    };

    if conflict {
        return Err(OrderingConflict {
            stop_id: stop.id.clone(),
            stop_name: stop.name.clone(),
            stop_key: stop_key.to_string(),
            neighbour_id: neighbour.id.clone(),
            neighbour_name: neighbour.name.clone(),
            neighbour_key: neighbour_key.to_string(),
            direction,
            day: key,
        });
    }

    Ok(Some(neighbour_index))
}
