//! Day grouping.
//!
//! Partitions a flat stop list into one group per calendar date plus an
//! "Unscheduled" group, sorts each group with
//! [`compare_stops`](crate::ordering::compare_stops), and orders the groups
//! by date with "Unscheduled" always last. Dated groups are numbered
//! Day 1, Day 2, ... in that order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::models::{Stop, StopId};
use crate::ordering::sort_stops;

/// Literal key of the group holding stops without a date.
pub const UNSCHEDULED_KEY: &str = "Unscheduled";

/// Group key of a stop.
///
/// The derived ordering puts every date before `Unscheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayKey {
    Date(NaiveDate),
    Unscheduled,
}

impl DayKey {
    pub fn of(stop: &Stop) -> Self {
        stop.date.map_or(DayKey::Unscheduled, DayKey::Date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DayKey::Unscheduled => write!(f, "{}", UNSCHEDULED_KEY),
        }
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(UNSCHEDULED_KEY) {
            return Ok(DayKey::Unscheduled);
        }
        crate::parse::parse_date(s).map(DayKey::Date)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One day's worth of stops, sorted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup<'a> {
    pub key: DayKey,
    /// 1-based position among dated groups. `None` for "Unscheduled".
    pub day_number: Option<u32>,
    pub stops: Vec<&'a Stop>,
}

impl DayGroup<'_> {
    /// Section title, e.g. "Day 2 - Sun, Jun 2" or "Unscheduled".
    pub fn title(&self) -> String {
        match (self.key, self.day_number) {
            (DayKey::Date(date), Some(n)) => format!("Day {} - {}", n, date.format("%a, %b %-d")),
            (DayKey::Date(date), None) => date.format("%a, %b %-d").to_string(),
            (DayKey::Unscheduled, _) => UNSCHEDULED_KEY.to_string(),
        }
    }

    pub fn completed_count(&self) -> usize {
        self.stops.iter().filter(|s| s.completed).count()
    }
}

/// Group stops by day.
///
/// Pure: the same input always yields the same groups in the same order.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use itinerary_core::grouping::{DayKey, group_by_day};
/// use itinerary_core::models::Stop;
///
/// let june = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// let stops = vec![
///     Stop::new("a", "A").on(june(5)),
///     Stop::new("b", "B"),
///     Stop::new("c", "C").on(june(1)),
/// ];
/// let keys: Vec<String> = group_by_day(&stops).iter().map(|g| g.key.to_string()).collect();
/// assert_eq!(keys, ["2024-06-01", "2024-06-05", "Unscheduled"]);
/// ```
pub fn group_by_day(stops: &[Stop]) -> Vec<DayGroup<'_>> {
    let mut by_key: BTreeMap<DayKey, Vec<&Stop>> = BTreeMap::new();
    for stop in stops {
        by_key.entry(DayKey::of(stop)).or_default().push(stop);
    }

    let mut next_day = 0;
    by_key
        .into_iter()
        .map(|(key, mut stops)| {
            sort_stops(&mut stops);
            let day_number = match key {
                DayKey::Date(_) => {
                    next_day += 1;
                    Some(next_day)
                }
                DayKey::Unscheduled => None,
            };
            DayGroup {
                key,
                day_number,
                stops,
            }
        })
        .collect()
}

/// The day/stop sequence a view presents, used to check that every view
/// agrees with every other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleOrder(pub Vec<(DayKey, Vec<StopId>)>);

impl ScheduleOrder {
    pub fn of_groups(groups: &[DayGroup<'_>]) -> Self {
        Self(
            groups
                .iter()
                .map(|g| (g.key, g.stops.iter().map(|s| s.id.clone()).collect()))
                .collect(),
        )
    }

    pub fn day_keys(&self) -> Vec<DayKey> {
        self.0.iter().map(|(key, _)| *key).collect()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_stops() -> impl Strategy<Value = Vec<Stop>> {
        proptest::collection::vec(
            (
                proptest::option::of(1u32..6),
                proptest::option::of(0u32..24),
                "[a-d]{1,3}",
            ),
            0..20,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (day, hour, name))| {
                    let mut stop = Stop::new(format!("s{i}"), name);
                    stop.date = day.map(|d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap());
                    stop.time = hour.map(|h| format!("{h:02}:00"));
                    stop
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn grouping_is_deterministic(stops in arb_stops()) {
            let first = ScheduleOrder::of_groups(&group_by_day(&stops));
            let second = ScheduleOrder::of_groups(&group_by_day(&stops));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn grouping_keeps_every_stop_once(stops in arb_stops()) {
            let groups = group_by_day(&stops);
            let total: usize = groups.iter().map(|g| g.stops.len()).sum();
            prop_assert_eq!(total, stops.len());
            for group in &groups {
                prop_assert!(group.stops.iter().all(|s| DayKey::of(s) == group.key));
            }
        }

        #[test]
        fn group_keys_are_strictly_increasing(stops in arb_stops()) {
            let keys = ScheduleOrder::of_groups(&group_by_day(&stops)).day_keys();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn input_order_does_not_matter(stops in arb_stops()) {
            let mut reversed = stops.clone();
            reversed.reverse();
            // Distinct names keep the comparison free of stable-sort ties.
            let mut seen = std::collections::HashSet::new();
            prop_assume!(stops.iter().all(|s| seen.insert((s.date, s.time.clone(), s.name.clone()))));
            prop_assert_eq!(
                ScheduleOrder::of_groups(&group_by_day(&stops)),
                ScheduleOrder::of_groups(&group_by_day(&reversed))
            );
        }
    }
}
