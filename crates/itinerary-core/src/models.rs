//! Core data types for itineraries.
//!
//! This module defines the stored shapes the engine works on:
//! - [`Stop`] - One visit within an itinerary
//! - [`Itinerary`] - The owning container of stops
//! - [`TimeMode`] / [`TimeBucket`] - How a stop is placed within its day
//! - [`PlaceType`] - What kind of place a stop is
//! - [`StopSource`] - Where a stop's place data came from
//!
//! The bucket and place-type tables ([`TIME_BUCKETS`], [`PLACE_TYPES`]) are
//! static configuration shared by every view.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque stop identifier, unique within an itinerary.
pub type StopId = String;

/// How a stop's time of day is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    /// The stop's `time` field ("HH:MM") is authoritative.
    #[default]
    Fixed,
    /// The stop's `time_bucket` stands in for a clock time.
    Bucket,
}

impl std::fmt::Display for TimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeMode::Fixed => write!(f, "fixed"),
            TimeMode::Bucket => write!(f, "bucket"),
        }
    }
}

/// One of the eight day-part buckets.
///
/// Variants are declared in day order, which is also the row order of
/// [`TIME_BUCKETS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBucket {
    EarlyMorning,
    Morning,
    Midday,
    EarlyAfternoon,
    LateAfternoon,
    Evening,
    Night,
    LateNight,
}

/// Static description of a [`TimeBucket`].
#[derive(Debug)]
pub struct BucketInfo {
    pub bucket: TimeBucket,
    /// Stored name (camelCase).
    pub name: &'static str,
    pub label: &'static str,
    /// Representative "HH:MM" used in place of a clock time when sorting.
    pub sort_key: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// The canonical bucket table.
pub static TIME_BUCKETS: [BucketInfo; 8] = [
    BucketInfo {
        bucket: TimeBucket::EarlyMorning,
        name: "earlyMorning",
        label: "Early Morning",
        sort_key: "06:00",
        icon: "sunrise",
        color: "amber",
    },
    BucketInfo {
        bucket: TimeBucket::Morning,
        name: "morning",
        label: "Morning",
        sort_key: "09:00",
        icon: "sun",
        color: "yellow",
    },
    BucketInfo {
        bucket: TimeBucket::Midday,
        name: "midday",
        label: "Midday",
        sort_key: "12:00",
        icon: "sun-high",
        color: "orange",
    },
    BucketInfo {
        bucket: TimeBucket::EarlyAfternoon,
        name: "earlyAfternoon",
        label: "Early Afternoon",
        sort_key: "14:00",
        icon: "sun-medium",
        color: "lime",
    },
    BucketInfo {
        bucket: TimeBucket::LateAfternoon,
        name: "lateAfternoon",
        label: "Late Afternoon",
        sort_key: "16:00",
        icon: "sunset",
        color: "rose",
    },
    BucketInfo {
        bucket: TimeBucket::Evening,
        name: "evening",
        label: "Evening",
        sort_key: "19:00",
        icon: "moon-star",
        color: "indigo",
    },
    BucketInfo {
        bucket: TimeBucket::Night,
        name: "night",
        label: "Night",
        sort_key: "21:30",
        icon: "moon",
        color: "violet",
    },
    BucketInfo {
        bucket: TimeBucket::LateNight,
        name: "lateNight",
        label: "Late Night",
        sort_key: "02:00",
        icon: "stars",
        color: "slate",
    },
];

impl TimeBucket {
    /// All buckets in day order.
    pub const ALL: [TimeBucket; 8] = [
        TimeBucket::EarlyMorning,
        TimeBucket::Morning,
        TimeBucket::Midday,
        TimeBucket::EarlyAfternoon,
        TimeBucket::LateAfternoon,
        TimeBucket::Evening,
        TimeBucket::Night,
        TimeBucket::LateNight,
    ];

    pub fn info(self) -> &'static BucketInfo {
        &TIME_BUCKETS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn sort_key(self) -> &'static str {
        self.info().sort_key
    }

    pub fn icon(self) -> &'static str {
        self.info().icon
    }

    pub fn color(self) -> &'static str {
        self.info().color
    }
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of place a stop refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Attraction,
    Restaurant,
    Cafe,
    Bar,
    Hotel,
    Museum,
    Park,
    Beach,
    Shopping,
    Viewpoint,
    Transport,
    Activity,
    #[default]
    Other,
}

/// Display labels for every [`PlaceType`], in declaration order.
pub static PLACE_TYPES: [(PlaceType, &str); 13] = [
    (PlaceType::Attraction, "Attraction"),
    (PlaceType::Restaurant, "Restaurant"),
    (PlaceType::Cafe, "Cafe"),
    (PlaceType::Bar, "Bar"),
    (PlaceType::Hotel, "Hotel"),
    (PlaceType::Museum, "Museum"),
    (PlaceType::Park, "Park"),
    (PlaceType::Beach, "Beach"),
    (PlaceType::Shopping, "Shopping"),
    (PlaceType::Viewpoint, "Viewpoint"),
    (PlaceType::Transport, "Transport"),
    (PlaceType::Activity, "Activity"),
    (PlaceType::Other, "Other"),
];

impl PlaceType {
    pub fn label(self) -> &'static str {
        PLACE_TYPES[self as usize].1
    }
}

/// Where a stop's place data came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StopSource {
    /// Typed in by hand.
    #[default]
    Manual,
    /// Picked from the user's saved places.
    SavedPlace {
        #[serde(rename = "placeId")]
        place_id: String,
    },
    /// Picked from the external place search.
    ExternalLookup {
        #[serde(rename = "externalId")]
        external_id: String,
    },
}

/// Geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One visit within an itinerary.
///
/// Both `time` and `time_bucket` may be present in storage; `time_mode`
/// decides which one is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    /// Calendar day of the visit. `None` means unscheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Clock time as "HH:MM" (24-hour).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default)]
    pub time_mode: TimeMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_bucket: Option<TimeBucket>,
    /// Derived display key, refreshed by the editor on every save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_order: Option<i64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub place_type: PlaceType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default)]
    pub source: StopSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Journal entry written when the stop was completed. Not owned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_entry_id: Option<String>,
}

impl Stop {
    /// Create an unscheduled manual stop with no time information.
    pub fn new(id: impl Into<StopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date: None,
            time: None,
            time_mode: TimeMode::Fixed,
            time_bucket: None,
            sort_key: None,
            manual_order: None,
            address: String::new(),
            notes: String::new(),
            place_type: PlaceType::Other,
            photos: Vec::new(),
            source: StopSource::Manual,
            coordinates: None,
            completed: false,
            completed_at: None,
            journal_entry_id: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set a fixed clock time.
    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self.time_mode = TimeMode::Fixed;
        self
    }

    /// Place the stop in a bucket instead of at a clock time.
    pub fn in_bucket(mut self, bucket: TimeBucket) -> Self {
        self.time_bucket = Some(bucket);
        self.time_mode = TimeMode::Bucket;
        self
    }

    pub fn with_manual_order(mut self, order: i64) -> Self {
        self.manual_order = Some(order);
        self
    }
}

/// Lifecycle state of an itinerary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItineraryStatus {
    #[default]
    Planned,
    Active,
    Completed,
    Archived,
}

impl std::fmt::Display for ItineraryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItineraryStatus::Planned => write!(f, "Planned"),
            ItineraryStatus::Active => write!(f, "Active"),
            ItineraryStatus::Completed => write!(f, "Completed"),
            ItineraryStatus::Archived => write!(f, "Archived"),
        }
    }
}

/// Visual theme of an itinerary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Ocean,
    Forest,
    Sunset,
    Midnight,
}

impl Theme {
    /// Accent color used for headings and rules in exported documents.
    pub fn accent(self) -> &'static str {
        match self {
            Theme::Classic => "#1f2937",
            Theme::Ocean => "#0e7490",
            Theme::Forest => "#166534",
            Theme::Sunset => "#c2410c",
            Theme::Midnight => "#312e81",
        }
    }
}

/// A trip plan owning an ordered list of stops.
///
/// The order of `stops` in storage carries no meaning; views always order
/// them with [`crate::grouping::group_by_day`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: ItineraryStatus,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub stops: Vec<Stop>,
}

impl Itinerary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date: None,
            end_date: None,
            notes: String::new(),
            status: ItineraryStatus::Planned,
            theme: Theme::Classic,
            share_token: None,
            is_public: false,
            stops: Vec::new(),
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_stops(mut self, stops: Vec<Stop>) -> Self {
        self.stops = stops;
        self
    }

    pub fn stop(&self, id: &str) -> Option<&Stop> {
        self.stops.iter().find(|s| s.id == id)
    }

    /// Human-readable date range, e.g. "Jun 1, 2024 - Jun 10, 2024".
    pub fn date_range_label(&self) -> Option<String> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(format!(
                "{} - {}",
                start.format("%b %-d, %Y"),
                end.format("%b %-d, %Y")
            )),
            (Some(start), None) => Some(format!("From {}", start.format("%b %-d, %Y"))),
            (None, Some(end)) => Some(format!("Until {}", end.format("%b %-d, %Y"))),
            (None, None) => None,
        }
    }
}
