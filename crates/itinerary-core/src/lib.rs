//! # itinerary-core
//!
//! Stop scheduling and grouping for trip itineraries.
//!
//! This library places itinerary stops into time-of-day buckets, sorts them
//! within a day, groups them by calendar day, and lays that order out the
//! same way for every consumer: the interactive editor, the public
//! read-only view, and the paginated export.
//!
//! ## Features
//!
//! - **One ordering**: [`compare_stops`] is a total order (manual order,
//!   then clock time or bucket, then name), so every view agrees.
//! - **Day grouping**: dated groups in calendar order, numbered Day 1, Day 2,
//!   ..., with undated stops collected in a trailing "Unscheduled" group.
//! - **Validation**: stop dates must fall inside the itinerary's inclusive
//!   date range; out-of-range dates are rejected, never clamped.
//! - **Adapters**: [`editor::ItineraryEditor`], [`public::PublicView`] and
//!   [`pdf::PdfExporter`] all build on [`group_by_day`].
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use itinerary_core::prelude::*;
//!
//! let june = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
//! let stops = vec![
//!     Stop::new("a", "Dinner").on(june(2)).in_bucket(TimeBucket::Evening),
//!     Stop::new("b", "Museum").on(june(2)).at("10:30"),
//!     Stop::new("c", "Packing list"),
//! ];
//!
//! for group in group_by_day(&stops) {
//!     println!("{}", group.title());
//!     for stop in &group.stops {
//!         println!("  {} {}", time_label(stop), stop.name);
//!     }
//! }
//! ```

pub mod classify;
pub mod editor;
pub mod error;
pub mod grouping;
pub mod models;
pub mod ordering;
pub mod parse;
pub mod pdf;
pub mod photos;
pub mod places;
pub mod public;
pub mod store;
pub mod tz;
pub mod validate;

// Re-export commonly used types at the crate root
pub use classify::{DisplayBucket, classify_time, resolve_display_bucket, time_label};
pub use error::{
    ItineraryError, LookupFailure, NotFoundError, OrderingConflict, Result, StoreError,
    ValidationError,
};
pub use grouping::{DayGroup, DayKey, ScheduleOrder, group_by_day};
pub use models::{
    Itinerary, ItineraryStatus, PlaceType, Stop, StopId, StopSource, Theme, TimeBucket, TimeMode,
};
pub use ordering::{MoveDirection, compare_stops, effective_sort_key};
pub use validate::{validate_stop, validate_stop_date};

/// Prelude module for convenient imports.
///
/// ```
/// use itinerary_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::classify::{
        DisplayBucket, classify_by_clock_time, classify_time, resolve_display_bucket, time_label,
    };
    pub use crate::editor::{ItineraryEditor, StopDraft};
    pub use crate::error::{
        ItineraryError, NotFoundError, OrderingConflict, Result, ValidationError,
    };
    pub use crate::grouping::{DayGroup, DayKey, ScheduleOrder, group_by_day};
    pub use crate::models::*;
    pub use crate::ordering::{MoveDirection, compare_stops, effective_sort_key, sort_stops};
    pub use crate::parse::parse_clock_time;
    pub use crate::pdf::{PdfExporter, PdfLayout};
    pub use crate::public::{PublicView, share};
    pub use crate::tz::parse_tz;
    pub use crate::validate::{find_violations, validate_stop, validate_stop_date};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{ItineraryEditor, StopDraft};
    use crate::pdf::PdfExporter;
    use crate::public::{MemoryPublicStore, PublicView, share};
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn mixed_itinerary() -> Itinerary {
        let mut completed = Stop::new("s7", "Sunrise hike").on(june(3)).at("05:30");
        completed.completed = true;

        Itinerary::new("trip-1", "Provence")
            .with_dates(june(1), june(5))
            .with_stops(vec![
                Stop::new("s1", "Lavender fields").on(june(3)).in_bucket(TimeBucket::Morning),
                Stop::new("s2", "Market").on(june(1)).at("09:00"),
                Stop::new("s3", "Wine tasting").on(june(3)).at("16:00"),
                Stop::new("s4", "Buy sunscreen"),
                Stop::new("s5", "Bakery").on(june(1)).at("09:00"),
                Stop::new("s6", "Pont du Gard").on(june(3)).with_manual_order(0),
                completed,
                Stop::new("s8", "Maybe Nice"),
            ])
    }

    #[test]
    fn all_adapters_agree_on_order() {
        let itinerary = mixed_itinerary();
        let canonical = ScheduleOrder::of_groups(&group_by_day(&itinerary.stops));

        let editor = ItineraryEditor::new(itinerary.clone());
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();
        let mut store = MemoryPublicStore::new();
        store.publish(share(&itinerary, "tok", now));
        let public = PublicView::load(&store, "tok", Tz::UTC).unwrap();
        let document = PdfExporter::default().export(&itinerary, Tz::UTC);

        assert_eq!(editor.view().order(), canonical);
        assert_eq!(public.order(), canonical);
        assert_eq!(document.order(), canonical);
    }

    #[test]
    fn canonical_order_of_mixed_stops() {
        let order = ScheduleOrder::of_groups(&group_by_day(&mixed_itinerary().stops));
        assert_eq!(
            order.day_keys(),
            [DayKey::Date(june(1)), DayKey::Date(june(3)), DayKey::Unscheduled]
        );

        let ids: Vec<Vec<&str>> = order
            .0
            .iter()
            .map(|(_, ids)| ids.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(
            ids,
            [
                vec!["s5", "s2"],
                vec!["s6", "s7", "s1", "s3"],
                vec!["s4", "s8"],
            ]
        );
    }

    #[test]
    fn editor_changes_reach_every_adapter() {
        let mut editor = ItineraryEditor::new(mixed_itinerary());
        editor
            .add_stop(StopDraft::new("Late dinner").on(june(1)).at("21:00"))
            .unwrap();
        editor.move_stop("s2", MoveDirection::Up).unwrap();

        let itinerary = editor.itinerary().clone();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();
        let public = PublicView::from_snapshot(&share(&itinerary, "tok", now), Tz::UTC);
        let document = PdfExporter::default().export(&itinerary, Tz::UTC);

        let first_day: Vec<&str> = public.days[0].stops.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(first_day, ["s2", "s5", "stop-9"]);
        assert_eq!(editor.view().order(), public.order());
        assert_eq!(document.order(), public.order());
    }

    #[test]
    fn prelude_exports() {
        use crate::prelude::*;

        let _tz = parse_tz("UTC").unwrap();
        let _bucket = classify_by_clock_time(Some("12:00"));
        let _direction = MoveDirection::Up;
        let _layout = PdfLayout::default();
    }
}
