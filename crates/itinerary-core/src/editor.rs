//! Interactive itinerary editor.
//!
//! [`ItineraryEditor`] owns one itinerary plus the editor's ephemeral UI
//! state (which days are collapsed). Every mutation validates first,
//! applies the change in memory, and queues a write for the document store;
//! the view is recomputed from [`group_by_day`] on every call, so it always
//! reflects the latest change. Queued writes are flushed separately and a
//! failed write never rolls back the in-memory state.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::{BucketBadge, resolve_display_bucket, time_label};
use crate::error::{ItineraryError, StoreError, ValidationError};
use crate::grouping::{DayGroup, DayKey, ScheduleOrder, group_by_day};
use crate::models::{
    Coordinates, Itinerary, ItineraryStatus, PlaceType, Stop, StopId, StopSource, TimeBucket,
    TimeMode,
};
use crate::ordering::{MoveDirection, effective_sort_key, plan_move};
use crate::photos::merge_photos;
use crate::public::{PublicItinerary, share};
use crate::store::{DocumentStore, ITINERARIES, Record};
use crate::tz::format_local;
use crate::validate::{Violation, find_violations, validate_date_range, validate_stop};

/// The editable fields of a stop, as entered in the stop form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopDraft {
    /// Requested id for a new stop. Ignored when editing.
    pub id: Option<StopId>,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub time_mode: TimeMode,
    pub time_bucket: Option<TimeBucket>,
    pub address: String,
    pub notes: String,
    pub place_type: PlaceType,
    pub source: StopSource,
    pub coordinates: Option<Coordinates>,
}

impl StopDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self.time_mode = TimeMode::Fixed;
        self
    }

    pub fn in_bucket(mut self, bucket: TimeBucket) -> Self {
        self.time_bucket = Some(bucket);
        self.time_mode = TimeMode::Bucket;
        self
    }

    fn apply_to(self, stop: &mut Stop) {
        stop.name = self.name.trim().to_string();
        stop.date = self.date;
        stop.time = self.time.filter(|t| !t.trim().is_empty());
        stop.time_mode = self.time_mode;
        stop.time_bucket = self.time_bucket;
        stop.address = self.address;
        stop.notes = self.notes;
        stop.place_type = self.place_type;
        stop.source = self.source;
        stop.coordinates = self.coordinates;
    }
}

impl From<&Stop> for StopDraft {
    fn from(stop: &Stop) -> Self {
        Self {
            id: Some(stop.id.clone()),
            name: stop.name.clone(),
            date: stop.date,
            time: stop.time.clone(),
            time_mode: stop.time_mode,
            time_bucket: stop.time_bucket,
            address: stop.address.clone(),
            notes: stop.notes.clone(),
            place_type: stop.place_type,
            source: stop.source.clone(),
            coordinates: stop.coordinates,
        }
    }
}

/// A write waiting to be sent to the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub collection: &'static str,
    pub id: String,
    pub patch: Record,
}

/// Result of [`ItineraryEditor::flush`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlushReport {
    pub written: usize,
    pub failures: Vec<StoreError>,
}

/// Editor for a single itinerary.
#[derive(Debug, Clone)]
pub struct ItineraryEditor {
    itinerary: Itinerary,
    collapsed: BTreeSet<DayKey>,
    pending: Vec<PendingWrite>,
    tz: Tz,
    next_id: u64,
}

impl ItineraryEditor {
    pub fn new(itinerary: Itinerary) -> Self {
        let next_id = itinerary.stops.len() as u64 + 1;
        Self {
            itinerary,
            collapsed: BTreeSet::new(),
            pending: Vec::new(),
            tz: Tz::UTC,
            next_id,
        }
    }

    /// Timezone used to show completion times.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn into_itinerary(self) -> Itinerary {
        self.itinerary
    }

    pub fn groups(&self) -> Vec<DayGroup<'_>> {
        group_by_day(&self.itinerary.stops)
    }

    pub fn order(&self) -> ScheduleOrder {
        ScheduleOrder::of_groups(&self.groups())
    }

    /// Add a stop. Returns the id it was stored under.
    pub fn add_stop(&mut self, draft: StopDraft) -> Result<StopId, ValidationError> {
        let id = match draft.id.clone().filter(|id| !id.is_empty()) {
            Some(id) if self.itinerary.stop(&id).is_some() => {
                return Err(ValidationError::DuplicateStop(id));
            }
            Some(id) => id,
            None => self.generate_id(),
        };

        let mut stop = Stop::new(id.clone(), String::new());
        draft.apply_to(&mut stop);
        self.check(&stop)?;

        stop.sort_key = Some(effective_sort_key(&stop).to_string());
        debug!(stop = %stop.id, date = ?stop.date, "stop added");
        self.itinerary.stops.push(stop);
        self.queue_stops();
        Ok(id)
    }

    /// Replace the editable fields of an existing stop.
    ///
    /// Completion state, photos and the journal link are kept. A stop that
    /// moves to another day loses its manual order.
    pub fn edit_stop(&mut self, id: &str, draft: StopDraft) -> Result<(), ValidationError> {
        let index = self.index_of(id)?;
        let mut updated = self.itinerary.stops[index].clone();
        let previous_date = updated.date;
        draft.apply_to(&mut updated);

        if updated.date != previous_date {
            updated.manual_order = None;
        }
        self.check(&updated)?;

        updated.sort_key = Some(effective_sort_key(&updated).to_string());
        self.itinerary.stops[index] = updated;
        self.queue_stops();
        Ok(())
    }

    pub fn remove_stop(&mut self, id: &str) -> Result<Stop, ValidationError> {
        let index = self.index_of(id)?;
        let removed = self.itinerary.stops.remove(index);
        self.queue_stops();
        Ok(removed)
    }

    /// Flip a stop's completion. Returns the new state.
    pub fn toggle_complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<bool, ValidationError> {
        let index = self.index_of(id)?;
        let stop = &mut self.itinerary.stops[index];
        stop.completed = !stop.completed;
        stop.completed_at = stop.completed.then_some(now);
        let completed = stop.completed;
        self.queue_stops();
        Ok(completed)
    }

    /// Remember the journal entry written for a completed stop.
    pub fn link_journal_entry(
        &mut self,
        id: &str,
        entry_id: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let index = self.index_of(id)?;
        self.itinerary.stops[index].journal_entry_id = Some(entry_id.into());
        self.queue_stops();
        Ok(())
    }

    /// Add uploaded photo URLs to a stop.
    pub fn attach_photos(&mut self, id: &str, urls: &[String]) -> Result<(), ValidationError> {
        let index = self.index_of(id)?;
        let stop = &mut self.itinerary.stops[index];
        stop.photos = merge_photos(&stop.photos, urls);
        self.queue_stops();
        Ok(())
    }

    /// Move a stop one place up or down within its day.
    ///
    /// On success every stop of that day gets a manual order matching the
    /// new sequence. Returns `Ok(false)` when the stop is already at the
    /// edge of its day. Moves to another day go through
    /// [`edit_stop`](Self::edit_stop).
    pub fn move_stop(&mut self, id: &str, direction: MoveDirection) -> Result<bool, ItineraryError> {
        let index = self.index_of(id)?;
        let key = DayKey::of(&self.itinerary.stops[index]);

        let new_order: Vec<StopId> = {
            let groups = group_by_day(&self.itinerary.stops);
            let Some(group) = groups.into_iter().find(|g| g.key == key) else {
                return Err(ValidationError::UnknownStop(id.to_string()).into());
            };
            let Some(position) = group.stops.iter().position(|s| s.id == id) else {
                return Err(ValidationError::UnknownStop(id.to_string()).into());
            };
            let Some(neighbour) = plan_move(&group.stops, position, direction, key)? else {
                return Ok(false);
            };

            let mut ids: Vec<StopId> = group.stops.iter().map(|s| s.id.clone()).collect();
            ids.swap(position, neighbour);
            ids
        };

        for (order, stop_id) in new_order.iter().enumerate() {
            if let Some(stop) = self.itinerary.stops.iter_mut().find(|s| &s.id == stop_id) {
                stop.manual_order = Some(order as i64);
            }
        }

        debug!(stop = id, %direction, day = %key, "stop moved");
        self.queue_stops();
        Ok(true)
    }

    /// Change the itinerary's dates.
    ///
    /// Existing stops are not touched even if they now fall outside the
    /// range; see [`out_of_range_stops`](Self::out_of_range_stops).
    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        validate_date_range(start, end)?;
        self.itinerary.start_date = start;
        self.itinerary.end_date = end;

        let mut patch = Record::new();
        patch.insert("startDate".to_string(), date_value(start));
        patch.insert("endDate".to_string(), date_value(end));
        self.queue(patch);
        Ok(())
    }

    /// Stored stops whose date lies outside the itinerary's range.
    pub fn out_of_range_stops(&self) -> Vec<Violation> {
        find_violations(&self.itinerary)
            .into_iter()
            .filter(|v| matches!(v.error, ValidationError::DateOutOfRange { .. }))
            .collect()
    }

    /// Create a public copy and mark the itinerary as shared.
    pub fn share(&mut self, token: impl Into<String>, now: DateTime<Utc>) -> PublicItinerary {
        let token = token.into();
        self.itinerary.share_token = Some(token.clone());
        self.itinerary.is_public = true;

        let mut patch = Record::new();
        patch.insert("shareToken".to_string(), Value::String(token.clone()));
        patch.insert("isPublic".to_string(), Value::Bool(true));
        self.queue(patch);

        share(&self.itinerary, token, now)
    }

    /// Mark the itinerary as no longer shared. Revoking the public copy
    /// itself is up to the public store.
    pub fn unshare(&mut self) {
        self.itinerary.is_public = false;
        let mut patch = Record::new();
        patch.insert("isPublic".to_string(), Value::Bool(false));
        self.queue(patch);
    }

    /// Collapse or expand a day. Returns whether it is now collapsed.
    pub fn toggle_day(&mut self, key: DayKey) -> bool {
        if self.collapsed.remove(&key) {
            false
        } else {
            self.collapsed.insert(key);
            true
        }
    }

    pub fn is_collapsed(&self, key: DayKey) -> bool {
        self.collapsed.contains(&key)
    }

    pub fn collapse_all(&mut self) {
        let keys: Vec<DayKey> = self.groups().iter().map(|g| g.key).collect();
        self.collapsed.extend(keys);
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Render-ready editor state.
    pub fn view(&self) -> EditorView {
        let out_of_range: BTreeSet<StopId> = self
            .out_of_range_stops()
            .into_iter()
            .map(|v| v.stop_id)
            .collect();

        let sections = self
            .groups()
            .iter()
            .map(|group| EditorSection {
                key: group.key,
                day_number: group.day_number,
                title: group.title(),
                collapsed: self.is_collapsed(group.key),
                completed: group.completed_count(),
                total: group.stops.len(),
                rows: group
                    .stops
                    .iter()
                    .map(|stop| EditorRow {
                        id: stop.id.clone(),
                        name: stop.name.clone(),
                        time_label: time_label(stop),
                        bucket: resolve_display_bucket(stop).badge(),
                        place_type: stop.place_type.label(),
                        address: stop.address.clone(),
                        completed: stop.completed,
                        completed_at: stop.completed_at.map(|ts| format_local(ts, self.tz)),
                        has_journal_entry: stop.journal_entry_id.is_some(),
                        out_of_range: out_of_range.contains(&stop.id),
                    })
                    .collect(),
            })
            .collect();

        EditorView {
            name: self.itinerary.name.clone(),
            date_range: self.itinerary.date_range_label(),
            status: self.itinerary.status,
            sections,
        }
    }

    pub fn pending_writes(&self) -> &[PendingWrite] {
        &self.pending
    }

    pub fn drain_pending(&mut self) -> Vec<PendingWrite> {
        std::mem::take(&mut self.pending)
    }

    /// Send queued writes to the store.
    ///
    /// Failures are logged and reported; the in-memory itinerary is kept.
    pub fn flush(&mut self, store: &mut dyn DocumentStore) -> FlushReport {
        let mut report = FlushReport::default();

        for write in self.drain_pending() {
            match store.update(write.collection, &write.id, write.patch) {
                Ok(()) => report.written += 1,
                Err(err) => {
                    warn!(itinerary = %write.id, error = %err, "failed to persist itinerary change");
                    report.failures.push(err);
                }
            }
        }

        debug!(
            written = report.written,
            failed = report.failures.len(),
            "flushed itinerary changes"
        );
        report
    }

    fn check(&self, stop: &Stop) -> Result<(), ValidationError> {
        validate_stop(stop, self.itinerary.start_date, self.itinerary.end_date)
    }

    fn index_of(&self, id: &str) -> Result<usize, ValidationError> {
        self.itinerary
            .stops
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| ValidationError::UnknownStop(id.to_string()))
    }

    fn generate_id(&mut self) -> StopId {
        loop {
            let candidate = format!("stop-{}", self.next_id);
            self.next_id += 1;
            if self.itinerary.stop(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn queue_stops(&mut self) {
        match serde_json::to_value(&self.itinerary.stops) {
            Ok(stops) => {
                let mut patch = Record::new();
                patch.insert("stops".to_string(), stops);
                self.queue(patch);
            }
            Err(err) => warn!(error = %err, "could not serialize stops, change not queued"),
        }
    }

    fn queue(&mut self, patch: Record) {
        self.pending.push(PendingWrite {
            collection: ITINERARIES,
            id: self.itinerary.id.clone(),
            patch,
        });
    }
}

fn date_value(date: Option<NaiveDate>) -> Value {
    date.map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string()))
}

/// Editor state ready for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub name: String,
    pub date_range: Option<String>,
    pub status: ItineraryStatus,
    pub sections: Vec<EditorSection>,
}

/// One collapsible day section.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSection {
    pub key: DayKey,
    pub day_number: Option<u32>,
    pub title: String,
    pub collapsed: bool,
    pub completed: usize,
    pub total: usize,
    pub rows: Vec<EditorRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRow {
    pub id: StopId,
    pub name: String,
    pub time_label: String,
    pub bucket: BucketBadge,
    pub place_type: &'static str,
    pub address: String,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub has_journal_entry: bool,
    pub out_of_range: bool,
}

impl EditorView {
    /// Day/stop sequence shown, including collapsed sections.
    pub fn order(&self) -> ScheduleOrder {
        ScheduleOrder(
            self.sections
                .iter()
                .map(|s| (s.key, s.rows.iter().map(|r| r.id.clone()).collect()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderingConflict;
    use crate::store::MemoryStore;
    use crate::store::to_record;
    use chrono::TimeZone;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn editor() -> ItineraryEditor {
        ItineraryEditor::new(Itinerary::new("trip-1", "Paris").with_dates(june(1), june(10)))
    }

    fn ids(editor: &ItineraryEditor, key: DayKey) -> Vec<String> {
        editor
            .order()
            .0
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, ids)| ids)
            .unwrap_or_default()
    }

    #[test]
    fn add_stop_assigns_ids_and_sort_keys() {
        let mut editor = editor();
        let id = editor
            .add_stop(StopDraft::new("Louvre").on(june(2)).at("10:00"))
            .unwrap();

        let stop = editor.itinerary().stop(&id).unwrap();
        assert_eq!(stop.id, "stop-1");
        assert_eq!(stop.sort_key.as_deref(), Some("10:00"));
        assert_eq!(editor.pending_writes().len(), 1);
    }

    #[test]
    fn add_stop_rejects_out_of_range_date_without_clamping() {
        let mut editor = editor();
        let err = editor
            .add_stop(StopDraft::new("Too late").on(june(11)))
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::DateOutOfRange {
                date: june(11),
                start: june(1),
                end: june(10)
            }
        );
        assert!(editor.itinerary().stops.is_empty());
        assert!(editor.pending_writes().is_empty());
    }

    #[test]
    fn add_stop_requires_a_name() {
        let mut editor = editor();
        assert_eq!(
            editor.add_stop(StopDraft::new("  ")),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn add_stop_rejects_duplicate_id() {
        let mut editor = editor();
        let mut draft = StopDraft::new("A");
        draft.id = Some("fixed".to_string());
        editor.add_stop(draft.clone()).unwrap();
        assert_eq!(
            editor.add_stop(draft),
            Err(ValidationError::DuplicateStop("fixed".to_string()))
        );
    }

    #[test]
    fn edit_regroups_and_clears_manual_order_on_date_change() {
        let mut editor = editor();
        let id = editor
            .add_stop(StopDraft::new("Museum").on(june(2)).at("10:00"))
            .unwrap();
        editor.itinerary.stops[0].manual_order = Some(0);

        let draft = StopDraft::new("Museum").on(june(3)).at("10:00");
        editor.edit_stop(&id, draft).unwrap();

        let stop = editor.itinerary().stop(&id).unwrap();
        assert_eq!(stop.manual_order, None);
        assert_eq!(ids(&editor, DayKey::Date(june(3))), [id]);
    }

    #[test]
    fn edit_keeps_completion_state() {
        let mut editor = editor();
        let id = editor.add_stop(StopDraft::new("Cafe").on(june(2))).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).single().unwrap();
        editor.toggle_complete(&id, now).unwrap();

        let mut draft = StopDraft::from(editor.itinerary().stop(&id).unwrap());
        draft.notes = "Great croissants".to_string();
        editor.edit_stop(&id, draft).unwrap();

        let stop = editor.itinerary().stop(&id).unwrap();
        assert!(stop.completed);
        assert_eq!(stop.notes, "Great croissants");
    }

    #[test]
    fn edit_unknown_stop_fails() {
        let mut editor = editor();
        assert_eq!(
            editor.edit_stop("ghost", StopDraft::new("Ghost")),
            Err(ValidationError::UnknownStop("ghost".to_string()))
        );
    }

    #[test]
    fn toggle_complete_stamps_and_clears_timestamp() {
        let mut editor = editor();
        let id = editor.add_stop(StopDraft::new("Cafe").on(june(2))).unwrap();
        editor.link_journal_entry(&id, "journal-7").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).single().unwrap();

        assert!(editor.toggle_complete(&id, now).unwrap());
        assert_eq!(editor.itinerary().stop(&id).unwrap().completed_at, Some(now));

        assert!(!editor.toggle_complete(&id, now).unwrap());
        let stop = editor.itinerary().stop(&id).unwrap();
        assert_eq!(stop.completed_at, None);
        assert_eq!(stop.journal_entry_id.as_deref(), Some("journal-7"));
    }

    #[test]
    fn move_between_equal_keys_rewrites_manual_order() {
        let mut editor = editor();
        let a = editor
            .add_stop(StopDraft::new("Alpha").on(june(2)).in_bucket(TimeBucket::Morning))
            .unwrap();
        let b = editor
            .add_stop(StopDraft::new("Bravo").on(june(2)).in_bucket(TimeBucket::Morning))
            .unwrap();
        let c = editor
            .add_stop(StopDraft::new("Charlie").on(june(2)).at("15:00"))
            .unwrap();
        assert_eq!(ids(&editor, DayKey::Date(june(2))), [a.clone(), b.clone(), c.clone()]);

        assert!(editor.move_stop(&b, MoveDirection::Up).unwrap());
        assert_eq!(ids(&editor, DayKey::Date(june(2))), [b.clone(), a.clone(), c.clone()]);

        let orders: Vec<_> = [&b, &a, &c]
            .iter()
            .map(|id| editor.itinerary().stop(id).unwrap().manual_order)
            .collect();
        assert_eq!(orders, [Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn move_before_earlier_stop_is_an_ordering_conflict() {
        let mut editor = editor();
        editor
            .add_stop(StopDraft::new("Breakfast").on(june(2)).at("08:00"))
            .unwrap();
        let lunch = editor
            .add_stop(StopDraft::new("Lunch").on(june(2)).at("12:30"))
            .unwrap();
        let before = editor.itinerary().clone();
        let pending = editor.pending_writes().len();

        let err = editor.move_stop(&lunch, MoveDirection::Up).unwrap_err();
        assert!(matches!(
            err,
            ItineraryError::Ordering(OrderingConflict { ref neighbour_key, .. }) if neighbour_key == "08:00"
        ));
        assert_eq!(editor.itinerary(), &before);
        assert_eq!(editor.pending_writes().len(), pending);
    }

    #[test]
    fn move_at_edge_is_a_no_op() {
        let mut editor = editor();
        let id = editor.add_stop(StopDraft::new("Only").on(june(2))).unwrap();
        assert!(!editor.move_stop(&id, MoveDirection::Up).unwrap());
        assert!(!editor.move_stop(&id, MoveDirection::Down).unwrap());
        assert_eq!(editor.itinerary().stop(&id).unwrap().manual_order, None);
    }

    #[test]
    fn narrowing_dates_reports_but_keeps_existing_stops() {
        let mut editor = editor();
        let id = editor.add_stop(StopDraft::new("Late").on(june(9))).unwrap();

        editor.set_date_range(Some(june(1)), Some(june(5))).unwrap();

        let violations = editor.out_of_range_stops();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].stop_id, id);
        assert_eq!(editor.itinerary().stop(&id).unwrap().date, Some(june(9)));
        assert!(editor.view().sections[0].rows[0].out_of_range);
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let mut editor = editor();
        assert!(editor.set_date_range(Some(june(5)), Some(june(1))).is_err());
        assert_eq!(editor.itinerary().start_date, Some(june(1)));
    }

    #[test]
    fn collapse_state_is_per_day_and_ephemeral() {
        let mut editor = editor();
        editor.add_stop(StopDraft::new("A").on(june(1))).unwrap();
        editor.add_stop(StopDraft::new("B").on(june(2))).unwrap();
        editor.add_stop(StopDraft::new("C")).unwrap();

        assert!(editor.toggle_day(DayKey::Date(june(2))));
        let view = editor.view();
        let collapsed: Vec<bool> = view.sections.iter().map(|s| s.collapsed).collect();
        assert_eq!(collapsed, [false, true, false]);

        assert!(!editor.toggle_day(DayKey::Date(june(2))));
        editor.collapse_all();
        assert!(editor.view().sections.iter().all(|s| s.collapsed));
        editor.expand_all();
        assert!(editor.view().sections.iter().all(|s| !s.collapsed));

        assert!(editor.pending_writes().iter().all(|w| w.patch.contains_key("stops")));
    }

    #[test]
    fn view_sections_follow_day_grouping() {
        let mut editor = editor();
        editor.add_stop(StopDraft::new("Unplanned")).unwrap();
        editor
            .add_stop(StopDraft::new("Dinner").on(june(5)).in_bucket(TimeBucket::Evening))
            .unwrap();
        editor
            .add_stop(StopDraft::new("Arrival").on(june(1)).at("14:10"))
            .unwrap();

        let view = editor.view();
        let titles: Vec<&str> = view.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Day 1 - Sat, Jun 1", "Day 2 - Wed, Jun 5", "Unscheduled"]);
        assert_eq!(view.sections[0].rows[0].time_label, "14:10");
        assert_eq!(view.sections[0].rows[0].bucket.label, "Early Afternoon");
        assert_eq!(view.sections[1].rows[0].time_label, "Evening");
        assert_eq!(view.order(), editor.order());
    }

    #[test]
    fn completed_at_is_shown_in_local_time() {
        let tz: Tz = "Europe/Paris".parse().unwrap();
        let mut editor = editor().with_timezone(tz);
        let id = editor.add_stop(StopDraft::new("Cafe").on(june(2))).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 7, 45, 0).single().unwrap();
        editor.toggle_complete(&id, now).unwrap();

        let row = &editor.view().sections[0].rows[0];
        assert_eq!(row.completed_at.as_deref(), Some("2024-06-02 09:45"));
        assert_eq!(editor.view().sections[0].completed, 1);
    }

    #[test]
    fn attach_photos_merges_urls() {
        let mut editor = editor();
        let id = editor.add_stop(StopDraft::new("Beach").on(june(3))).unwrap();
        editor
            .attach_photos(&id, &["b.jpg".to_string(), "a.jpg".to_string()])
            .unwrap();
        assert_eq!(editor.itinerary().stop(&id).unwrap().photos, ["a.jpg", "b.jpg"]);
    }

    #[test]
    fn flush_persists_and_reports_failures_without_rollback() {
        let mut store = MemoryStore::new();
        let itinerary = Itinerary::new("trip-1", "Paris");
        store.add(ITINERARIES, to_record(&itinerary).unwrap()).unwrap();

        let mut editor = ItineraryEditor::new(itinerary);
        editor.add_stop(StopDraft::new("Louvre")).unwrap();
        let report = editor.flush(&mut store);
        assert_eq!(report.written, 1);
        assert!(report.failures.is_empty());
        let stored = store.get(ITINERARIES, "trip-1").unwrap();
        assert_eq!(stored["stops"][0]["name"], "Louvre");

        let mut orphan = ItineraryEditor::new(Itinerary::new("missing", "Nowhere"));
        orphan.add_stop(StopDraft::new("Somewhere")).unwrap();
        let report = orphan.flush(&mut store);
        assert_eq!(report.written, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(orphan.itinerary().stops.len(), 1);
        assert!(orphan.pending_writes().is_empty());
    }

    #[test]
    fn share_snapshots_by_value() {
        let mut editor = editor();
        let id = editor.add_stop(StopDraft::new("Louvre").on(june(2))).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).single().unwrap();

        let snapshot = editor.share("tok-1", now);
        editor
            .edit_stop(&id, StopDraft::new("Musee d'Orsay").on(june(2)))
            .unwrap();

        assert_eq!(snapshot.stops[0].name, "Louvre");
        assert!(snapshot.is_public);
        assert_eq!(editor.itinerary().share_token.as_deref(), Some("tok-1"));

        editor.unshare();
        assert!(!editor.itinerary().is_public);
    }
}
