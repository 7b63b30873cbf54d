//! Public read-only copies of itineraries.
//!
//! Sharing takes a snapshot by value. Later edits to the private itinerary
//! never reach the public copy; the owner has to share again.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{BucketBadge, resolve_display_bucket, time_label};
use crate::error::NotFoundError;
use crate::grouping::{DayKey, ScheduleOrder, group_by_day};
use crate::models::{Itinerary, ItineraryStatus, Stop, StopId, Theme};
use crate::tz::format_local;

/// Snapshot of an itinerary as it was when shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicItinerary {
    pub token: String,
    /// Id of the private itinerary this was copied from.
    pub source_id: String,
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
    pub is_public: bool,
    pub shared_at: DateTime<Utc>,
    #[serde(default)]
    pub stops: Vec<Stop>,
}

impl PublicItinerary {
    /// The copy viewed as an itinerary, for adapters that take one.
    pub fn to_itinerary(&self) -> Itinerary {
        Itinerary {
            id: self.source_id.clone(),
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes.clone(),
            status: self.status,
            theme: self.theme,
            share_token: Some(self.token.clone()),
            is_public: self.is_public,
            stops: self.stops.clone(),
        }
    }
}

/// Snapshot an itinerary for public viewing.
pub fn share(itinerary: &Itinerary, token: impl Into<String>, now: DateTime<Utc>) -> PublicItinerary {
    PublicItinerary {
        token: token.into(),
        source_id: itinerary.id.clone(),
        name: itinerary.name.clone(),
        start_date: itinerary.start_date,
        end_date: itinerary.end_date,
        notes: itinerary.notes.clone(),
        status: itinerary.status,
        theme: itinerary.theme,
        is_public: true,
        shared_at: now,
        stops: itinerary.stops.clone(),
    }
}

/// Lookup of public copies by share token.
pub trait PublicStore {
    /// Snapshot id a token points at.
    fn resolve_token(&self, token: &str) -> Option<String>;

    fn snapshot(&self, id: &str) -> Option<PublicItinerary>;

    /// Whether this one link was turned off, independent of the copy it
    /// points at.
    fn is_revoked(&self, _token: &str) -> bool {
        false
    }
}

/// In-memory [`PublicStore`]. Serializable so the CLI can keep it in a file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPublicStore {
    #[serde(default)]
    tokens: BTreeMap<String, String>,
    #[serde(default)]
    snapshots: BTreeMap<String, PublicItinerary>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    revoked: BTreeSet<String>,
}

impl MemoryPublicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot under its token and return the snapshot id.
    ///
    /// Sharing the same itinerary again replaces the previous copy.
    pub fn publish(&mut self, snapshot: PublicItinerary) -> String {
        let id = format!("public-{}", snapshot.source_id);
        self.tokens.insert(snapshot.token.clone(), id.clone());
        self.snapshots.insert(id.clone(), snapshot);
        id
    }

    /// Turn off the link `token`. Other links to the same copy keep
    /// working. Returns false for an unknown or already revoked token.
    pub fn revoke(&mut self, token: &str) -> bool {
        if !self.tokens.contains_key(token) {
            return false;
        }
        self.revoked.insert(token.to_string())
    }

    /// Stop sharing the copy behind `token` altogether, for every link.
    pub fn unpublish(&mut self, token: &str) -> bool {
        let Some(id) = self.tokens.get(token) else {
            return false;
        };
        match self.snapshots.get_mut(id) {
            Some(snapshot) => {
                snapshot.is_public = false;
                true
            }
            None => false,
        }
    }

    /// Delete a snapshot but keep any tokens pointing at it.
    pub fn delete_snapshot(&mut self, id: &str) -> Option<PublicItinerary> {
        self.snapshots.remove(id)
    }
}

impl PublicStore for MemoryPublicStore {
    fn resolve_token(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }

    fn snapshot(&self, id: &str) -> Option<PublicItinerary> {
        self.snapshots.get(id).cloned()
    }

    fn is_revoked(&self, token: &str) -> bool {
        self.revoked.contains(token)
    }
}

/// Read-only view of a shared itinerary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicView {
    pub name: String,
    pub date_range: Option<String>,
    pub notes: String,
    pub theme: Theme,
    pub shared_at: String,
    pub days: Vec<PublicDay>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDay {
    pub key: DayKey,
    pub day_number: Option<u32>,
    pub title: String,
    pub stops: Vec<PublicStop>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStop {
    pub id: StopId,
    pub name: String,
    pub time_label: String,
    pub bucket: BucketBadge,
    pub place_type: &'static str,
    pub address: String,
    pub notes: String,
    pub photos: Vec<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
}

impl PublicView {
    /// Resolve `token` and build the view.
    ///
    /// Each way the link can be dead has its own error so the page can say
    /// which one it is.
    pub fn load(store: &dyn PublicStore, token: &str, tz: Tz) -> Result<Self, NotFoundError> {
        let id = store
            .resolve_token(token)
            .ok_or_else(|| NotFoundError::TokenNotFound(token.to_string()))?;
        let snapshot = store
            .snapshot(&id)
            .ok_or_else(|| NotFoundError::SnapshotNotFound(token.to_string()))?;
        if !snapshot.is_public || store.is_revoked(token) {
            debug!(token, snapshot = %id, "public copy was revoked");
            return Err(NotFoundError::Revoked(token.to_string()));
        }

        debug!(token, snapshot = %id, stops = snapshot.stops.len(), "public copy resolved");
        Ok(Self::from_snapshot(&snapshot, tz))
    }

    pub fn from_snapshot(snapshot: &PublicItinerary, tz: Tz) -> Self {
        let days = group_by_day(&snapshot.stops)
            .iter()
            .map(|group| PublicDay {
                key: group.key,
                day_number: group.day_number,
                title: group.title(),
                stops: group
                    .stops
                    .iter()
                    .map(|stop| PublicStop {
                        id: stop.id.clone(),
                        name: stop.name.clone(),
                        time_label: time_label(stop),
                        bucket: resolve_display_bucket(stop).badge(),
                        place_type: stop.place_type.label(),
                        address: stop.address.clone(),
                        notes: stop.notes.clone(),
                        photos: stop.photos.clone(),
                        completed: stop.completed,
                        completed_at: stop.completed_at.map(|ts| format_local(ts, tz)),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: snapshot.name.clone(),
            date_range: snapshot.to_itinerary().date_range_label(),
            notes: snapshot.notes.clone(),
            theme: snapshot.theme,
            shared_at: format_local(snapshot.shared_at, tz),
            days,
        }
    }

    pub fn order(&self) -> ScheduleOrder {
        ScheduleOrder(
            self.days
                .iter()
                .map(|day| (day.key, day.stops.iter().map(|s| s.id.clone()).collect()))
                .collect(),
        )
    }
}
