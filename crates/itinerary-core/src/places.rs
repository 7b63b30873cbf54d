//! Place search.
//!
//! The external place service is network-bound and may fail at any time.
//! [`search_places`] and [`place_details`] turn every failure into "no
//! results" so the user can always fall back to manual entry.
//! [`SearchDebouncer`] makes sure only the latest keystroke triggers a
//! search.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LookupFailure;
use crate::models::{Coordinates, Stop, StopSource};

/// Queries shorter than this (after trimming) are not sent.
pub const MIN_QUERY_CHARS: usize = 3;

/// One ranked search suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacePrediction {
    pub place_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_text: Option<String>,
}

/// Resolved location of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub coordinates: Coordinates,
    pub formatted_address: String,
}

/// External place service.
pub trait PlaceLookup {
    fn predictions(&self, query: &str) -> Result<Vec<PlacePrediction>, LookupFailure>;
    fn details(&self, place_id: &str) -> Result<PlaceDetails, LookupFailure>;
}

/// Search for places, treating failures as no results.
pub fn search_places(lookup: &dyn PlaceLookup, query: &str) -> Vec<PlacePrediction> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    match lookup.predictions(query) {
        Ok(predictions) => {
            debug!(query, count = predictions.len(), "place search");
            predictions
        }
        Err(err) => {
            warn!(query, error = %err, "place search failed, showing no suggestions");
            Vec::new()
        }
    }
}

/// Fetch place details, treating failures as missing coordinates.
pub fn place_details(lookup: &dyn PlaceLookup, place_id: &str) -> Option<PlaceDetails> {
    lookup
        .details(place_id)
        .inspect_err(|err| warn!(place_id, error = %err, "place details failed"))
        .ok()
}

/// Fill a stop from a picked suggestion.
///
/// The name is only replaced when the user has not typed one.
pub fn apply_prediction(stop: &mut Stop, prediction: &PlacePrediction, details: Option<&PlaceDetails>) {
    if stop.name.trim().is_empty() {
        stop.name = prediction
            .main_text
            .clone()
            .unwrap_or_else(|| prediction.description.clone());
    }

    stop.source = StopSource::ExternalLookup {
        external_id: prediction.place_id.clone(),
    };

    match details {
        Some(details) => {
            stop.address = details.formatted_address.clone();
            stop.coordinates = Some(details.coordinates);
        }
        None => {
            if let Some(secondary) = &prediction.secondary_text {
                stop.address = secondary.clone();
            }
        }
    }
}

/// Debounce settings for the place search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingSearch {
    query: String,
    due_at: Instant,
}

/// Keystroke debouncer.
///
/// Each keystroke replaces the pending search and bumps a generation
/// counter; results for an older generation are stale and should be
/// dropped. [`cancel`](Self::cancel) must be called on teardown.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    generation: u64,
    pending: Option<PendingSearch>,
}

impl SearchDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            delay: config.delay,
            generation: 0,
            pending: None,
        }
    }

    /// Record a keystroke and return the generation it belongs to.
    pub fn keystroke(&mut self, query: impl Into<String>, now: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingSearch {
            query: query.into(),
            due_at: now + self.delay,
        });
        self.generation
    }

    /// The query to search for, once the delay has passed without another
    /// keystroke. Returns each query at most once.
    pub fn due(&mut self, now: Instant) -> Option<(u64, String)> {
        if self.pending.as_ref()?.due_at > now {
            return None;
        }
        self.pending
            .take()
            .map(|pending| (self.generation, pending.query))
    }

    /// Whether results for `generation` are still wanted.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending search and invalidate in-flight results.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.generation += 1;
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}
