//! Error types for itinerary-core.
//!
//! One error family per failure class: validation of user input, ordering
//! conflicts from manual moves, place lookup failures, missing public
//! copies, and document store failures. [`ItineraryError`] wraps them all.

use chrono::NaiveDate;
use thiserror::Error;

use crate::grouping::DayKey;
use crate::ordering::MoveDirection;

/// Rejected user input. The operation is refused and state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Stop date outside the itinerary's inclusive date range.
    #[error("{date} is outside the itinerary dates: pick a day between {start} and {end}")]
    DateOutOfRange {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Stop name is empty or whitespace.
    #[error("a stop needs a name")]
    MissingName,

    /// Time is not a 24-hour "HH:MM" string.
    #[error("invalid time '{0}': expected HH:MM (24-hour)")]
    InvalidTime(String),

    /// Itinerary end date before its start date.
    #[error("the itinerary ends ({end}) before it starts ({start})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// No stop with this id in the itinerary.
    #[error("unknown stop '{0}'")]
    UnknownStop(String),

    /// A stop with this id already exists.
    #[error("a stop with id '{0}' already exists")]
    DuplicateStop(String),
}

/// A manual move that would contradict same-day time ordering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "cannot move '{stop_name}' {} '{neighbour_name}' on {day}: '{neighbour_name}' is scheduled {} ({neighbour_key} vs {stop_key})",
    .direction.preposition(),
    .direction.conflict_relation()
)]
pub struct OrderingConflict {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_key: String,
    pub neighbour_id: String,
    pub neighbour_name: String,
    pub neighbour_key: String,
    pub direction: MoveDirection,
    pub day: DayKey,
}

/// A place search or details request failed.
///
/// Never escapes the wrappers in [`crate::places`]; it degrades to
/// "no results".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("place lookup failed: {0}")]
pub struct LookupFailure(pub String);

/// A public copy could not be shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// The share token is not known.
    #[error("share link '{0}' does not exist")]
    TokenNotFound(String),

    /// The token resolves, but the snapshot behind it is gone.
    #[error("the shared itinerary behind '{0}' no longer exists")]
    SnapshotNotFound(String),

    /// The snapshot exists but is no longer public.
    #[error("sharing was turned off for '{0}'")]
    Revoked(String),
}

impl NotFoundError {
    /// Title for the "unavailable" screen.
    pub fn title(&self) -> &'static str {
        match self {
            NotFoundError::TokenNotFound(_) => "Link not found",
            NotFoundError::SnapshotNotFound(_) => "Itinerary not found",
            NotFoundError::Revoked(_) => "No longer shared",
        }
    }

    /// Body text for the "unavailable" screen.
    pub fn message(&self) -> &'static str {
        match self {
            NotFoundError::TokenNotFound(_) => {
                "This share link is invalid. Check that you copied the whole address."
            }
            NotFoundError::SnapshotNotFound(_) => {
                "The itinerary behind this link has been deleted."
            }
            NotFoundError::Revoked(_) => "The owner has stopped sharing this itinerary.",
        }
    }
}

/// Document store or file storage failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no record '{id}' in '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("upload of '{file}' failed: {reason}")]
    Upload { file: String, reason: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// The main error type for itinerary operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItineraryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ordering(#[from] OrderingConflict),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid timezone name provided.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Result type alias for itinerary operations.
pub type Result<T> = std::result::Result<T, ItineraryError>;
