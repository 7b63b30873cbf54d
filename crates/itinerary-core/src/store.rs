//! Document store port.
//!
//! The engine only needs four operations from the backing database. Records
//! are JSON objects; [`MemoryStore`] keeps them in memory for tests and the
//! CLI.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;
use crate::models::Itinerary;

/// Collection holding private itineraries.
pub const ITINERARIES: &str = "itineraries";

/// A stored document.
pub type Record = serde_json::Map<String, Value>;

/// Minimal document database interface.
pub trait DocumentStore {
    /// All records of a collection, each with its `id` field set.
    fn load(&self, collection: &str) -> Result<Vec<Record>, StoreError>;

    /// Insert a record and return its id. A string `id` field is used as
    /// the id when present.
    fn add(&mut self, collection: &str, record: Record) -> Result<String, StoreError>;

    /// Merge `patch` into an existing record, key by key.
    fn update(&mut self, collection: &str, id: &str, patch: Record) -> Result<(), StoreError>;

    /// Delete a record. Deleting a missing record is not an error.
    fn remove(&mut self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: BTreeMap<String, BTreeMap<String, Record>>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<&Record> {
        self.collections.get(collection)?.get(id)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, record)| {
                        let mut record = record.clone();
                        record.insert("id".to_string(), Value::String(id.clone()));
                        record
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn add(&mut self, collection: &str, record: Record) -> Result<String, StoreError> {
        let id = match record.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                self.next_id += 1;
                format!("doc-{}", self.next_id)
            }
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }

    fn update(&mut self, collection: &str, id: &str, patch: Record) -> Result<(), StoreError> {
        let record = self
            .collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        record.extend(patch);
        Ok(())
    }

    fn remove(&mut self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(records) = self.collections.get_mut(collection) {
            records.remove(id);
        }
        Ok(())
    }
}

/// Serialize a value into a [`Record`].
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Load every itinerary, skipping records that do not deserialize.
pub fn load_itineraries(store: &dyn DocumentStore) -> Result<Vec<Itinerary>, StoreError> {
    let records = store.load(ITINERARIES)?;
    Ok(records
        .into_iter()
        .filter_map(|record| {
            let id = record.get("id").cloned();
            match serde_json::from_value::<Itinerary>(Value::Object(record)) {
                Ok(itinerary) => Some(itinerary),
                Err(err) => {
                    warn!(?id, error = %err, "skipping malformed itinerary record");
                    None
                }
            }
        })
        .collect())
}

/// Store a new itinerary and return it with its assigned id.
pub fn add_itinerary(
    store: &mut dyn DocumentStore,
    itinerary: &Itinerary,
) -> Result<Itinerary, StoreError> {
    let id = store.add(ITINERARIES, to_record(itinerary)?)?;
    let mut stored = itinerary.clone();
    stored.id = id;
    Ok(stored)
}
