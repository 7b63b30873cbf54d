use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use itinerary_core::grouping::DayKey;
use itinerary_core::models::Itinerary;
use itinerary_core::ordering::MoveDirection;
use itinerary_core::parse::parse_timestamp;
use itinerary_core::pdf::PdfLayout;
use itinerary_core::public::MemoryPublicStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CliError, CliResult};

fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = read_input(path)?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {path}"))
}

pub fn load_itinerary(path: &str) -> CliResult<Itinerary> {
    read_json(path).map_err(|e| CliError::runtime(format!("{e:#}")))
}

pub fn load_layout(path: Option<&str>) -> CliResult<PdfLayout> {
    match path {
        Some(path) => read_json(path).map_err(|e| CliError::runtime(format!("{e:#}"))),
        None => Ok(PdfLayout::default()),
    }
}

pub fn load_public_store(path: &str) -> CliResult<MemoryPublicStore> {
    read_json(path).map_err(|e| CliError::runtime(format!("{e:#}")))
}

/// Load a public store, starting empty when the file does not exist yet.
pub fn load_or_create_public_store(path: &str) -> CliResult<MemoryPublicStore> {
    if Path::new(path).exists() {
        load_public_store(path)
    } else {
        Ok(MemoryPublicStore::new())
    }
}

pub fn save_public_store(path: &str, store: &MemoryPublicStore) -> CliResult<()> {
    let json = serde_json::to_string_pretty(store)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write file: {path}"))
        .map_err(|e| CliError::runtime(format!("{e:#}")))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    itinerary_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

/// Parse `--now`, falling back to the current time.
pub fn parse_now(value: Option<&str>) -> CliResult<DateTime<Utc>> {
    match value {
        Some(value) => parse_timestamp(value)
            .map_err(|e| CliError::input(format!("Invalid --now '{}': {}", value, e))),
        None => Ok(Utc::now()),
    }
}

pub fn parse_day_key(s: &str) -> CliResult<DayKey> {
    s.parse::<DayKey>().map_err(|e| {
        CliError::input(format!(
            "Invalid day '{}': {}. Expected: YYYY-MM-DD, unscheduled",
            s, e
        ))
    })
}

/// Parse a `--move` value of the form `ID:up` or `ID:down`.
pub fn parse_move(s: &str) -> CliResult<(String, MoveDirection)> {
    let (id, direction) = s
        .rsplit_once(':')
        .filter(|(id, _)| !id.is_empty())
        .ok_or_else(|| {
            CliError::input(format!("Invalid move '{}'. Expected: ID:up, ID:down", s))
        })?;
    let direction = direction
        .parse::<MoveDirection>()
        .map_err(|e| CliError::input(format!("Invalid move '{}': {}", s, e)))?;
    Ok((id.to_string(), direction))
}
