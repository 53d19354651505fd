//! Observation normalization
//!
//! Raw observation records are loosely shaped JSON: any field may be missing,
//! null, or of the wrong type. Each record is parsed on its own; a record
//! without usable coordinates is skipped and counted, the rest of the batch is
//! unaffected.

use crate::models::observation::{NO_LINK, UNKNOWN};
use crate::models::{HeatPoint, Observation, Sighting};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Result of normalizing one batch of raw records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedBatch {
    /// Marker data, one per accepted record, in input order
    pub observations: Vec<Observation>,
    /// One point per accepted record
    pub heat_points: Vec<HeatPoint>,
    /// `{species, date}` rows, one per accepted record
    pub sightings: Vec<Sighting>,
    /// Records dropped for missing or malformed coordinates
    pub skipped: usize,
}

impl NormalizedBatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Parse a single raw record. `None` means the record is skipped.
///
/// Coordinates are read from `geojson.coordinates`, which the API orders as
/// `[longitude, latitude]`.
#[must_use]
pub fn parse_observation(record: &Value) -> Option<Observation> {
    let record = record.as_object()?;

    let coordinates = record.get("geojson")?.get("coordinates")?.as_array()?;
    let longitude = coordinates.first()?.as_f64()?;
    let latitude = coordinates.get(1)?.as_f64()?;

    let point = HeatPoint {
        latitude,
        longitude,
    };
    if !point.is_valid() {
        return None;
    }

    Some(Observation {
        species: string_field(record.get("species_guess"), UNKNOWN),
        latitude,
        longitude,
        observed_on: string_field(record.get("observed_on"), UNKNOWN),
        source_url: string_field(record.get("uri"), NO_LINK),
    })
}

fn string_field(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Normalize a batch of raw records
#[must_use]
pub fn normalize(records: &[Value]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for (index, record) in records.iter().enumerate() {
        match parse_observation(record) {
            Some(observation) => {
                batch.heat_points.push(observation.heat_point());
                batch.sightings.push(observation.sighting());
                batch.observations.push(observation);
            }
            None => {
                debug!("Skipping observation record {} without usable coordinates", index);
                batch.skipped += 1;
            }
        }
    }

    info!(
        "Normalized {} of {} observation records ({} skipped)",
        batch.observations.len(),
        records.len(),
        batch.skipped
    );
    batch
}
