//! Normalized wildlife observation models

use serde::{Deserialize, Serialize};

/// Placeholder used when a record carries no species guess or date
pub const UNKNOWN: &str = "Unknown";

/// Placeholder link when a record has no `uri`
pub const NO_LINK: &str = "#";

/// One wildlife sighting extracted from a raw observation record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Observation {
    /// Species guess, "Unknown" if absent
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Raw `observed_on` text, "Unknown" if absent. Not guaranteed to be a date.
    pub observed_on: String,
    /// Link to the observation page, "#" if absent
    pub source_url: String,
}

impl Observation {
    #[must_use]
    pub fn heat_point(&self) -> HeatPoint {
        HeatPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    #[must_use]
    pub fn sighting(&self) -> Sighting {
        Sighting {
            species: self.species.clone(),
            date: self.observed_on.clone(),
        }
    }
}

/// A row of the sightings table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Sighting {
    pub species: String,
    /// Unparsed date text
    pub date: String,
}

/// A single point of the heat layer
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl HeatPoint {
    /// Finite and inside the WGS84 ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}
