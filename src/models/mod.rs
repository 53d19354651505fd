//! Data models for the Wildwatch dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Location: the selected search area and its coordinates
//! - Weather: current weather and air quality snapshots
//! - Observation: normalized wildlife sightings and map points

pub mod location;
pub mod observation;
pub mod weather;

// Re-export all public types for convenient access
pub use location::AreaSelection;
pub use observation::{HeatPoint, Observation, Sighting};
pub use weather::{AirQualitySnapshot, AqiLevel, WeatherSnapshot};
