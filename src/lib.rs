//! `Wildwatch` - wildlife sightings and environmental conditions dashboard
//!
//! This library fetches current weather, air quality and recent wildlife
//! observations around a selected area, and shapes them into map layers, a
//! daily sightings trend and a CSV export.

pub mod api;
pub mod area;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod heatmap;
pub mod models;
pub mod normalize;
pub mod observations;
pub mod query;
pub mod telemetry;
#[cfg(test)]
mod test_support;
pub mod trend;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use area::{AreaKey, AreaResolver, CustomCoordinates};
pub use config::WildwatchConfig;
pub use dashboard::{DashboardReport, DashboardService, EnvironmentPanel};
pub use error::WildwatchError;
pub use models::{AirQualitySnapshot, AqiLevel, AreaSelection, HeatPoint, Observation, Sighting, WeatherSnapshot};
pub use normalize::{NormalizedBatch, normalize, parse_observation};
pub use query::{ChartKind, SearchQuery};
pub use trend::{DailyCounts, DatedSighting, TrendChart};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WildwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
