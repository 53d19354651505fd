//! Map layers: observation markers and the heat overlay

use crate::models::{AreaSelection, HeatPoint, Observation};
use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Initial zoom level of the sightings map
pub const DEFAULT_ZOOM: u8 = 7;

/// Decimal places kept when binning heat points (about 1 km cells)
pub const DEFAULT_HEAT_PRECISION: u32 = 2;

fn calculate_distance(from: &AreaSelection, to: &HeatPoint) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// One clickable observation on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub species: String,
    pub date: String,
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Great-circle distance from the search center
    pub distance_km: f64,
}

impl Marker {
    #[must_use]
    pub fn from_observation(observation: &Observation, center: &AreaSelection) -> Self {
        Self {
            species: observation.species.clone(),
            date: observation.observed_on.clone(),
            url: observation.source_url.clone(),
            latitude: observation.latitude,
            longitude: observation.longitude,
            distance_km: calculate_distance(center, &observation.heat_point()),
        }
    }
}

/// A binned cell of the heat overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub latitude: f64,
    pub longitude: f64,
    /// Point count relative to the densest cell, in (0, 1]
    pub intensity: f64,
    pub count: usize,
}

/// Density overlay built from the heat points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatLayer {
    pub cells: Vec<HeatCell>,
}

impl HeatLayer {
    /// Bin points to `precision` decimal places and weight each cell by its
    /// share of the densest cell. No points gives an empty layer.
    #[must_use]
    pub fn from_points(points: &[HeatPoint], precision: u32) -> Self {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let mut bins: BTreeMap<(i64, i64), usize> = BTreeMap::new();

        for point in points.iter().filter(|p| p.is_valid()) {
            #[allow(clippy::cast_possible_truncation)]
            let key = (
                (point.latitude * multiplier).round() as i64,
                (point.longitude * multiplier).round() as i64,
            );
            *bins.entry(key).or_insert(0) += 1;
        }

        let max_count = bins.values().copied().max().unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let cells = bins
            .into_iter()
            .map(|((lat, lon), count)| HeatCell {
                latitude: lat as f64 / multiplier,
                longitude: lon as f64 / multiplier,
                intensity: count as f64 / max_count as f64,
                count,
            })
            .collect();

        Self { cells }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Map widget input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: HeatPoint,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    /// Unbinned points, one per marker
    pub heat_points: Vec<HeatPoint>,
    pub heat_layer: HeatLayer,
}

impl MapView {
    #[must_use]
    pub fn new(center: &AreaSelection, observations: &[Observation], heat_points: &[HeatPoint]) -> Self {
        Self {
            center: HeatPoint {
                latitude: center.latitude,
                longitude: center.longitude,
            },
            zoom: DEFAULT_ZOOM,
            markers: observations
                .iter()
                .map(|o| Marker::from_observation(o, center))
                .collect(),
            heat_points: heat_points.to_vec(),
            heat_layer: HeatLayer::from_points(heat_points, DEFAULT_HEAT_PRECISION),
        }
    }
}
