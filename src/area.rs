//! Area Resolution Module
//!
//! Maps a selected area (one of the preset cities or a custom coordinate pair)
//! to the coordinates every search is centered on.

use crate::models::AreaSelection;
use crate::{Result, WildwatchError};
use std::str::FromStr;
use tracing::debug;

/// Name of the selector entry that takes user-entered coordinates
pub const CUSTOM_AREA: &str = "Custom";

/// Coordinates used for a custom area when the user leaves them unset
pub const DEFAULT_CUSTOM_LATITUDE: f64 = 30.3751;
pub const DEFAULT_CUSTOM_LONGITUDE: f64 = 69.3451;

/// Preset areas in selector order
pub const PRESET_AREAS: [(&str, f64, f64); 7] = [
    ("Lahore, Pakistan", 31.5497, 74.3436),
    ("Islamabad, Pakistan", 33.6844, 73.0479),
    ("Karachi, Pakistan", 24.8607, 67.0011),
    ("New York, USA", 40.7128, -74.0060),
    ("London, UK", 51.5074, -0.1278),
    ("Delhi, India", 28.6139, 77.2090),
    ("Tokyo, Japan", 35.6762, 139.6503),
];

/// A key of the area selector. Built by parsing a selector name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaKey {
    Preset(PresetArea),
    Custom,
}

/// A valid position in [`PRESET_AREAS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetArea(usize);

impl PresetArea {
    /// Name and coordinates of this preset
    #[must_use]
    pub fn entry(self) -> (&'static str, f64, f64) {
        PRESET_AREAS[self.0]
    }
}

impl AreaKey {
    /// Every selector entry: the presets followed by "Custom"
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        PRESET_AREAS
            .iter()
            .map(|(name, _, _)| *name)
            .chain(std::iter::once(CUSTOM_AREA))
            .collect()
    }
}

impl Default for AreaKey {
    fn default() -> Self {
        AreaKey::Preset(PresetArea(0))
    }
}

impl FromStr for AreaKey {
    type Err = WildwatchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case(CUSTOM_AREA) {
            return Ok(AreaKey::Custom);
        }
        PRESET_AREAS
            .iter()
            .position(|(name, _, _)| name.eq_ignore_ascii_case(wanted))
            .map(|index| AreaKey::Preset(PresetArea(index)))
            .ok_or_else(|| {
                WildwatchError::validation(format!(
                    "Unknown area '{wanted}'. Must be one of: {}",
                    AreaKey::names().join("; ")
                ))
            })
    }
}

/// User-entered coordinates for the "Custom" entry
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CustomCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Resolves selector keys to coordinates
pub struct AreaResolver;

impl AreaResolver {
    /// Resolve a selector key. Never fails: presets come from a fixed table and
    /// missing custom coordinates fall back to the defaults.
    #[must_use]
    pub fn resolve(key: AreaKey, custom: CustomCoordinates) -> AreaSelection {
        let area = match key {
            AreaKey::Preset(preset) => {
                let (name, lat, lon) = preset.entry();
                AreaSelection::new(name, lat, lon)
            }
            AreaKey::Custom => AreaSelection::new(
                CUSTOM_AREA,
                custom.latitude.unwrap_or(DEFAULT_CUSTOM_LATITUDE),
                custom.longitude.unwrap_or(DEFAULT_CUSTOM_LONGITUDE),
            ),
        };

        debug!(
            "Resolved area: {} at ({}, {})",
            area.name, area.latitude, area.longitude
        );
        area
    }
}
