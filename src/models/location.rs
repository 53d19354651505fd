//! Search area model

use serde::{Deserialize, Serialize};

/// A resolved search area
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AreaSelection {
    /// Display name ("Lahore, Pakistan" or "Custom")
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl AreaSelection {
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates lie inside the valid WGS84 ranges
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let area = AreaSelection::new("Lahore, Pakistan", 31.5497, 74.3436);
        assert_eq!(area.format_coordinates(), "31.5497, 74.3436");
    }

    #[test]
    fn test_bounds() {
        assert!(AreaSelection::new("Custom", -90.0, 180.0).is_within_bounds());
        assert!(!AreaSelection::new("Custom", 91.0, 0.0).is_within_bounds());
        assert!(!AreaSelection::new("Custom", 0.0, -180.5).is_within_bounds());
        assert!(!AreaSelection::new("Custom", f64::NAN, 0.0).is_within_bounds());
    }
}
