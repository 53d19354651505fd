//! Weather and air quality snapshots and display methods

use crate::{Result, WildwatchError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current conditions at the search coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Place name reported by the weather service
    pub location_name: String,
    /// Temperature in Celsius
    pub temperature_celsius: f64,
    /// Relative humidity percentage (0-100)
    pub humidity_percent: f64,
    /// Human-readable description of weather conditions
    pub condition_text: String,
}

impl WeatherSnapshot {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{} °C", self.temperature_celsius)
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{} %", self.humidity_percent)
    }

    /// Capitalize a raw condition description: first character upper case,
    /// the rest lower case ("broken CLOUDS" -> "Broken clouds").
    #[must_use]
    pub fn capitalize_condition(raw: &str) -> String {
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}

/// Air quality tier on the 1..5 scale
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl AqiLevel {
    /// Ordered by index, `LEVELS[aqi - 1]`
    pub const LEVELS: [AqiLevel; 5] = [
        AqiLevel::Good,
        AqiLevel::Fair,
        AqiLevel::Moderate,
        AqiLevel::Poor,
        AqiLevel::VeryPoor,
    ];

    /// Look up the tier for an API index. Anything outside 1..=5 is rejected.
    pub fn from_index(index: i64) -> Result<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| Self::LEVELS.get(i).copied())
            .ok_or_else(|| {
                WildwatchError::validation(format!("AQI index {index} is outside the range 1-5"))
            })
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Air pollution reading at the search coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQualitySnapshot {
    /// Index reported by the API (1..=5)
    pub aqi_index: u8,
    pub aqi_label: AqiLevel,
}

impl AirQualitySnapshot {
    pub fn from_index(index: i64) -> Result<Self> {
        let level = AqiLevel::from_index(index)?;
        Ok(Self {
            // from_index only succeeds for 1..=5
            aqi_index: u8::try_from(index).unwrap_or_default(),
            aqi_label: level,
        })
    }

    /// Metric text, e.g. "3 - Moderate"
    #[must_use]
    pub fn format_metric(&self) -> String {
        format!("{} - {}", self.aqi_index, self.aqi_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Good")]
    #[case(2, "Fair")]
    #[case(3, "Moderate")]
    #[case(4, "Poor")]
    #[case(5, "Very Poor")]
    fn test_aqi_label_lookup(#[case] index: i64, #[case] label: &str) {
        assert_eq!(AqiLevel::from_index(index).unwrap().label(), label);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn test_aqi_out_of_range_is_an_error(#[case] index: i64) {
        let err = AqiLevel::from_index(index).unwrap_err();
        assert!(matches!(err, WildwatchError::Validation { .. }));
    }

    #[test]
    fn test_aqi_level_serializes_as_label() {
        let snapshot = AirQualitySnapshot::from_index(5).unwrap();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["aqi_label"], "Very Poor");

        let parsed: AqiLevel = serde_json::from_str("\"Very Poor\"").unwrap();
        assert_eq!(parsed, AqiLevel::VeryPoor);
    }

    #[test]
    fn test_air_quality_metric() {
        let snapshot = AirQualitySnapshot::from_index(3).unwrap();
        assert_eq!(snapshot.aqi_index, 3);
        assert_eq!(snapshot.format_metric(), "3 - Moderate");
    }

    #[test]
    fn test_capitalize_condition() {
        assert_eq!(
            WeatherSnapshot::capitalize_condition("broken CLOUDS"),
            "Broken clouds"
        );
        assert_eq!(WeatherSnapshot::capitalize_condition("haze"), "Haze");
        assert_eq!(WeatherSnapshot::capitalize_condition(""), "");
    }

    #[test]
    fn test_weather_formatting() {
        let weather = WeatherSnapshot {
            location_name: "Lahore".to_string(),
            temperature_celsius: 31.5,
            humidity_percent: 40.0,
            condition_text: "Haze".to_string(),
        };
        assert_eq!(weather.format_temperature(), "31.5 °C");
        assert_eq!(weather.format_humidity(), "40 %");
    }
}
