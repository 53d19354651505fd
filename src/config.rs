//! Configuration management for the Wildwatch dashboard
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::WildwatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WildwatchConfig {
    /// Weather and air pollution API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Observation API configuration
    #[serde(default)]
    pub observations: ObservationsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// OpenWeatherMap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Value sent as `appid`
    #[serde(default = "default_weather_api_key")]
    pub api_key: String,
    /// Base URL for the current weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Base URL for the air pollution endpoint
    #[serde(default = "default_air_quality_base_url")]
    pub air_quality_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// iNaturalist settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationsConfig {
    #[serde(default = "default_observations_base_url")]
    pub base_url: String,
    /// Search radius around the selected area in kilometers
    #[serde(default = "default_radius")]
    pub radius_km: u32,
    /// Number of observations requested per search
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for any path outside `/api`
    #[serde(default)]
    pub static_dir: Option<String>,
}

// Default value functions
fn default_weather_api_key() -> String {
    "Give It Your APi".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_air_quality_base_url() -> String {
    "http://api.openweathermap.org/data/2.5".to_string()
}

fn default_observations_base_url() -> String {
    "https://api.inaturalist.org/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_radius() -> u32 {
    50
}

fn default_per_page() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_weather_api_key(),
            base_url: default_weather_base_url(),
            air_quality_base_url: default_air_quality_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ObservationsConfig {
    fn default() -> Self {
        Self {
            base_url: default_observations_base_url(),
            radius_km: default_radius(),
            per_page: default_per_page(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: None,
        }
    }
}

impl WildwatchConfig {
    /// Load configuration from `config_path`, or the default file location
    /// when `None`, then overlay environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WILDWATCH_WEATHER__API_KEY -> weather.api_key
        builder = builder.add_source(
            Environment::with_prefix("WILDWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WildwatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wildwatch").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.api_key.is_empty() {
            self.weather.api_key = default_weather_api_key();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.air_quality_base_url.is_empty() {
            self.weather.air_quality_base_url = default_air_quality_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.observations.base_url.is_empty() {
            self.observations.base_url = default_observations_base_url();
        }
        if self.observations.radius_km == 0 {
            self.observations.radius_km = default_radius();
        }
        if self.observations.per_page == 0 {
            self.observations.per_page = default_per_page();
        }
        if self.observations.timeout_seconds == 0 {
            self.observations.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 || self.observations.timeout_seconds > 300 {
            return Err(WildwatchError::config("API timeout cannot exceed 300 seconds").into());
        }

        if !(1..=500).contains(&self.observations.radius_km) {
            return Err(
                WildwatchError::config("Observation radius must be between 1 and 500 km").into(),
            );
        }

        if !(1..=200).contains(&self.observations.per_page) {
            return Err(WildwatchError::config(
                "Observations per page must be between 1 and 200",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WildwatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WildwatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (label, url) in [
            ("Weather API", &self.weather.base_url),
            ("Air quality API", &self.weather.air_quality_base_url),
            ("Observation API", &self.observations.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WildwatchError::config(format!(
                    "{label} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WildwatchConfig::default();
        assert_eq!(
            config.weather.base_url,
            "https://api.openweathermap.org/data/2.5"
        );
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.observations.radius_km, 50);
        assert_eq!(config.observations.per_page, 100);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = WildwatchConfig::default();
        config.weather.api_key.clear();
        config.observations.per_page = 0;
        config.logging.format.clear();

        config.apply_defaults();

        assert_eq!(config.weather.api_key, "Give It Your APi");
        assert_eq!(config.observations.per_page, 100);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WildwatchConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WildwatchConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = WildwatchConfig::default();
        config.observations.per_page = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = WildwatchConfig::default();
        config.observations.base_url = "ftp://example.org".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Observation API"));
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let config =
            WildwatchConfig::load_from_path(Some(PathBuf::from("does/not/exist.toml"))).unwrap();
        assert_eq!(config.observations.base_url, "https://api.inaturalist.org/v1");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WildwatchConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("wildwatch"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
