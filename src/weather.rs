//! Weather API client for OpenWeatherMap
//!
//! Fetches current conditions and the air pollution index for a coordinate
//! pair. Both calls are plain GETs authenticated with the static `appid`.

use crate::config::WeatherConfig;
use crate::models::{AirQualitySnapshot, WeatherSnapshot};
use crate::{Result, WildwatchError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Weather and air pollution client
pub struct WeatherApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    air_quality_base_url: String,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("Wildwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WildwatchError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            air_quality_base_url: config.air_quality_base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn weather_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url,
            lat,
            lon,
            urlencoding::encode(&self.api_key)
        )
    }

    #[must_use]
    pub fn air_quality_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/air_pollution?lat={}&lon={}&appid={}",
            self.air_quality_base_url,
            lat,
            lon,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Get current weather for a location
    #[instrument(skip(self))]
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot> {
        info!("Getting current weather for coordinates: {:.4}, {:.4}", lat, lon);

        let response: openweathermap::WeatherResponse =
            self.get_json(&self.weather_url(lat, lon)).await?;
        response.into_snapshot()
    }

    /// Get the air quality index for a location
    #[instrument(skip(self))]
    pub async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQualitySnapshot> {
        info!("Getting air quality for coordinates: {:.4}, {:.4}", lat, lon);

        let response: openweathermap::AirPollutionResponse =
            self.get_json(&self.air_quality_url(lat, lon)).await?;
        response.into_snapshot()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let start_time = Instant::now();
        debug!("OpenWeatherMap request: {}", redact_api_key(url));

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Weather request failed: {}", e);
            WildwatchError::api(format!("Weather request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenWeatherMap returned HTTP {}", status);
            return Err(WildwatchError::api(format!(
                "OpenWeatherMap returned {status}: {body}"
            )));
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse weather response: {}", e);
            WildwatchError::api(format!("Invalid data received from OpenWeatherMap: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Successfully retrieved weather data in {:.3}s",
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow API response detected: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(parsed)
    }
}

/// Strip the `appid` value from a URL before logging it
fn redact_api_key(url: &str) -> String {
    match url.split_once("appid=") {
        Some((head, tail)) => {
            let rest = tail.find('&').map_or("", |i| &tail[i..]);
            format!("{head}appid=***{rest}")
        }
        None => url.to_string(),
    }
}

/// OpenWeatherMap response structures and conversion utilities
mod openweathermap {
    use crate::models::{AirQualitySnapshot, WeatherSnapshot};
    use crate::{Result, WildwatchError};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct WeatherResponse {
        pub name: Option<String>,
        pub main: MainBlock,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub humidity: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionResponse {
        #[serde(default)]
        pub list: Vec<AirPollutionEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionEntry {
        pub main: AirPollutionMain,
    }

    #[derive(Debug, Deserialize)]
    pub struct AirPollutionMain {
        pub aqi: i64,
    }

    impl WeatherResponse {
        pub fn into_snapshot(self) -> Result<WeatherSnapshot> {
            let condition = self
                .weather
                .into_iter()
                .next()
                .ok_or_else(|| WildwatchError::api("Weather response has no conditions"))?;

            Ok(WeatherSnapshot {
                location_name: self
                    .name
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                temperature_celsius: self.main.temp,
                humidity_percent: self.main.humidity,
                condition_text: WeatherSnapshot::capitalize_condition(&condition.description),
            })
        }
    }

    impl AirPollutionResponse {
        pub fn into_snapshot(self) -> Result<AirQualitySnapshot> {
            let entry = self
                .list
                .into_iter()
                .next()
                .ok_or_else(|| WildwatchError::api("Air pollution response has no entries"))?;
            AirQualitySnapshot::from_index(entry.main.aqi)
        }
    }
}
