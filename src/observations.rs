//! iNaturalist observation client
//!
//! Builds the observation search for a [`SearchQuery`] and returns the raw
//! `results` records untouched; shaping them is the job of
//! [`crate::normalize`].

use crate::config::ObservationsConfig;
use crate::query::SearchQuery;
use crate::{Result, WildwatchError};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Parameters of one observation search
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: u32,
    /// Sent as `d1`
    pub since: NaiveDate,
    pub per_page: u32,
    /// Sent as `q` when present
    pub term: Option<String>,
    /// Adds `threatened=true` when set
    pub threatened_only: bool,
}

impl ObservationQuery {
    #[must_use]
    pub fn from_search(search: &SearchQuery, config: &ObservationsConfig, today: NaiveDate) -> Self {
        Self {
            latitude: search.area.latitude,
            longitude: search.area.longitude,
            radius_km: config.radius_km,
            since: search.window_start(today),
            per_page: config.per_page,
            term: search.query_term(),
            threatened_only: search.threatened_only,
        }
    }

    /// Full request URL against `base_url`
    #[must_use]
    pub fn to_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/observations?lat={}&lng={}&radius={}&d1={}&per_page={}",
            base_url.trim_end_matches('/'),
            self.latitude,
            self.longitude,
            self.radius_km,
            self.since.format("%Y-%m-%d"),
            self.per_page
        );
        if let Some(term) = &self.term {
            url.push_str("&q=");
            url.push_str(&urlencoding::encode(term));
        }
        if self.threatened_only {
            url.push_str("&threatened=true");
        }
        url
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Client for the observation search endpoint
pub struct ObservationClient {
    client: Client,
    base_url: String,
}

impl ObservationClient {
    pub fn new(config: &ObservationsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("Wildwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WildwatchError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Run the search and return the raw `results` array
    #[instrument(skip(self, query), fields(lat = query.latitude, lng = query.longitude))]
    pub async fn fetch(&self, query: &ObservationQuery) -> Result<Vec<Value>> {
        let url = query.to_url(&self.base_url);
        debug!("iNaturalist request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WildwatchError::api(format!("Observation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WildwatchError::api(format!(
                "iNaturalist returned {status}: {body}"
            )));
        }

        let parsed: ObservationsResponse = response.json().await.map_err(|e| {
            WildwatchError::api(format!("Failed to parse iNaturalist response: {e}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Fetched {} raw observations in {:.3}s",
            parsed.results.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow observation API response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(parsed.results)
    }
}
