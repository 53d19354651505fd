//! Dashboard service
//!
//! One search runs strictly in sequence: weather, air quality, observations,
//! then normalization and aggregation. The result is a self-contained
//! [`DashboardReport`]; nothing is kept between searches.

use crate::config::{ObservationsConfig, WildwatchConfig};
use crate::export;
use crate::heatmap::MapView;
use crate::models::{AirQualitySnapshot, Sighting, WeatherSnapshot};
use crate::normalize::{self, NormalizedBatch};
use crate::observations::{ObservationClient, ObservationQuery};
use crate::query::SearchQuery;
use crate::trend::{self, DailyCounts, DatedSighting, TrendChart};
use crate::weather::WeatherApiClient;
use crate::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Shown when a search returns no usable sightings
pub const NO_SIGHTINGS_WARNING: &str = "No sightings found for this animal/location.";

/// Weather and air quality section of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnvironmentPanel {
    /// Weather is shown; air quality may still have failed
    Available {
        weather: WeatherSnapshot,
        air_quality: Option<AirQualitySnapshot>,
        /// Banner text when the air quality call failed
        air_quality_error: Option<String>,
    },
    /// The weather call failed
    Unavailable { message: String },
}

/// Everything rendered for one search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub query: SearchQuery,
    /// `%Y-%m-%d %H:%M:%S`, local time
    pub last_updated: String,
    pub environment: EnvironmentPanel,
    pub map: MapView,
    /// `None` when no sighting has a parseable date
    pub trend: Option<TrendChart>,
    /// The full sightings table, unparsed dates included
    pub sightings: Vec<Sighting>,
    /// Rows offered for CSV download
    pub export_rows: Vec<DatedSighting>,
    /// Raw records dropped during normalization
    pub skipped_records: usize,
    pub warning: Option<String>,
}

impl DashboardReport {
    /// Assemble a report from already fetched data
    #[must_use]
    pub fn build(
        query: SearchQuery,
        environment: EnvironmentPanel,
        batch: NormalizedBatch,
        generated_at: NaiveDateTime,
    ) -> Self {
        let map = MapView::new(&query.area, &batch.observations, &batch.heat_points);

        let chart = match DailyCounts::from_sightings(&batch.sightings) {
            Ok(counts) => Some(TrendChart::new(query.chart, &counts)),
            Err(e) => {
                info!("Trend chart skipped: {}", e);
                None
            }
        };

        let warning = batch
            .is_empty()
            .then(|| NO_SIGHTINGS_WARNING.to_string());

        Self {
            last_updated: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            environment,
            map,
            trend: chart,
            export_rows: trend::dated_sightings(&batch.sightings),
            sightings: batch.sightings,
            skipped_records: batch.skipped,
            warning,
            query,
        }
    }

    /// CSV text for the download link
    pub fn csv(&self) -> Result<String> {
        export::sightings_csv(&self.export_rows)
    }
}

/// Application context shared by the CLI and the web server
pub struct DashboardService {
    weather: WeatherApiClient,
    observations: ObservationClient,
    observations_config: ObservationsConfig,
}

impl DashboardService {
    pub fn new(config: &WildwatchConfig) -> Result<Self> {
        Ok(Self {
            weather: WeatherApiClient::new(&config.weather)?,
            observations: ObservationClient::new(&config.observations)?,
            observations_config: config.observations.clone(),
        })
    }

    /// Weather and air quality for the area. Never fails: a weather failure
    /// becomes [`EnvironmentPanel::Unavailable`], an air quality failure keeps
    /// the weather reading and carries the error message alongside it.
    pub async fn environment(&self, latitude: f64, longitude: f64) -> EnvironmentPanel {
        let weather = match self.weather.current_weather(latitude, longitude).await {
            Ok(weather) => weather,
            Err(e) => {
                warn!("Weather unavailable: {}", e);
                return EnvironmentPanel::Unavailable {
                    message: e.user_message(),
                };
            }
        };

        match self.weather.air_quality(latitude, longitude).await {
            Ok(air_quality) => EnvironmentPanel::Available {
                weather,
                air_quality: Some(air_quality),
                air_quality_error: None,
            },
            Err(e) => {
                warn!("Air quality unavailable: {}", e);
                EnvironmentPanel::Available {
                    weather,
                    air_quality: None,
                    air_quality_error: Some(e.user_message()),
                }
            }
        }
    }

    /// Fetch and normalize the observations for a search. Fetch errors propagate.
    pub async fn sightings(&self, query: &SearchQuery, today: NaiveDate) -> Result<NormalizedBatch> {
        let observation_query =
            ObservationQuery::from_search(query, &self.observations_config, today);
        let records = self.observations.fetch(&observation_query).await?;
        Ok(normalize::normalize(&records))
    }

    /// Run one full search
    pub async fn search(&self, query: &SearchQuery) -> Result<DashboardReport> {
        info!(
            "Searching {} ({}) over {} days",
            query.area.name,
            query.area.format_coordinates(),
            query.days
        );

        let now = Local::now().naive_local();
        let environment = self
            .environment(query.area.latitude, query.area.longitude)
            .await;
        let batch = self.sightings(query, now.date()).await?;

        Ok(DashboardReport::build(query.clone(), environment, batch, now))
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🕒 Last Updated: {}", self.last_updated)?;
        writeln!(f)?;
        writeln!(f, "🌦️ Weather & Air Quality")?;
        match &self.environment {
            EnvironmentPanel::Available {
                weather,
                air_quality,
                air_quality_error,
            } => {
                writeln!(f, "   📍 Location: {}", weather.location_name)?;
                writeln!(f, "   🌡️ Temperature: {}", weather.format_temperature())?;
                writeln!(f, "   💧 Humidity: {}", weather.format_humidity())?;
                writeln!(f, "   📝 Condition: {}", weather.condition_text)?;
                if let Some(air_quality) = air_quality {
                    writeln!(f, "   🌫️ Air Quality Index: {}", air_quality.format_metric())?;
                }
                if let Some(message) = air_quality_error {
                    writeln!(f, "   ❌ {message}")?;
                }
            }
            EnvironmentPanel::Unavailable { message } => {
                writeln!(f, "   ❌ {message}")?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "🗺️ Animal Sightings near {} ({})",
            self.query.area.name,
            self.query.area.format_coordinates()
        )?;
        for marker in &self.map.markers {
            writeln!(
                f,
                "   - {} on {} ({:.1} km away) {}",
                marker.species, marker.date, marker.distance_km, marker.url
            )?;
        }
        if self.skipped_records > 0 {
            writeln!(
                f,
                "   ({} records without coordinates skipped)",
                self.skipped_records
            )?;
        }

        writeln!(f)?;
        writeln!(f, "📈 Animal Sightings Trend")?;
        if let Some(warning) = &self.warning {
            writeln!(f, "   ⚠️ {warning}")?;
        } else if let Some(chart) = &self.trend {
            writeln!(f, "   {}", chart.kind)?;
            for point in &chart.points {
                writeln!(
                    f,
                    "   {}  {:>3}  {}",
                    point.date,
                    point.count,
                    "█".repeat(point.count.min(50))
                )?;
            }
        } else {
            writeln!(f, "   No sightings with a valid date to chart.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AqiLevel, AreaSelection};
    use crate::query::ChartKind;
    use crate::test_support;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::json;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 8)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn query() -> SearchQuery {
        SearchQuery::new(AreaSelection::new("Lahore, Pakistan", 31.5497, 74.3436))
            .with_chart(ChartKind::Bar)
    }

    fn available() -> EnvironmentPanel {
        EnvironmentPanel::Available {
            weather: WeatherSnapshot {
                location_name: "Lahore".to_string(),
                temperature_celsius: 30.0,
                humidity_percent: 50.0,
                condition_text: "Haze".to_string(),
            },
            air_quality: Some(AirQualitySnapshot {
                aqi_index: 5,
                aqi_label: AqiLevel::VeryPoor,
            }),
            air_quality_error: None,
        }
    }

    #[test]
    fn test_build_report() {
        let records = vec![
            json!({"species_guess": "Deer", "geojson": {"coordinates": [74.30, 31.50]}, "observed_on": "2024-05-01", "uri": "https://example.org/1"}),
            json!({"species_guess": "Fox", "observed_on": "2024-05-01"}),
            json!({"species_guess": "Owl", "geojson": {"coordinates": [74.40, 31.60]}, "observed_on": "not-a-date"}),
        ];
        let batch = normalize::normalize(&records);

        let report = DashboardReport::build(query(), available(), batch, generated_at());

        assert_eq!(report.last_updated, "2024-05-08 09:30:00");
        assert_eq!(report.map.markers.len(), 2);
        assert_eq!(report.map.heat_points.len(), 2);
        assert_eq!(report.sightings.len(), 2);
        assert_eq!(report.skipped_records, 1);
        assert!(report.warning.is_none());

        let trend = report.trend.as_ref().unwrap();
        assert_eq!(trend.kind, ChartKind::Bar);
        assert_eq!(trend.points.len(), 1);
        assert_eq!(trend.points[0].count, 1);

        assert_eq!(report.csv().unwrap(), "Species,Date\nDeer,2024-05-01\n");
    }

    #[test]
    fn test_empty_search_warns() {
        let report = DashboardReport::build(
            query(),
            EnvironmentPanel::Unavailable {
                message: "Error: timeout".to_string(),
            },
            NormalizedBatch::default(),
            generated_at(),
        );

        assert_eq!(report.warning.as_deref(), Some(NO_SIGHTINGS_WARNING));
        assert!(report.trend.is_none());
        assert!(report.map.heat_layer.is_empty());

        let text = report.to_string();
        assert!(text.contains("Error: timeout"));
        assert!(text.contains(NO_SIGHTINGS_WARNING));
    }

    #[test]
    fn test_undated_sightings_have_no_trend_but_no_warning() {
        let records = vec![json!({"geojson": {"coordinates": [74.3, 31.5]}})];
        let report = DashboardReport::build(
            query(),
            available(),
            normalize::normalize(&records),
            generated_at(),
        );
        assert!(report.warning.is_none());
        assert!(report.trend.is_none());
        assert!(report.export_rows.is_empty());
        assert!(report.to_string().contains("No sightings with a valid date"));
    }

    #[test]
    fn test_report_serializes_environment_status() {
        let report = DashboardReport::build(
            query(),
            available(),
            NormalizedBatch::default(),
            generated_at(),
        );
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["environment"]["status"], "available");
        assert_eq!(value["environment"]["air_quality"]["aqi_label"], "Very Poor");
        assert_eq!(value["query"]["chart"], "bar");
    }

    #[tokio::test]
    async fn test_search_with_all_services_up() {
        let base = test_support::serve(
            test_support::weather_ok()
                .merge(test_support::air_quality_ok())
                .merge(test_support::observations_ok()),
        )
        .await;
        let service = DashboardService::new(&test_support::config_for(&base, &base)).unwrap();

        let report = service.search(&query()).await.unwrap();

        match &report.environment {
            EnvironmentPanel::Available {
                weather,
                air_quality,
                air_quality_error,
            } => {
                assert_eq!(weather.location_name, "Lahore");
                assert_eq!(weather.condition_text, "Haze");
                assert_eq!(air_quality.as_ref().map(|a| a.aqi_label), Some(AqiLevel::Moderate));
                assert!(air_quality_error.is_none());
            }
            other => panic!("expected weather, got {other:?}"),
        }
        assert_eq!(report.sightings.len(), 1);
        assert_eq!(report.skipped_records, 1);
    }

    #[tokio::test]
    async fn test_air_quality_failure_keeps_weather() {
        let base = test_support::serve(
            test_support::weather_ok()
                .merge(test_support::air_quality_unauthorized())
                .merge(test_support::observations_ok()),
        )
        .await;
        let service = DashboardService::new(&test_support::config_for(&base, &base)).unwrap();

        let report = service.search(&query()).await.unwrap();

        match &report.environment {
            EnvironmentPanel::Available {
                weather,
                air_quality,
                air_quality_error,
            } => {
                assert_eq!(weather.location_name, "Lahore");
                assert!(air_quality.is_none());
                assert!(air_quality_error.as_deref().unwrap().contains("401"));
            }
            other => panic!("expected weather, got {other:?}"),
        }
        assert_eq!(report.sightings.len(), 1);

        let text = report.to_string();
        assert!(text.contains("Lahore"));
        assert!(text.contains("❌ Error:"));
    }

    #[tokio::test]
    async fn test_weather_failure_shows_banner_and_keeps_sightings() {
        let observations = test_support::serve(test_support::observations_ok()).await;
        let service = DashboardService::new(&test_support::config_for(
            test_support::UNREACHABLE,
            &observations,
        ))
        .unwrap();

        let report = service.search(&query()).await.unwrap();

        match &report.environment {
            EnvironmentPanel::Unavailable { message } => assert!(message.starts_with("Error:")),
            other => panic!("expected an error banner, got {other:?}"),
        }
        assert_eq!(report.sightings.len(), 1);
        assert_eq!(report.export_rows.len(), 1);
        assert!(report.trend.is_some());
    }

    #[tokio::test]
    async fn test_observation_failure_aborts_search() {
        let weather = test_support::serve(
            test_support::weather_ok().merge(test_support::air_quality_ok()),
        )
        .await;
        let service = DashboardService::new(&test_support::config_for(
            &weather,
            test_support::UNREACHABLE,
        ))
        .unwrap();

        let result = service.search(&query()).await;
        assert!(matches!(result, Err(crate::WildwatchError::Api { .. })));
    }

    #[tokio::test]
    async fn test_observation_error_status_is_an_error() {
        let base = test_support::serve(
            Router::new().route(
                "/observations",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            ),
        )
        .await;
        let service = DashboardService::new(&test_support::config_for(&base, &base)).unwrap();

        let err = service
            .sightings(&query(), NaiveDate::from_ymd_opt(2024, 5, 8).unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
