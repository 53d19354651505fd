//! JSON API consumed by the dashboard frontend

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::area::{AreaKey, AreaResolver, CustomCoordinates, PRESET_AREAS};
use crate::dashboard::{DashboardReport, DashboardService};
use crate::export::{self, EXPORT_FILE_NAME};
use crate::query::{ANIMAL_OPTIONS, ChartKind, DEFAULT_DAYS, SearchQuery};
use crate::trend;
use crate::{Result, WildwatchError};

/// Shared request context
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: DashboardService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Search filters as sent by the frontend or typed on the command line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Selector entry, defaults to the first preset
    pub area: Option<String>,
    /// Custom latitude, used when `area` is "Custom"
    pub lat: Option<f64>,
    /// Custom longitude, used when `area` is "Custom"
    pub lon: Option<f64>,
    pub animal: Option<String>,
    pub custom_animal: Option<String>,
    pub days: Option<u32>,
    #[serde(default)]
    pub threatened: bool,
    pub chart: Option<ChartKind>,
}

impl SearchParams {
    /// Validate the filters and resolve the area
    pub fn into_query(self) -> Result<SearchQuery> {
        let key = match &self.area {
            Some(name) => name.parse::<AreaKey>()?,
            None if self.lat.is_some() || self.lon.is_some() => AreaKey::Custom,
            None => AreaKey::default(),
        };
        let area = AreaResolver::resolve(
            key,
            CustomCoordinates {
                latitude: self.lat,
                longitude: self.lon,
            },
        );
        if !area.is_within_bounds() {
            return Err(WildwatchError::validation(format!(
                "coordinates {} are outside latitude [-90, 90] / longitude [-180, 180]",
                area.format_coordinates()
            )));
        }

        SearchQuery::new(area)
            .with_animal(self.animal.as_deref().unwrap_or(crate::query::ALL_ANIMALS))?
            .with_custom_animal(self.custom_animal)
            .with_days(self.days.unwrap_or(DEFAULT_DAYS))
            .map(|query| {
                query
                    .with_threatened_only(self.threatened)
                    .with_chart(self.chart.unwrap_or_default())
            })
    }
}

#[derive(Serialize, Deserialize)]
pub struct ApiArea {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Error body returned by every endpoint
pub struct ApiError(WildwatchError);

impl From<WildwatchError> for ApiError {
    fn from(err: WildwatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            WildwatchError::Validation { .. } => StatusCode::BAD_REQUEST,
            WildwatchError::Api { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!("Request failed ({}): {}", status, self.0);
        let body = serde_json::json!({ "error": self.0.user_message() });
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/areas", get(get_areas))
        .route("/animals", get(get_animals))
        .route("/search", get(search))
        .route("/export.csv", get(export_csv))
        .with_state(state)
}

async fn get_areas() -> Json<Vec<ApiArea>> {
    let mut areas: Vec<ApiArea> = PRESET_AREAS
        .iter()
        .map(|(name, lat, lon)| ApiArea {
            name: (*name).to_string(),
            latitude: Some(*lat),
            longitude: Some(*lon),
        })
        .collect();
    areas.push(ApiArea {
        name: crate::area::CUSTOM_AREA.to_string(),
        latitude: None,
        longitude: None,
    });
    Json(areas)
}

async fn get_animals() -> Json<Vec<&'static str>> {
    Json(ANIMAL_OPTIONS.to_vec())
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Json<DashboardReport>, ApiError> {
    let query = params.into_query()?;
    let report = state.service.search(&query).await?;
    Ok(Json(report))
}

async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Response, ApiError> {
    let query = params.into_query()?;
    let batch = state
        .service
        .sightings(&query, Local::now().date_naive())
        .await?;
    let csv = export::sightings_csv(&trend::dated_sightings(&batch.sightings))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
