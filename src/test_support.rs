//! Local stand-ins for the upstream HTTP APIs

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::config::WildwatchConfig;

/// Nothing listens here; connections are refused
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Configuration pointing the weather clients at `weather` and the
/// observation client at `observations`
pub fn config_for(weather: &str, observations: &str) -> WildwatchConfig {
    let mut config = WildwatchConfig::default();
    config.weather.base_url = weather.to_string();
    config.weather.air_quality_base_url = weather.to_string();
    config.weather.timeout_seconds = 5;
    config.observations.base_url = observations.to_string();
    config.observations.timeout_seconds = 5;
    config
}

pub fn weather_ok() -> Router {
    Router::new().route(
        "/weather",
        get(|| async {
            Json(json!({
                "name": "Lahore",
                "main": {"temp": 31.5, "humidity": 40},
                "weather": [{"description": "haze"}]
            }))
        }),
    )
}

pub fn air_quality_ok() -> Router {
    Router::new().route(
        "/air_pollution",
        get(|| async { Json(json!({"list": [{"main": {"aqi": 3}}]})) }),
    )
}

pub fn air_quality_unauthorized() -> Router {
    Router::new().route(
        "/air_pollution",
        get(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
    )
}

pub fn observations_ok() -> Router {
    Router::new().route(
        "/observations",
        get(|| async {
            Json(json!({
                "total_results": 2,
                "results": [
                    {
                        "species_guess": "Indian Peafowl",
                        "geojson": {"type": "Point", "coordinates": [74.35, 31.55]},
                        "observed_on": "2024-05-01",
                        "uri": "https://www.inaturalist.org/observations/1"
                    },
                    {
                        "species_guess": "Jackal",
                        "observed_on": "2024-05-02"
                    }
                ]
            }))
        }),
    )
}
