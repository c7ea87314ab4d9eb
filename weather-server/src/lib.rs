//! HTTP routes of the weather proxy.
//!
//! Every upstream failure is reported as a 404 with a fixed message; the
//! cause is only logged.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use weather_core::WeatherProvider;

pub const CITY_NOT_FOUND: &str = "City not found";
pub const FORECAST_NOT_AVAILABLE: &str = "Forecast not available";

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Clone)]
pub struct AppState {
    provider: Arc<dyn WeatherProvider>,
}

pub fn build_app(provider: Arc<dyn WeatherProvider>) -> Router {
    let state = AppState { provider };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/weather/:city", get(weather))
        .route("/api/forecast/:city", get(forecast))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
    }))
}

async fn weather(State(state): State<AppState>, Path(city): Path<String>) -> Response {
    match state.provider.current_weather(&city).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::warn!(%city, error = ?e, "weather lookup failed");
            not_found(CITY_NOT_FOUND)
        }
    }
}

async fn forecast(State(state): State<AppState>, Path(city): Path<String>) -> Response {
    match state.provider.forecast(&city).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            tracing::warn!(%city, error = ?e, "forecast lookup failed");
            not_found(FORECAST_NOT_AVAILABLE)
        }
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}
