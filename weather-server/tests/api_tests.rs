use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use weather_core::{WeatherProvider, provider::openweather::OpenWeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug)]
struct StubProvider;

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn current_weather(&self, city: &str) -> anyhow::Result<Value> {
        if city == "London" {
            Ok(json!({"name": "London", "sys": {"country": "GB"}}))
        } else {
            Err(anyhow::anyhow!("upstream said no"))
        }
    }

    async fn forecast(&self, city: &str) -> anyhow::Result<Value> {
        if city == "London" {
            Ok(json!({"city": {"name": "London"}, "list": []}))
        } else {
            Err(anyhow::anyhow!("upstream said no"))
        }
    }
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let res = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn stub_app() -> Router {
    weather_server::build_app(Arc::new(StubProvider))
}

#[tokio::test]
async fn weather_passes_provider_body_through() {
    let (status, body) = get_json(stub_app(), "/api/weather/London").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "London", "sys": {"country": "GB"}}));
}

#[tokio::test]
async fn weather_failure_is_fixed_404() {
    let (status, body) = get_json(stub_app(), "/api/weather/Atlantis").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "City not found"}));
}

#[tokio::test]
async fn forecast_failure_is_fixed_404() {
    let (status, body) = get_json(stub_app(), "/api/forecast/Atlantis").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Forecast not available"}));
}

#[tokio::test]
async fn forecast_passes_provider_body_through() {
    let (status, body) = get_json(stub_app(), "/api/forecast/London").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["list"], json!([]));
}

#[tokio::test]
async fn health_reports_status_and_timestamp() {
    let (status, body) = get_json(stub_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

#[tokio::test]
async fn index_serves_landing_page() {
    let (status, body) = get(stub_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("Weather Monitor"));
}

#[tokio::test]
async fn unreachable_upstream_is_city_not_found() {
    let provider = OpenWeatherProvider::new("demo_key".into()).with_base_url("http://127.0.0.1:1");
    let app = weather_server::build_app(Arc::new(provider));

    for city in ["London", "Springfield", "Sao%20Paulo"] {
        let (status, body) = get_json(app.clone(), &format!("/api/weather/{city}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "City not found"}));
    }
}

#[tokio::test]
async fn proxies_openweather_with_decoded_city() {
    let upstream = MockServer::start().await;
    let payload = json!({"name": "New York", "sys": {"country": "US"}, "main": {"temp": 20.1}});

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "New York"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&upstream)
        .await;

    let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(upstream.uri());
    let app = weather_server::build_app(Arc::new(provider));

    let (status, body) = get_json(app, "/api/weather/New%20York").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
}

#[tokio::test]
async fn upstream_server_error_collapses_to_404() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(upstream.uri());
    let app = weather_server::build_app(Arc::new(provider));

    let (status, body) = get_json(app, "/api/forecast/Paris").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Forecast not available"}));
}
