use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::config::DEFAULT_UPSTREAM_URL;

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, endpoint: &str, city: &str) -> Result<serde_json::Value> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {endpoint} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<serde_json::Value> {
        self.fetch("weather", city).await
    }

    async fn forecast(&self, city: &str) -> Result<serde_json::Value> {
        self.fetch("forecast", city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn current_weather_forwards_city_units_and_key() {
        let mock_server = MockServer::start().await;
        let body = serde_json::json!({"name": "Berlin", "main": {"temp": 3.5}});

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Berlin"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(mock_server.uri());
        let value = provider.current_weather("Berlin").await.unwrap();

        assert_eq!(value, body);
    }

    #[tokio::test]
    async fn forecast_hits_forecast_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Rome"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"list": []})))
            .mount(&mock_server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(mock_server.uri());
        let value = provider.forecast("Rome").await.unwrap();

        assert_eq!(value["list"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(mock_server.uri());
        let err = provider.current_weather("Atlantis").await.unwrap_err();

        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn unparseable_body_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".into()).with_base_url(mock_server.uri());
        let err = provider.current_weather("Paris").await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse OpenWeather weather JSON"));
    }

    #[test]
    fn truncate_body_limits_long_bodies() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert_eq!(out.len(), 203);
        assert!(out.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }
}
