//! HTTP client for the weather proxy, as used by the presenter.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::instrument;

use crate::model::{Forecast, WeatherObservation};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

/// Source of weather data for the presenter.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn weather(&self, city: &str) -> Result<WeatherObservation, ClientError>;

    async fn forecast(&self, city: &str) -> Result<Forecast, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, route: &str, city: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", route, city]);
        Ok(url)
    }

    async fn get_json(
        &self,
        route: &str,
        city: &str,
        not_found: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.endpoint(route, city)?;
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), route, city, "proxy returned failure");
            return Err(ClientError::NotFound(not_found.to_string()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherApi for ProxyClient {
    #[instrument(skip(self), level = "debug")]
    async fn weather(&self, city: &str) -> Result<WeatherObservation, ClientError> {
        let body = self.get_json("weather", city, "City not found").await?;
        Ok(WeatherObservation::from_provider_json(body)?)
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast(&self, city: &str) -> Result<Forecast, ClientError> {
        let body = self
            .get_json("forecast", city, "Forecast not available")
            .await?;
        Ok(Forecast::from_provider_json(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london() -> serde_json::Value {
        serde_json::json!({
            "name": "London",
            "sys": {"country": "GB"},
            "main": {"temp": 10.0, "feels_like": 8.0, "humidity": 70, "pressure": 1015},
            "weather": [{"description": "overcast clouds", "icon": "04d"}],
            "wind": {"speed": 5.5},
            "visibility": 9000
        })
    }

    #[tokio::test]
    async fn weather_parses_proxy_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather/London"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(mock_server.uri());
        let obs = client.weather("London").await.unwrap();

        assert_eq!(obs.city, "London");
        assert_eq!(obs.visibility_m, 9000.0);
    }

    #[tokio::test]
    async fn city_with_spaces_is_path_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/weather/New%20York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(format!("{}/", mock_server.uri()));
        assert!(client.weather("New York").await.is_ok());
    }

    #[tokio::test]
    async fn not_found_maps_to_fixed_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/forecast/Nowhere"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "Forecast not available"})),
            )
            .mount(&mock_server)
            .await;

        let client = ProxyClient::new(mock_server.uri());
        let err = client.forecast("Nowhere").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(err.to_string(), "Forecast not available");
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_network_error() {
        let client = ProxyClient::new("http://127.0.0.1:1");
        let err = client.weather("London").await.unwrap_err();

        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn invalid_base_url_is_reported() {
        let client = ProxyClient::new("not a url");
        let err = client.weather("London").await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
