use crate::{config::ServerConfig, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Upstream weather source. Bodies are passed through untouched.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> anyhow::Result<serde_json::Value>;

    async fn forecast(&self, city: &str) -> anyhow::Result<serde_json::Value>;
}

/// Construct the OpenWeather provider from server config.
pub fn provider_from_config(config: &ServerConfig) -> Box<dyn WeatherProvider> {
    Box::new(
        OpenWeatherProvider::new(config.api_key.clone())
            .with_base_url(config.upstream_url.clone()),
    )
}
