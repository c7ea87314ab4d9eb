//! Core library for the weather proxy and its terminal client.
//!
//! This crate defines:
//! - Configuration for the proxy server and the client
//! - Abstraction over upstream weather providers
//! - Shared domain models (observations, forecasts, favorites, settings)
//! - The client presenter: state, persistence and view models
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod client;
pub mod config;
pub mod forecast;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod storage;
pub mod view;

pub use client::{ClientError, ProxyClient, WeatherApi};
pub use config::{ClientConfig, ServerConfig};
pub use model::{
    FavoriteCity, Forecast, ForecastSample, Settings, TemperatureUnit, Theme, WeatherObservation,
};
pub use presenter::{AppState, Presenter, RequestToken, Status};
pub use provider::{WeatherProvider, provider_from_config};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use view::{Page, View};
