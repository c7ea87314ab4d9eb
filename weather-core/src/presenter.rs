//! Client-side presentation flow.
//!
//! [`Presenter`] owns the [`AppState`], talks to the proxy through a
//! [`WeatherApi`], persists favorites and settings through a
//! [`KeyValueStore`] and pushes view models into a [`View`].

use chrono::{FixedOffset, Local, Offset};
use serde::{Serialize, de::DeserializeOwned};

use crate::client::{ClientError, WeatherApi};
use crate::forecast::daily_samples;
use crate::model::{FavoriteCity, Forecast, Settings, WeatherObservation};
use crate::storage::{KeyValueStore, StorageError};
use crate::view::{
    FavoritesViewModel, ForecastViewModel, Page, SettingsViewModel, View, WeatherViewModel,
};

pub const DEFAULT_CITY: &str = "London";
pub const FORECAST_ERROR_MESSAGE: &str = "Could not load forecast";
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch weather data";

/// Keys used in the key-value store.
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const SETTINGS: &str = "settings";
    pub const DEFAULT_CITY: &str = "defaultCity";
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Displayed,
    Error(String),
}

/// Everything the client knows between renders.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// City as the user typed it; used for forecast lookups.
    pub current_city: Option<String>,
    pub current_weather: Option<WeatherObservation>,
    pub favorites: Vec<FavoriteCity>,
    pub settings: Settings,
    pub page: Page,
    pub status: Status,
}

impl AppState {
    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|f| f.name == name)
    }

    /// Returns `false` if a favorite with the same name already exists.
    pub fn add_favorite(&mut self, city: FavoriteCity) -> bool {
        if self.is_favorite(&city.name) {
            return false;
        }
        self.favorites.push(city);
        true
    }

    /// Returns `false` if nothing was removed.
    pub fn remove_favorite(&mut self, name: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.name != name);
        self.favorites.len() != before
    }
}

/// Identifies one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Monotonic token source; only the latest issued token is current.
#[derive(Debug, Default)]
struct RequestSequence {
    issued: u64,
}

impl RequestSequence {
    fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        RequestToken(self.issued)
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }
}

pub struct Presenter<A, S, V> {
    api: A,
    store: S,
    view: V,
    state: AppState,
    weather_requests: RequestSequence,
    forecast_requests: RequestSequence,
    system_prefers_dark: bool,
    utc_offset: FixedOffset,
}

impl<A, S, V> Presenter<A, S, V>
where
    A: WeatherApi,
    S: KeyValueStore,
    V: View,
{
    /// Build a presenter, reading favorites and settings from `store`.
    pub fn new(api: A, store: S, view: V) -> Self {
        let state = AppState {
            favorites: load_favorites(&store),
            settings: load_json(&store, keys::SETTINGS).unwrap_or_default(),
            ..AppState::default()
        };

        Self {
            api,
            store,
            view,
            state,
            weather_requests: RequestSequence::default(),
            forecast_requests: RequestSequence::default(),
            system_prefers_dark: false,
            utc_offset: Local::now().offset().fix(),
        }
    }

    pub fn with_system_dark_mode(mut self, prefers_dark: bool) -> Self {
        self.system_prefers_dark = prefers_dark;
        self
    }

    /// Offset used to group forecast samples into calendar dates.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Apply persisted settings and load the default city.
    pub async fn start(&mut self) {
        self.apply_settings();
        self.load_default_city().await;
    }

    pub fn default_city(&self) -> String {
        self.store
            .get(keys::DEFAULT_CITY)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CITY.to_string())
    }

    pub async fn load_default_city(&mut self) {
        let city = self.default_city();
        self.fetch_weather(&city).await;
    }

    /// Handle a search submission. Blank input is ignored; the submitted
    /// city becomes the default city even if the lookup fails.
    pub async fn search(&mut self, input: &str) -> Result<(), StorageError> {
        let city = input.trim();
        if city.is_empty() {
            return Ok(());
        }

        self.fetch_weather(city).await;
        self.store.set(keys::DEFAULT_CITY, city.to_string())
    }

    pub async fn fetch_weather(&mut self, city: &str) {
        let token = self.begin_weather_request();
        let result = self.api.weather(city).await;
        self.apply_weather(token, city, result);
    }

    /// Issue a token for a weather fetch and show the loading indicator.
    pub fn begin_weather_request(&mut self) -> RequestToken {
        self.state.status = Status::Loading;
        self.view.show_loading();
        self.weather_requests.issue()
    }

    /// Apply a weather result. Returns `false` if `token` is stale and the
    /// result was discarded.
    pub fn apply_weather(
        &mut self,
        token: RequestToken,
        city: &str,
        result: Result<WeatherObservation, ClientError>,
    ) -> bool {
        if !self.weather_requests.is_current(token) {
            tracing::debug!(?token, city, "discarding stale weather response");
            return false;
        }

        match result {
            Ok(observation) => {
                tracing::info!(city = %observation.city, "weather loaded");
                self.state.current_city = Some(city.to_string());
                self.state.current_weather = Some(observation);
                self.state.status = Status::Displayed;
                self.render_current();
            }
            Err(err) => {
                tracing::warn!(city, error = %err, "weather request failed");
                self.render_current();
                self.fail(weather_error_message(&err));
            }
        }
        true
    }

    /// Fetch the forecast for the current city, if there is one.
    pub async fn load_forecast(&mut self) {
        let Some(city) = self.state.current_city.clone() else {
            return;
        };

        let token = self.forecast_requests.issue();
        let result = self.api.forecast(&city).await;
        self.apply_forecast(token, result);
    }

    pub fn apply_forecast(
        &mut self,
        token: RequestToken,
        result: Result<Forecast, ClientError>,
    ) -> bool {
        if !self.forecast_requests.is_current(token) {
            tracing::debug!(?token, "discarding stale forecast response");
            return false;
        }

        match result {
            Ok(forecast) => {
                let days = daily_samples(&forecast.samples, &self.utc_offset);
                let model = ForecastViewModel::build(&self.state, &forecast, &days);
                self.view.render_forecast(&model);
            }
            Err(err) => {
                tracing::warn!(error = %err, "forecast request failed");
                self.fail(FORECAST_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Switch pages, loading whatever the page needs.
    pub async fn show_page(&mut self, page: Page) {
        self.state.page = page;
        self.view.show_page(page);

        match page {
            Page::Forecast => self.load_forecast().await,
            Page::Favorites => self.display_favorites(),
            Page::Home | Page::Settings => {}
        }
    }

    /// Add the displayed city to favorites, or remove it if already there.
    pub fn toggle_favorite(&mut self) -> Result<(), StorageError> {
        let Some(observation) = self.state.current_weather.as_ref() else {
            return Ok(());
        };

        let favorite = observation.favorite();
        if !self.state.remove_favorite(&favorite.name) {
            self.state.add_favorite(favorite);
        }

        self.save_favorites()?;
        self.render_current();
        Ok(())
    }

    pub fn remove_favorite(&mut self, name: &str) -> Result<(), StorageError> {
        self.state.remove_favorite(name);
        self.save_favorites()?;
        self.display_favorites();
        Ok(())
    }

    pub async fn select_favorite(&mut self, name: &str) {
        self.fetch_weather(name).await;
        self.show_page(Page::Home).await;
    }

    pub fn display_favorites(&mut self) {
        let model = FavoritesViewModel::build(&self.state);
        self.view.render_favorites(&model);
    }

    /// Replace all settings, persist them and re-render from cached data.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), StorageError> {
        self.state.settings = settings;
        save_json(&mut self.store, keys::SETTINGS, &self.state.settings)?;
        self.apply_settings();
        self.render_current();
        Ok(())
    }

    pub fn apply_settings(&mut self) {
        let model = SettingsViewModel::build(&self.state, self.system_prefers_dark);
        self.view.apply_settings(&model);
    }

    /// Wipe the store, reset to defaults and reload the default city.
    pub async fn clear_all_data(&mut self) -> Result<(), StorageError> {
        self.store.clear()?;
        self.state = AppState {
            page: self.state.page,
            ..AppState::default()
        };
        tracing::info!("cleared favorites and settings");

        self.apply_settings();
        self.load_default_city().await;
        Ok(())
    }

    pub fn dismiss_error(&mut self) {
        self.view.close_error();
        self.state.status = if self.state.current_weather.is_some() {
            Status::Displayed
        } else {
            Status::Idle
        };
    }

    fn fail(&mut self, message: String) {
        self.view.show_error(&message);
        self.state.status = Status::Error(message);
    }

    fn render_current(&mut self) {
        if let Some(observation) = self.state.current_weather.as_ref() {
            let model = WeatherViewModel::build(&self.state, observation);
            self.view.render_weather(&model);
        }
    }

    fn save_favorites(&mut self) -> Result<(), StorageError> {
        save_json(&mut self.store, keys::FAVORITES, &self.state.favorites)
    }
}

fn weather_error_message(err: &ClientError) -> String {
    match err {
        ClientError::NotFound(message) => message.clone(),
        ClientError::Network(_) => FETCH_ERROR_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

/// Read a JSON value; missing or malformed entries yield `None`.
fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring malformed stored value");
            None
        }
    }
}

fn load_favorites(store: &impl KeyValueStore) -> Vec<FavoriteCity> {
    let stored: Vec<FavoriteCity> = load_json(store, keys::FAVORITES).unwrap_or_default();

    let mut favorites: Vec<FavoriteCity> = Vec::with_capacity(stored.len());
    for city in stored {
        if !favorites.iter().any(|f| f.name == city.name) {
            favorites.push(city);
        }
    }
    favorites
}

fn save_json<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, json)
}
