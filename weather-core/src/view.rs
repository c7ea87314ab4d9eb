//! Typed view models and the rendering seam used by the presenter.
//!
//! Builders take the presenter's [`AppState`] by reference and produce plain
//! structs with display-ready strings; a [`View`] decides how to show them.

use chrono::{Local, NaiveDate};

use crate::model::{FavoriteCity, Forecast, ForecastSample, Settings, WeatherObservation};
use crate::presenter::AppState;

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const EMPTY_FAVORITES_MESSAGE: &str = "No favorite cities yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Forecast,
    Favorites,
    Settings,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Forecast => "Forecast",
            Page::Favorites => "Favorites",
            Page::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteButton {
    Add,
    Remove,
}

impl FavoriteButton {
    pub fn label(&self) -> &'static str {
        match self {
            FavoriteButton::Add => "Add to Favorites",
            FavoriteButton::Remove => "Remove from Favorites",
        }
    }
}

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherViewModel {
    pub city_line: String,
    pub updated: String,
    pub temperature: String,
    pub feels_like: String,
    pub description: String,
    pub icon_url: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub visibility: String,
    pub uv_index: String,
    pub favorite_button: FavoriteButton,
}

impl WeatherViewModel {
    pub fn build(state: &AppState, obs: &WeatherObservation) -> Self {
        let unit = state.settings.unit;
        let favorite_button = if state.is_favorite(&obs.city) {
            FavoriteButton::Remove
        } else {
            FavoriteButton::Add
        };

        Self {
            city_line: format!("{}, {}", obs.city, obs.country),
            updated: format!("Updated {}", Local::now().format("%H:%M:%S")),
            temperature: unit.format(obs.temperature_c),
            feels_like: unit.format(obs.feels_like_c),
            description: obs.description.clone(),
            icon_url: icon_url(&obs.icon),
            humidity: format!("{}%", obs.humidity_pct),
            wind_speed: format!("{} m/s", obs.wind_speed_mps),
            pressure: format!("{} hPa", obs.pressure_hpa),
            visibility: format!("{:.1} km", obs.visibility_m / 1000.0),
            uv_index: "N/A".to_string(),
            favorite_button,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub date: String,
    pub icon_url: String,
    pub temperature: String,
    pub description: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastViewModel {
    pub city_line: String,
    pub cards: Vec<ForecastCard>,
}

impl ForecastViewModel {
    /// `days` is the already reduced one-sample-per-date list.
    pub fn build(
        state: &AppState,
        forecast: &Forecast,
        days: &[(NaiveDate, &ForecastSample)],
    ) -> Self {
        let unit = state.settings.unit;
        let cards = days
            .iter()
            .map(|(date, sample)| ForecastCard {
                date: date.format("%a, %b %-d").to_string(),
                icon_url: icon_url(&sample.icon),
                temperature: unit.format(sample.temperature_c),
                description: sample.description.clone(),
                details: format!(
                    "{}% humidity | {} m/s wind",
                    sample.humidity_pct, sample.wind_speed_mps
                ),
            })
            .collect();

        Self {
            city_line: format!("{}, {}", forecast.city, forecast.country),
            cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesViewModel {
    Empty { message: &'static str },
    Cities(Vec<FavoriteCity>),
}

impl FavoritesViewModel {
    pub fn build(state: &AppState) -> Self {
        if state.favorites.is_empty() {
            FavoritesViewModel::Empty {
                message: EMPTY_FAVORITES_MESSAGE,
            }
        } else {
            FavoritesViewModel::Cities(state.favorites.clone())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsViewModel {
    pub settings: Settings,
    pub dark_mode: bool,
}

impl SettingsViewModel {
    pub fn build(state: &AppState, system_prefers_dark: bool) -> Self {
        Self {
            settings: state.settings,
            dark_mode: state.settings.theme.is_dark(system_prefers_dark),
        }
    }
}

/// Rendering target for the presenter.
pub trait View {
    fn show_loading(&mut self);
    fn render_weather(&mut self, model: &WeatherViewModel);
    fn render_forecast(&mut self, model: &ForecastViewModel);
    fn render_favorites(&mut self, model: &FavoritesViewModel);
    fn apply_settings(&mut self, model: &SettingsViewModel);
    fn show_page(&mut self, page: Page);
    fn show_error(&mut self, message: &str);
    fn close_error(&mut self);
}
