use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature unit preference. Observations always hold Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    /// Convert a Celsius value into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Render a Celsius value as a whole-degree label, e.g. `32°F`.
    pub fn format(&self, celsius: f64) -> String {
        // Round half up, so -0.5 becomes 0 rather than -1.
        let rounded = (self.convert(celsius) + 0.5).floor() as i64;
        format!("{rounded}°{}", self.symbol())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    /// Whether dark mode is in effect, given the system preference.
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::Auto => system_prefers_dark,
        }
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            _ => Err(anyhow::anyhow!(
                "Unknown theme '{value}'. Supported themes: light, dark, auto."
            )),
        }
    }
}

/// User preferences, persisted as one JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub unit: TemperatureUnit,
    pub theme: Theme,
    pub notifications: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteCity {
    pub name: String,
    pub country: String,
}

/// A single point-in-time reading for a city, in provider-native units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub description: String,
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub visibility_m: f64,
}

impl WeatherObservation {
    /// Build an observation from an OpenWeather current-weather body.
    pub fn from_provider_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: OwCurrent = serde_json::from_value(value)?;
        let (description, icon) = raw.weather.into_iter().next().map_or_else(
            || (String::new(), String::new()),
            |w| (w.description, w.icon),
        );

        Ok(Self {
            city: raw.name,
            country: raw.sys.country,
            temperature_c: raw.main.temp,
            feels_like_c: raw.main.feels_like,
            description,
            icon,
            humidity_pct: raw.main.humidity,
            wind_speed_mps: raw.wind.speed,
            pressure_hpa: raw.main.pressure,
            visibility_m: raw.visibility,
        })
    }

    pub fn favorite(&self) -> FavoriteCity {
        FavoriteCity {
            name: self.city.clone(),
            country: self.country.clone(),
        }
    }
}

/// One timestamped entry of a multi-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: String,
    pub samples: Vec<ForecastSample>,
}

impl Forecast {
    /// Build a forecast from an OpenWeather 5-day forecast body.
    /// Entries whose timestamp is out of range are skipped.
    pub fn from_provider_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: OwForecast = serde_json::from_value(value)?;

        let samples = raw
            .list
            .into_iter()
            .filter_map(|entry| {
                let time = DateTime::<Utc>::from_timestamp(entry.dt, 0)?;
                let (description, icon) = entry.weather.into_iter().next().map_or_else(
                    || (String::new(), String::new()),
                    |w| (w.description, w.icon),
                );
                Some(ForecastSample {
                    time,
                    temperature_c: entry.main.temp,
                    description,
                    icon,
                    humidity_pct: entry.main.humidity,
                    wind_speed_mps: entry.wind.speed,
                })
            })
            .collect();

        Ok(Self {
            city: raw.city.name,
            country: raw.city.country,
            samples,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    humidity: u8,
    #[serde(default)]
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrent {
    name: String,
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}
