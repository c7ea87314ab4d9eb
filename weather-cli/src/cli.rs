use std::fmt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Select, Text};
use weather_core::{
    ClientConfig, FileStore, Page, Presenter, ProxyClient, Settings, Status, TemperatureUnit,
    Theme,
};

use crate::terminal::TerminalView;

type App = Presenter<ProxyClient, FileStore, TerminalView>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather client for the weather proxy")]
pub struct Cli {
    /// Proxy base URL; overrides the configured one.
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the proxy URL and dark-mode preference.
    Configure,

    /// Show current weather. Without a city, the default city is used.
    Show {
        city: Option<String>,
    },

    /// Show the 5-day forecast for a city (default city if omitted).
    Forecast {
        city: Option<String>,
    },

    /// List favorite cities.
    Favorites,

    /// Add or remove a favorite city.
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },

    /// Show or change settings.
    Settings {
        /// "celsius" or "fahrenheit".
        #[arg(long)]
        unit: Option<String>,

        /// "light", "dark" or "auto".
        #[arg(long)]
        theme: Option<String>,

        #[arg(long)]
        notifications: Option<bool>,
    },

    /// Clear all favorites and settings.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Menu-driven session.
    Interactive,
}

#[derive(Debug, Subcommand)]
pub enum FavoriteAction {
    /// Look up a city and toggle it in the favorites list.
    Toggle { city: String },

    /// Remove a favorite by name.
    Remove { name: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let server = self.server;

        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let mut app = open_app(server)?;
                match city {
                    Some(city) => app.search(&city).await?,
                    None => app.load_default_city().await,
                }
                ensure_ok(&app.state().status)
            }
            Command::Forecast { city } => {
                let mut app = open_app(server)?;
                match city {
                    Some(city) => app.fetch_weather(&city).await,
                    None => app.load_default_city().await,
                }
                ensure_ok(&app.state().status)?;
                app.show_page(Page::Forecast).await;
                ensure_ok(&app.state().status)
            }
            Command::Favorites => {
                open_app(server)?.show_page(Page::Favorites).await;
                Ok(())
            }
            Command::Favorite { action } => {
                let mut app = open_app(server)?;
                match action {
                    FavoriteAction::Toggle { city } => {
                        app.fetch_weather(&city).await;
                        ensure_ok(&app.state().status)?;
                        app.toggle_favorite()?;
                    }
                    FavoriteAction::Remove { name } => app.remove_favorite(&name)?,
                }
                Ok(())
            }
            Command::Settings {
                unit,
                theme,
                notifications,
            } => {
                let mut app = open_app(server)?;
                let current = app.state().settings;
                if unit.is_none() && theme.is_none() && notifications.is_none() {
                    print_settings(&current);
                    return Ok(());
                }

                let updated = Settings {
                    unit: match unit {
                        Some(u) => TemperatureUnit::try_from(u.as_str())?,
                        None => current.unit,
                    },
                    theme: match theme {
                        Some(t) => Theme::try_from(t.as_str())?,
                        None => current.theme,
                    },
                    notifications: notifications.unwrap_or(current.notifications),
                };
                app.update_settings(updated)?;
                print_settings(&updated);
                Ok(())
            }
            Command::Clear { yes } => {
                let mut app = open_app(server)?;
                if yes || confirm_clear()? {
                    app.clear_all_data().await?;
                }
                Ok(())
            }
            Command::Interactive => interactive(&mut open_app(server)?).await,
        }
    }
}

fn open_app(server: Option<String>) -> anyhow::Result<App> {
    let config = ClientConfig::load()?;
    let server_url = server.unwrap_or(config.server_url);
    let store = FileStore::open_default().context("Failed to open local storage")?;
    tracing::debug!(path = %store.path().display(), %server_url, "client starting");

    let mut app = Presenter::new(ProxyClient::new(server_url), store, TerminalView::new())
        .with_system_dark_mode(config.prefers_dark);
    app.apply_settings();
    Ok(app)
}

/// One-shot commands exit non-zero when the presenter ends in an error.
fn ensure_ok(status: &Status) -> anyhow::Result<()> {
    match status {
        Status::Error(message) => anyhow::bail!("{message}"),
        _ => Ok(()),
    }
}

fn confirm_clear() -> anyhow::Result<bool> {
    Ok(
        Confirm::new("Are you sure? This will clear all favorites and settings.")
            .with_default(false)
            .prompt()?,
    )
}

fn configure() -> anyhow::Result<()> {
    let mut config = ClientConfig::load()?;

    config.server_url = Text::new("Weather proxy URL:")
        .with_default(&config.server_url)
        .prompt()?;
    config.prefers_dark = Confirm::new("Use dark mode when the theme is \"auto\"?")
        .with_default(config.prefers_dark)
        .prompt()?;

    config.save()?;
    println!(
        "Saved configuration to {}",
        ClientConfig::config_file_path()?.display()
    );
    Ok(())
}

fn print_settings(settings: &Settings) {
    println!("unit:          {}", settings.unit.as_str());
    println!("theme:         {}", settings.theme.as_str());
    println!("notifications: {}", settings.notifications);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Search,
    Forecast,
    ToggleFavorite,
    Favorites,
    OpenFavorite,
    RemoveFavorite,
    Settings,
    ClearData,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 9] = [
        MenuItem::Search,
        MenuItem::Forecast,
        MenuItem::ToggleFavorite,
        MenuItem::Favorites,
        MenuItem::OpenFavorite,
        MenuItem::RemoveFavorite,
        MenuItem::Settings,
        MenuItem::ClearData,
        MenuItem::Quit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search city",
            MenuItem::Forecast => "Forecast",
            MenuItem::ToggleFavorite => "Add/remove current city from favorites",
            MenuItem::Favorites => "Favorites",
            MenuItem::OpenFavorite => "Open a favorite",
            MenuItem::RemoveFavorite => "Remove a favorite",
            MenuItem::Settings => "Settings",
            MenuItem::ClearData => "Clear all data",
            MenuItem::Quit => "Quit",
        })
    }
}

async fn interactive(app: &mut App) -> anyhow::Result<()> {
    app.start().await;

    loop {
        if app.view().error_open() {
            app.dismiss_error();
        }

        let choice = match Select::new("What next?", MenuItem::ALL.to_vec()).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match choice {
            MenuItem::Search => {
                let city = Text::new("City:").prompt()?;
                app.search(&city).await?;
                app.show_page(Page::Home).await;
            }
            MenuItem::Forecast => app.show_page(Page::Forecast).await,
            MenuItem::ToggleFavorite => app.toggle_favorite()?,
            MenuItem::Favorites => app.show_page(Page::Favorites).await,
            MenuItem::OpenFavorite => {
                if let Some(name) = pick_favorite(app, "Open which city?")? {
                    app.select_favorite(&name).await;
                }
            }
            MenuItem::RemoveFavorite => {
                if let Some(name) = pick_favorite(app, "Remove which city?")? {
                    app.remove_favorite(&name)?;
                }
            }
            MenuItem::Settings => {
                app.show_page(Page::Settings).await;
                let settings = prompt_settings(&app.state().settings)?;
                app.update_settings(settings)?;
                print_settings(&settings);
            }
            MenuItem::ClearData => {
                if confirm_clear()? {
                    app.clear_all_data().await?;
                }
            }
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

fn pick_favorite(app: &App, message: &str) -> anyhow::Result<Option<String>> {
    let names: Vec<String> = app
        .state()
        .favorites
        .iter()
        .map(|f| f.name.clone())
        .collect();

    if names.is_empty() {
        println!("{}", weather_core::view::EMPTY_FAVORITES_MESSAGE);
        return Ok(None);
    }

    Ok(Select::new(message, names).prompt_skippable()?)
}

fn prompt_settings(current: &Settings) -> anyhow::Result<Settings> {
    let units = vec![TemperatureUnit::Celsius.as_str(), TemperatureUnit::Fahrenheit.as_str()];
    let unit_cursor = usize::from(current.unit == TemperatureUnit::Fahrenheit);
    let unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(unit_cursor)
        .prompt()?;

    let themes = vec![Theme::Light.as_str(), Theme::Dark.as_str(), Theme::Auto.as_str()];
    let theme_cursor = match current.theme {
        Theme::Light => 0,
        Theme::Dark => 1,
        Theme::Auto => 2,
    };
    let theme = Select::new("Theme:", themes)
        .with_starting_cursor(theme_cursor)
        .prompt()?;

    let notifications = Confirm::new("Enable notifications?")
        .with_default(current.notifications)
        .prompt()?;

    Ok(Settings {
        unit: TemperatureUnit::try_from(unit)?,
        theme: Theme::try_from(theme)?,
        notifications,
    })
}
