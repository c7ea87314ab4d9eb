use weather_core::Page;
use weather_core::view::{
    FavoritesViewModel, ForecastViewModel, SettingsViewModel, View, WeatherViewModel,
};

/// Renders view models as plain text on stdout; errors go to stderr.
#[derive(Debug, Default)]
pub struct TerminalView {
    dark_mode: bool,
    error_open: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_open(&self) -> bool {
        self.error_open
    }

    fn rule(&self) -> &'static str {
        if self.dark_mode {
            "════════════════════════════════"
        } else {
            "────────────────────────────────"
        }
    }
}

impl View for TerminalView {
    fn show_loading(&mut self) {
        println!("Loading weather data...");
    }

    fn render_weather(&mut self, model: &WeatherViewModel) {
        println!("{}", self.rule());
        println!("{}  ({})", model.city_line, model.updated);
        println!("{}  {}", model.temperature, model.description);
        println!("  Feels like  {}", model.feels_like);
        println!("  Humidity    {}", model.humidity);
        println!("  Wind        {}", model.wind_speed);
        println!("  Pressure    {}", model.pressure);
        println!("  Visibility  {}", model.visibility);
        println!("  UV index    {}", model.uv_index);
        println!("  Icon        {}", model.icon_url);
        println!("[{}]", model.favorite_button.label());
    }

    fn render_forecast(&mut self, model: &ForecastViewModel) {
        println!("{}", self.rule());
        println!("5-day forecast for {}", model.city_line);
        for card in &model.cards {
            println!(
                "  {:<12} {:>6}  {:<24} {}",
                card.date, card.temperature, card.description, card.details
            );
        }
    }

    fn render_favorites(&mut self, model: &FavoritesViewModel) {
        println!("{}", self.rule());
        match model {
            FavoritesViewModel::Empty { message } => println!("  {message}"),
            FavoritesViewModel::Cities(cities) => {
                for city in cities {
                    println!("  {} ({})", city.name, city.country);
                }
            }
        }
    }

    fn apply_settings(&mut self, model: &SettingsViewModel) {
        self.dark_mode = model.dark_mode;
    }

    fn show_page(&mut self, page: Page) {
        println!("== {} ==", page.title());
    }

    fn show_error(&mut self, message: &str) {
        self.error_open = true;
        eprintln!("Error: {message}");
    }

    fn close_error(&mut self) {
        self.error_open = false;
    }
}
