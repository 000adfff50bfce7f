use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Confirm, Password, PasswordDisplayMode, Select};
use std::{io, process::ExitCode};

use skyboard_core::{
    Config, Coordinates, Dashboard, JsonFileStore, OpenWeatherProvider, Place, PresentationSink,
    location::FixedLocation,
    prefs::{self, Theme},
};

use crate::render::TerminalSink;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skyboard", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather, forecast and air quality.
    Show {
        /// City name; omit to pick from recent searches.
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude of the location to look up.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of the location to look up.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// List recent searches.
    Recent {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Show or change the colour theme.
    Theme {
        choice: Option<ThemeChoice>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { city, lat, lon } => return show(city, lat, lon).await,
            Command::Recent { clear } => {
                let mut store = open_store()?;
                if clear {
                    prefs::clear_searches(&mut store)?;
                    println!("Recent searches cleared.");
                } else {
                    let recent = prefs::recent_searches(&store)?;
                    if recent.is_empty() {
                        println!("No recent searches.");
                    }
                    for city in recent {
                        println!("{city}");
                    }
                }
            }
            Command::Theme { choice } => {
                let mut store = open_store()?;
                let theme = match choice {
                    None => prefs::theme(&store)?,
                    Some(ThemeChoice::Toggle) => prefs::toggle_theme(&mut store)?,
                    Some(ThemeChoice::Light) => set_theme(&mut store, Theme::Light)?,
                    Some(ThemeChoice::Dark) => set_theme(&mut store, Theme::Dark)?,
                };
                println!("Theme: {theme}");
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if config.is_configured() {
        let replace = Confirm::new("An API key is already configured. Replace it?")
            .with_default(false)
            .prompt()?;
        if !replace {
            return Ok(());
        }
    }

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

enum Target {
    City(String),
    Here(Coordinates),
}

async fn show(city: Option<String>, lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let provider = OpenWeatherProvider::new(config.client_config()?)?;
    let store = open_store()?;

    let target = match (city, lat, lon) {
        (Some(city), _, _) => Target::City(city),
        (None, Some(lat), Some(lon)) => Target::Here(Coordinates { lat, lon }),
        _ => Target::City(pick_recent(&store)?),
    };

    let mut dashboard = Dashboard::new(provider, store);
    let mut sink = TerminalSink::new(io::stdout().lock());

    let result = match target {
        Target::Here(coordinates) => {
            dashboard.search_here(&FixedLocation(coordinates), &mut sink).await
        }
        Target::City(city) => match Place::city(&city) {
            Ok(place) => dashboard.search(&place, &mut sink).await,
            Err(e) => {
                sink.show_error(&e);
                Err(e)
            }
        },
    };

    Ok(if result.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn pick_recent(store: &JsonFileStore) -> anyhow::Result<String> {
    let recent = prefs::recent_searches(store)?;
    if recent.is_empty() {
        bail!("Please enter a city name!\nHint: run `skyboard show <CITY>`.");
    }

    Ok(Select::new("Recent searches:", recent).prompt()?)
}

fn open_store() -> anyhow::Result<JsonFileStore> {
    let path = Config::preferences_file_path()?;
    JsonFileStore::open(&path)
        .with_context(|| format!("Failed to open preferences file: {}", path.display()))
}

fn set_theme(store: &mut JsonFileStore, theme: Theme) -> anyhow::Result<Theme> {
    prefs::set_theme(store, theme)?;
    Ok(theme)
}
