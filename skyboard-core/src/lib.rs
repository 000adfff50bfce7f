//! Core library for the `skyboard` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Classification of provider responses (the envelope check)
//! - Forecast aggregation into short-term cards and daily summaries
//! - Abstraction over weather providers, with an OpenWeather client
//! - Capability interfaces for storage, location and presentation
//!
//! It is used by `skyboard-cli`, but can also be reused by other front ends.

pub mod advice;
pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod local_time;
pub mod location;
pub mod model;
pub mod prefs;
pub mod present;
pub mod provider;
pub mod store;

pub use aggregate::aggregate;
pub use config::{ClientConfig, Config};
pub use dashboard::Dashboard;
pub use envelope::validate;
pub use error::{EnvelopeError, LocationError, StoreError, WeatherError};
pub use model::{
    AirQuality, Coordinates, CurrentConditions, DaySummary, Forecast, ForecastView, Place,
    TimezoneOffset, WeatherReport, WeatherSample,
};
pub use present::{CurrentView, PresentationSink};
pub use provider::{OpenWeatherProvider, WeatherProvider, fetch_weather};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
