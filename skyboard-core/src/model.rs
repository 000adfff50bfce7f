use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

/// Seconds to add to a UTC timestamp to get the location's wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimezoneOffset(i64);

impl TimezoneOffset {
    pub const UTC: TimezoneOffset = TimezoneOffset(0);

    pub const fn new(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn seconds(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// What the user asked weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum Place {
    City(String),
    Coordinates(Coordinates),
}

impl Place {
    /// Build a city query, trimming whitespace and rejecting blank input.
    pub fn city(name: &str) -> Result<Self, WeatherError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::InvalidPlace("Please enter a city name".to_string()));
        }
        Ok(Place::City(trimmed.to_string()))
    }

    pub fn coordinates(lat: f64, lon: f64) -> Result<Self, WeatherError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(WeatherError::InvalidPlace(format!(
                "Coordinates out of range: lat={lat}, lon={lon}"
            )));
        }
        Ok(Place::Coordinates(Coordinates { lat, lon }))
    }

    /// Query parameters identifying this place for the provider.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Place::City(name) => vec![("q", name.clone())],
            Place::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::City(name) => f.write_str(name),
            Place::Coordinates(c) => c.fmt(f),
        }
    }
}

/// One forecast data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp_utc: i64,
    pub temperature_c: f64,
    pub icon_code: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub coordinates: Option<Coordinates>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    /// Lowercased provider description.
    pub description: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    pub sunrise_utc: Option<i64>,
    pub sunset_utc: Option<i64>,
    pub observed_at_utc: i64,
    pub timezone: TimezoneOffset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub city_name: Option<String>,
    pub timezone: TimezoneOffset,
    pub samples: Vec<WeatherSample>,
}

/// European air-quality index bucket as reported by the provider (1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Fair => 2,
            Self::Moderate => 3,
            Self::Poor => 4,
            Self::VeryPoor => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Concentrations in µg/m³.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    #[serde(default)]
    pub co: f64,
    #[serde(default)]
    pub no: f64,
    #[serde(default)]
    pub no2: f64,
    #[serde(default)]
    pub o3: f64,
    #[serde(default)]
    pub so2: f64,
    #[serde(default)]
    pub pm2_5: f64,
    #[serde(default)]
    pub pm10: f64,
    #[serde(default)]
    pub nh3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQuality {
    pub level: AqiLevel,
    pub pollutants: Pollutants,
    pub measured_at_utc: i64,
}

/// Validated current conditions and forecast for one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

/// A forecast sample annotated with its local clock label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEntry {
    pub sample: WeatherSample,
    pub local_time: String,
}

/// Per-calendar-day roll-up; temperatures are already rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date_key: NaiveDate,
    pub weekday_label: String,
    pub min_temperature_c: i32,
    pub max_temperature_c: i32,
    pub icon_code: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastView {
    pub short_term: Vec<HourlyEntry>,
    pub daily: Vec<DaySummary>,
}
