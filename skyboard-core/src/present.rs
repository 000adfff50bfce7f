//! What the dashboard hands to whatever draws it.

use serde::Serialize;

use crate::{
    advice::{Backdrop, Tip, backdrop, weather_tip},
    aggregate::round_temperature,
    error::WeatherError,
    local_time::format_local_time,
    model::{AirQuality, CurrentConditions, ForecastView},
    prefs::Theme,
};

/// Receives each dashboard section as soon as it is ready.
pub trait PresentationSink {
    fn show_current(&mut self, view: &CurrentView);

    fn show_forecast(&mut self, view: &ForecastView);

    fn show_air_quality(&mut self, air: &AirQuality);

    /// The air-quality section could not be loaded; other sections stand.
    fn air_quality_unavailable(&mut self, error: &WeatherError);

    fn show_recent(&mut self, recent: &[String]);

    /// A failure that ends the current search.
    fn show_error(&mut self, error: &WeatherError);
}

/// Current conditions, rounded and labelled for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub location_name: String,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub description: String,
    pub icon_code: String,
    pub humidity_pct: u8,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    /// Wall-clock time at the location when the view was built.
    pub local_time: Option<String>,
    /// Present only when both sunrise and sunset are known.
    pub sun_times: Option<(String, String)>,
    pub tip: Tip,
    /// Suppressed under the dark theme.
    pub backdrop: Option<Backdrop>,
}

impl CurrentView {
    pub fn build(current: &CurrentConditions, theme: Theme, now_utc: i64) -> Self {
        let temperature_c = round_temperature(current.temperature_c);
        let offset = current.timezone;

        let sun_times = match (current.sunrise_utc, current.sunset_utc) {
            (Some(rise), Some(set)) => {
                format_local_time(rise, offset).zip(format_local_time(set, offset))
            }
            _ => None,
        };

        Self {
            location_name: current.location_name.clone(),
            temperature_c,
            feels_like_c: round_temperature(current.feels_like_c),
            description: current.description.clone(),
            icon_code: current.icon_code.clone(),
            humidity_pct: current.humidity_pct,
            pressure_hpa: current.pressure_hpa,
            wind_speed_mps: current.wind_speed_mps,
            local_time: format_local_time(now_utc, offset),
            sun_times,
            tip: weather_tip(temperature_c, &current.description),
            backdrop: match theme {
                Theme::Dark => None,
                Theme::Light => Some(backdrop(&current.description, &current.icon_code)),
            },
        }
    }
}
