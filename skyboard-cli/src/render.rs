use std::io::Write;

use skyboard_core::{
    AirQuality, CurrentView, ForecastView, PresentationSink, WeatherError,
    aggregate::round_temperature,
};

/// Plain-text dashboard written to any `Write`, usually stdout.
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::debug!(error = %e, "failed to write dashboard output");
        }
    }
}

impl<W: Write> PresentationSink for TerminalSink<W> {
    fn show_current(&mut self, view: &CurrentView) {
        self.line(&view.location_name);
        self.line(&format!(
            "  {}°C  {}  [{}]",
            view.temperature_c, view.description, view.icon_code
        ));
        self.line(&format!(
            "  Feels like: {}°C | Humidity: {}% | Wind: {} m/s | Pressure: {} hPa",
            view.feels_like_c, view.humidity_pct, view.wind_speed_mps, view.pressure_hpa
        ));
        if let Some(time) = &view.local_time {
            self.line(&format!("  Local time: {time}"));
        }
        if let Some((rise, set)) = &view.sun_times {
            self.line(&format!("  Sunrise: {rise}  Sunset: {set}"));
        }
        self.line(&format!("  Tip: {}", view.tip.text()));
        if let Some(backdrop) = view.backdrop {
            self.line(&format!("  Sky: {}", backdrop.as_str()));
        }
    }

    fn show_forecast(&mut self, view: &ForecastView) {
        if view.short_term.is_empty() {
            self.line("No forecast data.");
            return;
        }

        self.line("");
        self.line("Next hours");
        for entry in &view.short_term {
            self.line(&format!(
                "  {:>8}  {:>4}°C  {}",
                entry.local_time,
                round_temperature(entry.sample.temperature_c),
                entry.sample.description
            ));
        }

        self.line("");
        self.line("5-day forecast");
        for day in &view.daily {
            self.line(&format!(
                "  {}  {}°C - {}°C  {}",
                day.weekday_label, day.min_temperature_c, day.max_temperature_c, day.description
            ));
        }
    }

    fn show_air_quality(&mut self, air: &AirQuality) {
        let p = &air.pollutants;
        self.line("");
        self.line(&format!("Air quality: {} ({}/5)", air.level.label(), air.level.index()));
        self.line(&format!(
            "  PM2.5 {:.1}  PM10 {:.1}  O3 {:.1}  NO2 {:.1}  SO2 {:.1}  CO {:.1} µg/m³",
            p.pm2_5, p.pm10, p.o3, p.no2, p.so2, p.co
        ));
    }

    fn air_quality_unavailable(&mut self, _error: &WeatherError) {
        self.line("");
        self.line("Air quality: unavailable");
    }

    fn show_recent(&mut self, recent: &[String]) {
        self.line(&format!("  Recent searches: {}", recent.join(", ")));
    }

    fn show_error(&mut self, error: &WeatherError) {
        self.line(&format!("Error: {}", error.user_message()));
        self.line(error.hint());
    }
}
