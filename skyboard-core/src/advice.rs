//! One-line tips and background moods derived from current conditions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tip {
    Hot,
    Cold,
    Umbrella,
    Snow,
    Cloudy,
    Nice,
}

impl Tip {
    pub fn text(self) -> &'static str {
        match self {
            Tip::Hot => "It's very hot, stay hydrated!",
            Tip::Cold => "It's cold, wear warm clothes!",
            Tip::Umbrella => "Carry an umbrella!",
            Tip::Snow => "Snow outside, dress warmly!",
            Tip::Cloudy => "Cloudy skies today.",
            Tip::Nice => "Nice weather, enjoy!",
        }
    }
}

/// Temperature thresholds take priority over the description.
pub fn weather_tip(rounded_temp_c: i32, description: &str) -> Tip {
    let desc = description.to_lowercase();

    if rounded_temp_c > 35 {
        Tip::Hot
    } else if rounded_temp_c < 10 {
        Tip::Cold
    } else if desc.contains("rain") {
        Tip::Umbrella
    } else if desc.contains("snow") {
        Tip::Snow
    } else if desc.contains("cloud") {
        Tip::Cloudy
    } else {
        Tip::Nice
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Backdrop {
    Rainy,
    Cloudy,
    Snowy,
    ClearNight,
    Sunny,
}

impl Backdrop {
    pub fn as_str(self) -> &'static str {
        match self {
            Backdrop::Rainy => "rainy",
            Backdrop::Cloudy => "cloudy",
            Backdrop::Snowy => "snowy",
            Backdrop::ClearNight => "clear-night",
            Backdrop::Sunny => "sunny",
        }
    }
}

/// Night is read from the icon code (`01n`, `02n`, ...).
pub fn backdrop(description: &str, icon_code: &str) -> Backdrop {
    let desc = description.to_lowercase();

    if desc.contains("rain") {
        Backdrop::Rainy
    } else if desc.contains("cloud") {
        Backdrop::Cloudy
    } else if desc.contains("snow") {
        Backdrop::Snowy
    } else if desc.contains("clear") && icon_code.contains('n') {
        Backdrop::ClearNight
    } else {
        Backdrop::Sunny
    }
}
