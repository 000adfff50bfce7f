//! Classified failures surfaced by the core.

use thiserror::Error;

/// Outcome of inspecting a provider response that did not carry usable data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    /// Non-2xx HTTP status. `message` is only set when the body decoded.
    #[error("HTTP {status_code}{}", message_suffix(.message))]
    Transport { status_code: u16, message: Option<String> },

    #[error("Could not decode response: {0}")]
    Decode(String),

    /// Provider-signaled failure on a successful transport.
    #[error("{message}")]
    Api { message: String },
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location access denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location error: {0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("{0}")]
    InvalidPlace(String),

    #[error(transparent)]
    Location(#[from] LocationError),
}

/// Failures of the local key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store contents are not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Request URLs carry the API key in `appid`, so they are dropped here.
impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

impl WeatherError {
    /// Message suitable for showing to the person who searched.
    pub fn user_message(&self) -> String {
        match self {
            Self::Envelope(EnvelopeError::Api { message }) => message.clone(),
            Self::Envelope(EnvelopeError::Transport { status_code, .. }) => {
                format!("HTTP {status_code}")
            }
            Self::Envelope(EnvelopeError::Decode(_)) => {
                "The weather service sent an unreadable response.".to_string()
            }
            Self::Network(_) => "Network error. Check your internet connection.".to_string(),
            Self::InvalidPlace(msg) => msg.clone(),
            Self::Location(_) => "Failed to load your location weather.".to_string(),
        }
    }

    /// Hint printed under the error line.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Location(LocationError::PermissionDenied) => "Location access denied.",
            Self::Location(_) => "Pass --lat and --lon explicitly.",
            _ => "Check the city name or your internet connection.",
        }
    }
}
