//! Classification of provider responses.
//!
//! OpenWeather signals errors in two ways: through the HTTP status, and
//! through a `cod` field in a body that was delivered with HTTP 200. The
//! `cod` field is a number on some endpoints and a string on others, and is
//! absent entirely from the air-pollution endpoint. Nothing may read payload
//! fields until [`validate`] has accepted the body.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::EnvelopeError;

const STATUS_FIELD: &str = "cod";
const MESSAGE_FIELD: &str = "message";
const DEFAULT_API_MESSAGE: &str = "API error";

/// Classify a response body and its transport status.
pub fn validate(body: &str, status: u16) -> Result<Value, EnvelopeError> {
    if !(200..300).contains(&status) {
        // The body is only a source of an optional message here; `cod` is ignored.
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get(MESSAGE_FIELD).and_then(message_text));
        return Err(EnvelopeError::Transport { status_code: status, message });
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| EnvelopeError::Decode(e.to_string()))?;

    match value.get(STATUS_FIELD) {
        None | Some(Value::Null) => Ok(value),
        Some(code) if is_ok_code(code) => Ok(value),
        Some(_) => {
            let message = value
                .get(MESSAGE_FIELD)
                .and_then(message_text)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_API_MESSAGE.to_string());
            Err(EnvelopeError::Api { message })
        }
    }
}

/// [`validate`], then deserialize the accepted payload into `T`.
pub fn validate_as<T: DeserializeOwned>(body: &str, status: u16) -> Result<T, EnvelopeError> {
    let value = validate(body, status)?;
    serde_json::from_value(value).map_err(|e| EnvelopeError::Decode(e.to_string()))
}

fn is_ok_code(code: &Value) -> bool {
    match code {
        Value::Number(n) => n.as_u64() == Some(200),
        Value::String(s) => s == "200",
        _ => false,
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
