//! Tracked business event as carried over the wire.

use serde::{Deserialize, Deserializer, Serialize};

/// One tracked business action (purchase, card verification, OTP, ...).
///
/// All fields are opaque strings. Missing or `null` fields decode as the empty
/// string and no field is checked for format; that belongs to whoever
/// produces the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub order_type: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub session_id: String,
    /// Masked card number, e.g. `4433**1409`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub card: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub event_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website_url: String,
}

/// Errors produced while decoding a raw submission into an [`Event`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event must be a JSON object")]
    NotAnObject,
}

impl Event {
    /// Decode one JSON object into an event.
    ///
    /// Unknown fields are ignored. Anything other than a JSON object (arrays,
    /// scalars, empty input) is rejected.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
