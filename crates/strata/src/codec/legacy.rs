//! Legacy (pre-upgrade) wire format.
//!
//! JSON documents. Registered structures are wrapped in a named envelope,
//! `{"type": "<name>", "value": <body>}`, and the name is checked on decode.
//! Unregistered types are written bare.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use strata_core::{Result, StrataError};

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    #[serde(rename = "type")]
    type_name: &'a str,
    value: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeOwned<T> {
    #[serde(rename = "type")]
    type_name: String,
    value: T,
}

pub fn encode<T: Serialize>(value: &T, name: Option<&str>) -> Result<Vec<u8>> {
    let encoded = match name {
        Some(type_name) => serde_json::to_vec(&EnvelopeRef { type_name, value }),
        None => serde_json::to_vec(value),
    };
    encoded.map_err(|e| StrataError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8], name: Option<&str>) -> Result<T> {
    match name {
        Some(expected) => {
            let envelope: EnvelopeOwned<T> =
                serde_json::from_slice(bytes).map_err(|e| StrataError::Decode(e.to_string()))?;
            if envelope.type_name != expected {
                return Err(StrataError::Decode(format!(
                    "expected structure '{}', found '{}'",
                    expected, envelope.type_name
                )));
            }
            Ok(envelope.value)
        }
        None => serde_json::from_slice(bytes).map_err(|e| StrataError::Decode(e.to_string())),
    }
}
