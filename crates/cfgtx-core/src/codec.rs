//! JSON wire codec for envelopes and updates
//!
//! Byte fields are carried as base64 strings. Every decoder reports which
//! structure failed so rejections can say what was malformed.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ConfigTxError, Result};
use crate::model::{ChannelHeader, ConfigUpdate, ConfigUpdateEnvelope, Payload, SignatureHeader};

/// Serde adapter storing `Vec<u8>` as a standard base64 string
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

fn decode<T: DeserializeOwned>(what: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| ConfigTxError::Decode {
        what: what.to_string(),
        message: e.to_string(),
    })
}

/// Encode any wire structure
///
/// # Errors
///
/// Returns `ConfigTxError::Serialization` if encoding fails.
pub fn marshal<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub fn unmarshal_payload(bytes: &[u8]) -> Result<Payload> {
    decode("Payload", bytes)
}

pub fn unmarshal_channel_header(bytes: &[u8]) -> Result<ChannelHeader> {
    decode("ChannelHeader", bytes)
}

pub fn unmarshal_signature_header(bytes: &[u8]) -> Result<SignatureHeader> {
    decode("SignatureHeader", bytes)
}

pub fn unmarshal_config_update(bytes: &[u8]) -> Result<ConfigUpdate> {
    decode("ConfigUpdate", bytes)
}

pub fn unmarshal_config_update_envelope(bytes: &[u8]) -> Result<ConfigUpdateEnvelope> {
    decode("ConfigUpdateEnvelope", bytes)
}
