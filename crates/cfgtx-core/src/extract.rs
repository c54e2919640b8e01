//! Envelope extraction
//!
//! Unwraps a generic signed envelope into the config-update envelope it
//! carries, refusing anything not declared as a config update.

use crate::codec;
use crate::errors::{ConfigTxError, Result};
use crate::model::{ConfigUpdateEnvelope, Envelope, HeaderType};

/// Unwrap `envelope` into a `ConfigUpdateEnvelope`
///
/// # Errors
///
/// - `Decode` if the payload or the update envelope cannot be decoded
/// - `MissingEnvelopeHeader` if the payload has no header
/// - `InvalidChannelHeader` if the channel header cannot be decoded
/// - `WrongHeaderType` if the header does not declare a config update
pub fn envelope_to_config_update(envelope: &Envelope) -> Result<ConfigUpdateEnvelope> {
    let payload = codec::unmarshal_payload(&envelope.payload)?;

    let header = payload
        .header
        .as_ref()
        .ok_or(ConfigTxError::MissingEnvelopeHeader)?;

    let chdr = codec::unmarshal_channel_header(&header.channel_header).map_err(|e| {
        ConfigTxError::InvalidChannelHeader {
            message: e.to_string(),
        }
    })?;

    if chdr.header_type != HeaderType::ConfigUpdate.as_i32() {
        return Err(ConfigTxError::WrongHeaderType {
            header_type: chdr.header_type,
        });
    }

    codec::unmarshal_config_update_envelope(&payload.data)
}
