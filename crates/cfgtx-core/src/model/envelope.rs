//! Envelope and update wire structures
//!
//! Nested byte fields hold encoded inner structures; they are decoded
//! lazily by the functions in `crate::codec` so that signatures can be
//! computed over the exact bytes that were transmitted.

use serde::{Deserialize, Serialize};

use super::tree::ConfigGroup;
use crate::codec;
use crate::errors::Result;

/// Declared type of an enveloped transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderType {
    Message,
    Config,
    ConfigUpdate,
    EndorserTransaction,
}

impl HeaderType {
    pub fn as_i32(self) -> i32 {
        match self {
            HeaderType::Message => 0,
            HeaderType::Config => 1,
            HeaderType::ConfigUpdate => 2,
            HeaderType::EndorserTransaction => 3,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(HeaderType::Message),
            1 => Some(HeaderType::Config),
            2 => Some(HeaderType::ConfigUpdate),
            3 => Some(HeaderType::EndorserTransaction),
            _ => None,
        }
    }
}

/// Generic signed envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub payload: Vec<u8>,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub signature: Vec<u8>,
}

/// Decoded envelope payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub header: Option<Header>,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub channel_header: Vec<u8>,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub signature_header: Vec<u8>,
}

/// Identifies the type of a transaction and the chain it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelHeader {
    #[serde(rename = "type")]
    pub header_type: i32,
    pub channel_id: String,
}

impl ChannelHeader {
    pub fn new(header_type: HeaderType, channel_id: impl Into<String>) -> Self {
        Self {
            header_type: header_type.as_i32(),
            channel_id: channel_id.into(),
        }
    }
}

/// Identity of a signer plus anti-replay nonce
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeader {
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub creator: Vec<u8>,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub nonce: Vec<u8>,
}

/// A proposed configuration change
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub header: Option<ChannelHeader>,
    /// Sparse tree of everything the proposer wants to exist afterwards
    #[serde(default)]
    pub write_set: Option<ConfigGroup>,
}

/// One endorsement over a config update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSignature {
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub signature_header: Vec<u8>,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub signature: Vec<u8>,
}

/// Encoded config update with its endorsements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdateEnvelope {
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub config_update: Vec<u8>,
    #[serde(default)]
    pub signatures: Vec<ConfigSignature>,
}

/// A signer identity paired with the bytes it signed
///
/// Signature verification is performed by the policy evaluator's own
/// collaborators; here the triple is only assembled and passed along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData {
    pub identity: Vec<u8>,
    pub data: Vec<u8>,
    pub signature: Vec<u8>,
}

impl ConfigUpdateEnvelope {
    /// Project each endorsement into a `SignedData`
    ///
    /// The signed bytes are the signature header followed by the encoded
    /// config update.
    ///
    /// # Errors
    ///
    /// Returns `ConfigTxError::Decode` if any signature header cannot be decoded.
    pub fn as_signed_data(&self) -> Result<Vec<SignedData>> {
        self.signatures
            .iter()
            .map(|sig| {
                let header = codec::unmarshal_signature_header(&sig.signature_header)?;
                let mut data =
                    Vec::with_capacity(sig.signature_header.len() + self.config_update.len());
                data.extend_from_slice(&sig.signature_header);
                data.extend_from_slice(&self.config_update);
                Ok(SignedData {
                    identity: header.creator,
                    data,
                    signature: sig.signature.clone(),
                })
            })
            .collect()
    }
}
