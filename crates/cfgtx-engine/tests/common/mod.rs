#![allow(dead_code)]

use std::sync::Arc;

use cfgtx_core::codec;
use cfgtx_core::model::{
    ChannelHeader, ConfigGroup, ConfigSignature, ConfigUpdate, ConfigUpdateEnvelope, ConfigValue,
    HeaderType, SignatureHeader,
};
use cfgtx_core::policy::{PolicyManagerImpl, SignedByPolicy};
use cfgtx_core::ConfigManagerState;
use cfgtx_core_types::ChainId;

pub const KEY_A: &str = "[Values] /Channel/A";

/// Channel at sequence 4 holding A and B, both governed by P1 (signed by org1)
pub fn genesis_tree() -> ConfigGroup {
    ConfigGroup::new(0, "Admins")
        .with_value("A", ConfigValue::new(4, b"a".to_vec(), "P1"))
        .with_value("B", ConfigValue::new(4, b"b".to_vec(), "P1"))
}

pub fn genesis_state(chain: &str) -> ConfigManagerState {
    ConfigManagerState::from_genesis(
        ChainId::new(chain),
        "Channel",
        &genesis_tree(),
        Arc::new(
            PolicyManagerImpl::new("Channel")
                .with_policy("Admins", SignedByPolicy::new(1, [b"admin".to_vec()]))
                .with_policy("P1", SignedByPolicy::new(1, [b"org1".to_vec()])),
        ),
    )
    .unwrap()
}

/// Update setting A to `content` at `seq`, every other item carried unchanged
pub fn set_a(chain: &str, seq: u64, content: &[u8]) -> ConfigUpdate {
    let mut ws = genesis_tree();
    ws.version = seq;
    ws.values
        .insert("A".to_string(), ConfigValue::new(seq, content.to_vec(), "P1"));
    ConfigUpdate {
        header: Some(ChannelHeader::new(HeaderType::ConfigUpdate, chain)),
        write_set: Some(ws),
    }
}

pub fn envelope(update: &ConfigUpdate, signers: &[&[u8]]) -> ConfigUpdateEnvelope {
    ConfigUpdateEnvelope {
        config_update: codec::marshal(update).unwrap(),
        signatures: signers
            .iter()
            .map(|id| ConfigSignature {
                signature_header: codec::marshal(&SignatureHeader {
                    creator: id.to_vec(),
                    nonce: Vec::new(),
                })
                .unwrap(),
                signature: Vec::new(),
            })
            .collect(),
    }
}
