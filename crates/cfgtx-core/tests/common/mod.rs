#![allow(dead_code)]

use std::sync::Arc;

use cfgtx_core::codec;
use cfgtx_core::model::{
    ChannelHeader, ConfigGroup, ConfigPolicy, ConfigSignature, ConfigUpdate,
    ConfigUpdateEnvelope, ConfigValue, HeaderType, PolicyDefinition, SignatureHeader, SignedData,
};
use cfgtx_core::policy::{PolicyManagerImpl, SignedByPolicy};
use cfgtx_core::ConfigManagerState;
use cfgtx_core_types::ChainId;

pub const CHAIN: &str = "mychannel";
pub const KEY_A: &str = "[Values] /Channel/A";
pub const KEY_B: &str = "[Values] /Channel/B";
pub const KEY_BATCH: &str = "[Values] /Channel/Orderer/BatchSize";
pub const KEY_ORDERER: &str = "[Groups] /Channel/Orderer";
pub const KEY_ROOT: &str = "[Groups] /Channel";

/// Genesis tree at sequence 4
///
/// ```text
/// Channel (Admins)
///   A = "a" (P1, v4)     B = "b" (P1, v4)
///   Policies: Admins, P1
///   Orderer (Admins)
///     BatchSize = "10" (Orderer/Admins, v0)
/// ```
pub fn genesis_tree() -> ConfigGroup {
    ConfigGroup::new(0, "Admins")
        .with_value("A", ConfigValue::new(4, b"a".to_vec(), "P1"))
        .with_value("B", ConfigValue::new(4, b"b".to_vec(), "P1"))
        .with_policy(
            "Admins",
            ConfigPolicy::new(
                0,
                Some(PolicyDefinition {
                    policy_type: 1,
                    value: b"admin".to_vec(),
                }),
                "Admins",
            ),
        )
        .with_policy(
            "P1",
            ConfigPolicy::new(
                0,
                Some(PolicyDefinition {
                    policy_type: 1,
                    value: b"org1".to_vec(),
                }),
                "Admins",
            ),
        )
        .with_group(
            "Orderer",
            ConfigGroup::new(0, "Admins")
                .with_value("BatchSize", ConfigValue::new(0, b"10".to_vec(), "")),
        )
}

/// Policy registry mirroring the genesis tree
pub fn policy_manager() -> PolicyManagerImpl {
    PolicyManagerImpl::new("Channel")
        .with_policy("Admins", SignedByPolicy::new(1, [b"admin".to_vec()]))
        .with_policy("P1", SignedByPolicy::new(1, [b"org1".to_vec()]))
        .with_manager(
            PolicyManagerImpl::new("Orderer")
                .with_policy("Admins", SignedByPolicy::new(1, [b"orderer-admin".to_vec()])),
        )
}

pub fn genesis_state() -> ConfigManagerState {
    genesis_state_for(CHAIN)
}

pub fn genesis_state_for(chain: &str) -> ConfigManagerState {
    ConfigManagerState::from_genesis(
        ChainId::new(chain),
        "Channel",
        &genesis_tree(),
        Arc::new(policy_manager()),
    )
    .unwrap()
}

/// Full write-set claiming `seq`: the genesis tree with the root stamped `seq`
pub fn write_set(seq: u64) -> ConfigGroup {
    let mut tree = genesis_tree();
    tree.version = seq;
    tree
}

pub fn update_for(chain: &str, write_set: ConfigGroup) -> ConfigUpdate {
    ConfigUpdate {
        header: Some(ChannelHeader::new(HeaderType::ConfigUpdate, chain)),
        write_set: Some(write_set),
    }
}

pub fn update(write_set: ConfigGroup) -> ConfigUpdate {
    update_for(CHAIN, write_set)
}

pub fn signed(identity: &[u8]) -> SignedData {
    SignedData {
        identity: identity.to_vec(),
        data: Vec::new(),
        signature: Vec::new(),
    }
}

/// Encode an update and attach one endorsement per identity
pub fn envelope(update: &ConfigUpdate, signers: &[&[u8]]) -> ConfigUpdateEnvelope {
    let signatures = signers
        .iter()
        .map(|id| ConfigSignature {
            signature_header: codec::marshal(&SignatureHeader {
                creator: id.to_vec(),
                nonce: b"nonce".to_vec(),
            })
            .unwrap(),
            signature: b"sig".to_vec(),
        })
        .collect();

    ConfigUpdateEnvelope {
        config_update: codec::marshal(update).unwrap(),
        signatures,
    }
}
