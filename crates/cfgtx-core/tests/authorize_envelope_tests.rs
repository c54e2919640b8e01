//! Envelope-level authorization
//!
//! Exercises the full path from an encoded `ConfigUpdateEnvelope` through
//! signature projection, authorization and merge.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cfgtx_core::codec;
use cfgtx_core::model::{
    ChannelHeader, ConfigSignature, ConfigUpdateEnvelope, ConfigValue, Envelope, Header,
    HeaderType, ItemContent, Payload,
};
use cfgtx_core::snapshot::compute_snapshot_digest;
use cfgtx_core::{
    authorize_envelope, envelope_to_config_update, AuthorizerConfig, ConfigManagerState,
    ConfigTxError,
};
use common::*;

fn authorize(
    state: &ConfigManagerState,
    envelope: &ConfigUpdateEnvelope,
) -> cfgtx_core::Result<cfgtx_core::ConfigSnapshot> {
    authorize_envelope(state, Some(envelope), &AuthorizerConfig::default())
}

fn ws_with_a(version: u64, content: &[u8]) -> cfgtx_core::ConfigGroup {
    let mut ws = write_set(5);
    ws.values.insert(
        "A".to_string(),
        ConfigValue::new(version, content.to_vec(), "P1"),
    );
    ws
}

// ===== End-to-end scenario =====

#[test]
fn test_end_to_end_update_of_a_by_p1_signer() {
    // GIVEN a channel at sequence 4 with A (v4, P1) and B
    let state = genesis_state();
    assert_eq!(state.sequence(), 4);

    // WHEN an update claims 5, changes A at version 5 and is signed for P1
    let env = envelope(&update(ws_with_a(5, b"a2")), &[b"org1"]);
    let result = authorize(&state, &env).unwrap();

    // THEN the result holds the new A and keeps B untouched
    let a = result.get(KEY_A).unwrap();
    assert_eq!(a.version, 5);
    assert_eq!(a.content, ItemContent::Value(b"a2".to_vec()));
    assert_eq!(result.get(KEY_B), state.current().get(KEY_B));
    assert_eq!(result.len(), state.current().len());
}

#[test]
fn test_end_to_end_stale_version_on_changed_a() {
    let state = genesis_state();
    let env = envelope(&update(ws_with_a(4, b"a2")), &[b"org1"]);

    assert_eq!(
        authorize(&state, &env),
        Err(ConfigTxError::ModifiedKeyStaleVersion {
            key: KEY_A.to_string(),
            version: 4,
            sequence: 5
        })
    );
}

#[test]
fn test_end_to_end_signature_not_satisfying_p1() {
    let state = genesis_state();
    let env = envelope(&update(ws_with_a(5, b"a2")), &[b"admin"]);

    assert!(matches!(
        authorize(&state, &env),
        Err(ConfigTxError::PolicyNotSatisfied { ref key, .. }) if key == KEY_A
    ));
}

#[test]
fn test_end_to_end_omitting_b() {
    let state = genesis_state();
    let mut ws = ws_with_a(5, b"a2");
    ws.values.remove("B");
    let env = envelope(&update(ws), &[b"org1"]);

    assert_eq!(
        authorize(&state, &env),
        Err(ConfigTxError::ImplicitDeletion {
            key: KEY_B.to_string()
        })
    );
}

// ===== Envelope decoding =====

#[test]
fn test_nil_envelope_rejected() {
    let state = genesis_state();
    assert_eq!(
        authorize_envelope(&state, None, &AuthorizerConfig::default()),
        Err(ConfigTxError::NilEnvelope)
    );
}

#[test]
fn test_undecodable_update_rejected() {
    let state = genesis_state();
    let env = ConfigUpdateEnvelope {
        config_update: b"not an update".to_vec(),
        signatures: Vec::new(),
    };

    assert!(matches!(
        authorize(&state, &env),
        Err(ConfigTxError::Decode { .. })
    ));
}

#[test]
fn test_undecodable_signature_header_rejected() {
    let state = genesis_state();
    let mut env = envelope(&update(ws_with_a(5, b"a2")), &[]);
    env.signatures.push(ConfigSignature {
        signature_header: b"garbage".to_vec(),
        signature: Vec::new(),
    });

    assert!(matches!(
        authorize(&state, &env),
        Err(ConfigTxError::Decode { .. })
    ));
}

#[test]
fn test_signed_data_covers_header_and_update() {
    let env = envelope(&update(write_set(5)), &[b"org1"]);
    let signed = env.as_signed_data().unwrap();

    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].identity, b"org1".to_vec());
    assert!(signed[0].data.ends_with(&env.config_update));
    assert!(signed[0].data.starts_with(&env.signatures[0].signature_header));
}

#[test]
fn test_outer_envelope_unwraps_to_authorizable_update() {
    // GIVEN a generic envelope declaring a config update
    let state = genesis_state();
    let inner = envelope(&update(ws_with_a(5, b"a2")), &[b"org1"]);
    let outer = Envelope {
        payload: codec::marshal(&Payload {
            header: Some(Header {
                channel_header: codec::marshal(&ChannelHeader::new(
                    HeaderType::ConfigUpdate,
                    CHAIN,
                ))
                .unwrap(),
                signature_header: Vec::new(),
            }),
            data: codec::marshal(&inner).unwrap(),
        })
        .unwrap(),
        signature: Vec::new(),
    };

    // WHEN it is unwrapped and authorized
    let extracted = envelope_to_config_update(&outer).unwrap();
    let result = authorize(&state, &extracted).unwrap();

    // THEN the digest moves with the content
    assert_ne!(
        compute_snapshot_digest(&result).unwrap(),
        compute_snapshot_digest(state.current()).unwrap()
    );
}

#[test]
fn test_outer_envelope_with_wrong_type_rejected() {
    let outer = Envelope {
        payload: codec::marshal(&Payload {
            header: Some(Header {
                channel_header: codec::marshal(&ChannelHeader::new(
                    HeaderType::EndorserTransaction,
                    CHAIN,
                ))
                .unwrap(),
                signature_header: Vec::new(),
            }),
            data: Vec::new(),
        })
        .unwrap(),
        signature: Vec::new(),
    };

    assert_eq!(
        envelope_to_config_update(&outer),
        Err(ConfigTxError::WrongHeaderType {
            header_type: HeaderType::EndorserTransaction.as_i32()
        })
    );
}
