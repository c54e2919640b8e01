//! Update authorization
//!
//! Decides whether a proposed write-set may replace the current
//! configuration. Checks, in order:
//!
//! 0. The configured root group is the one the state was flattened under
//! 1. The update and its header are present
//! 2. The claimed sequence is exactly current + 1
//! 3. The update targets this chain
//! 4. Every modified key carries the new sequence and satisfies the
//!    modification policy it had *before* the change
//! 5. Every new key carries the new sequence
//! 6. No existing key was dropped
//!
//! On success the merged snapshot is returned. Nothing is mutated; the
//! caller commits the result.

use serde::Deserialize;
use std::time::Instant;

use crate::codec;
use crate::errors::{ConfigTxError, Result};
use crate::merge::compute_update_result;
use crate::model::item::item_key;
use crate::model::{ChannelHeader, ConfigGroup, ConfigUpdate, ConfigUpdateEnvelope, ItemKind, SignedData};
use crate::policy::policy_for_item;
use crate::sequence::compute_sequence;
use crate::snapshot::ConfigSnapshot;
use crate::state::ConfigManagerState;
use crate::flatten::flatten;
use crate::{log_op_end, log_op_error, log_op_start};

/// Default name of the root group of every configuration tree
pub const DEFAULT_ROOT_GROUP: &str = "Channel";

/// Settings for the authorizer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthorizerConfig {
    /// Name of the root group; also fixes the one key exempt from policy checks
    pub root_group: String,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self {
            root_group: DEFAULT_ROOT_GROUP.to_string(),
        }
    }
}

impl AuthorizerConfig {
    /// Key of the root group, e.g. `[Groups] /Channel`
    ///
    /// The root group's own entry is not evaluated for modification here;
    /// changes under it are authorized through their own items.
    pub fn root_group_key(&self) -> String {
        item_key(ItemKind::Group, std::slice::from_ref(&self.root_group))
    }

    /// Check that `state` was flattened under this root group
    ///
    /// Under any other name every proposed key would look new, so no update
    /// could ever be accepted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming both root groups.
    pub fn check_state(&self, state: &ConfigManagerState) -> Result<()> {
        if state.root_group() != self.root_group {
            return Err(ConfigTxError::InvalidConfig {
                message: format!(
                    "authorizer root group '{}' does not match channel {} root group '{}'",
                    self.root_group,
                    state.chain_id(),
                    state.root_group()
                ),
            });
        }
        Ok(())
    }
}

/// Authorize a decoded update against the given signature set
///
/// # Errors
///
/// - `InvalidConfig` if `config` names a different root group than `state`
/// - `NilUpdate`, `MissingHeader`, `MissingWriteSet` for malformed input
/// - `SequenceMismatch`, `ChainMismatch` for fencing violations
/// - `NewKeyStaleVersion`, `ModifiedKeyStaleVersion`, `MissingPolicy`,
///   `ImplicitDeletion` for consistency violations
/// - `PolicyNotSatisfied` when a modified key's policy rejects the signatures
/// - `InvalidName`, `DuplicateKey` if the write-set cannot be flattened
pub fn authorize_update(
    state: &ConfigManagerState,
    update: Option<&ConfigUpdate>,
    signed_data: &[SignedData],
    config: &AuthorizerConfig,
) -> Result<ConfigSnapshot> {
    log_op_start!(
        "authorize_update",
        chain_id = %state.chain_id(),
        sequence = state.sequence()
    );
    let start = Instant::now();

    let result = authorize_update_impl(state, update, signed_data, config).map_err(|e| {
        log_op_error!(
            "authorize_update",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            chain_id = %state.chain_id()
        );
        e
    })?;

    log_op_end!(
        "authorize_update",
        duration_ms = start.elapsed().as_millis() as u64,
        key_count = result.len()
    );

    Ok(result)
}

/// Decode and authorize a config update envelope
///
/// The signature set is derived from the envelope's own endorsements.
///
/// # Errors
///
/// `InvalidConfig` on a root-group mismatch, `NilEnvelope` if no envelope
/// is given, `Decode` if the update or any signature header cannot be
/// decoded, then everything `authorize_update` can return.
pub fn authorize_envelope(
    state: &ConfigManagerState,
    envelope: Option<&ConfigUpdateEnvelope>,
    config: &AuthorizerConfig,
) -> Result<ConfigSnapshot> {
    log_op_start!(
        "authorize_envelope",
        chain_id = %state.chain_id(),
        sequence = state.sequence()
    );
    let start = Instant::now();

    let result = authorize_envelope_impl(state, envelope, config).map_err(|e| {
        log_op_error!(
            "authorize_envelope",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            chain_id = %state.chain_id()
        );
        e
    })?;

    log_op_end!(
        "authorize_envelope",
        duration_ms = start.elapsed().as_millis() as u64,
        key_count = result.len()
    );

    Ok(result)
}

fn authorize_update_impl(
    state: &ConfigManagerState,
    update: Option<&ConfigUpdate>,
    signed_data: &[SignedData],
    config: &AuthorizerConfig,
) -> Result<ConfigSnapshot> {
    config.check_state(state)?;
    let update = update.ok_or(ConfigTxError::NilUpdate)?;
    let (header, write_set) = required_parts(update)?;
    let seq = compute_sequence(write_set);

    verify_and_merge(state, header, write_set, seq, signed_data, config)
}

fn authorize_envelope_impl(
    state: &ConfigManagerState,
    envelope: Option<&ConfigUpdateEnvelope>,
    config: &AuthorizerConfig,
) -> Result<ConfigSnapshot> {
    config.check_state(state)?;
    let envelope = envelope.ok_or(ConfigTxError::NilEnvelope)?;
    let update = codec::unmarshal_config_update(&envelope.config_update)?;
    let (header, write_set) = required_parts(&update)?;
    let seq = compute_sequence(write_set);
    let signed_data = envelope.as_signed_data()?;

    verify_and_merge(state, header, write_set, seq, &signed_data, config)
}

fn required_parts(update: &ConfigUpdate) -> Result<(&ChannelHeader, &ConfigGroup)> {
    let header = update.header.as_ref().ok_or(ConfigTxError::MissingHeader)?;
    let write_set = update
        .write_set
        .as_ref()
        .ok_or(ConfigTxError::MissingWriteSet)?;
    Ok((header, write_set))
}

fn verify_and_merge(
    state: &ConfigManagerState,
    header: &ChannelHeader,
    write_set: &ConfigGroup,
    seq: u64,
    signed_data: &[SignedData],
    config: &AuthorizerConfig,
) -> Result<ConfigSnapshot> {
    // Sequential updates only, so sequence numbers cannot be exhausted or replayed
    if seq != state.next_sequence()? {
        return Err(ConfigTxError::SequenceMismatch {
            current: state.sequence(),
            proposed: seq,
        });
    }

    if header.channel_id != state.chain_id().as_str() {
        return Err(ConfigTxError::ChainMismatch {
            expected: state.chain_id().to_string(),
            got: header.channel_id.clone(),
        });
    }

    let proposed = flatten(&config.root_group, write_set)?;
    let exempt_key = config.root_group_key();
    let mut modified = 0usize;

    for (key, value) in &proposed {
        tracing::debug!(key = %key, version = value.version, "processing config key");

        if *key == exempt_key {
            continue;
        }

        let old_value = state.current().get(key);
        let is_modified = match old_value {
            Some(old) => value != old,
            None => {
                if value.version != seq {
                    return Err(ConfigTxError::NewKeyStaleVersion {
                        key: key.clone(),
                        version: value.version,
                        sequence: seq,
                    });
                }
                true
            }
        };

        if !is_modified {
            continue;
        }

        modified += 1;
        tracing::debug!(
            key = %key,
            chain_id = %state.chain_id(),
            "proposed config item has been modified"
        );

        if value.version != seq {
            return Err(ConfigTxError::ModifiedKeyStaleVersion {
                key: key.clone(),
                version: value.version,
                sequence: seq,
            });
        }

        // New keys are admitted by their enclosing group's check
        let Some(old) = old_value else {
            continue;
        };

        // The policy in force before the change governs it
        let policy = policy_for_item(state.policy_manager(), old).ok_or_else(|| {
            ConfigTxError::MissingPolicy {
                key: key.clone(),
                mod_policy: old.mod_policy.clone(),
            }
        })?;

        policy
            .evaluate(signed_data)
            .map_err(|e| ConfigTxError::PolicyNotSatisfied {
                key: key.clone(),
                reason: e.to_string(),
            })?;
    }

    // Existing items may never be dropped by omission
    if let Some(missing) = state.current().keys().find(|k| !proposed.contains_key(k)) {
        return Err(ConfigTxError::ImplicitDeletion {
            key: missing.clone(),
        });
    }

    tracing::debug!(
        chain_id = %state.chain_id(),
        sequence = seq,
        modified_count = modified,
        "config update authorized"
    );

    Ok(compute_update_result(state.current(), &proposed))
}
