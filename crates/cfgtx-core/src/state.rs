//! Per-channel configuration state
//!
//! `ConfigManagerState` is read by the authorizer and only written by
//! `commit_next`, which the engine calls after authorization succeeded.

use std::sync::Arc;

use cfgtx_core_types::ChainId;

use crate::errors::{ConfigTxError, Result};
use crate::flatten::flatten;
use crate::model::ConfigGroup;
use crate::policy::PolicyManager;
use crate::sequence::compute_sequence;
use crate::snapshot::ConfigSnapshot;

/// Current configuration of one channel
#[derive(Clone)]
pub struct ConfigManagerState {
    chain_id: ChainId,
    /// Name the snapshot was flattened under; fixes every key's first segment
    root_group: String,
    sequence: u64,
    current: ConfigSnapshot,
    policy_manager: Arc<dyn PolicyManager>,
}

impl ConfigManagerState {
    pub fn new(
        chain_id: ChainId,
        root_group: impl Into<String>,
        sequence: u64,
        current: ConfigSnapshot,
        policy_manager: Arc<dyn PolicyManager>,
    ) -> Self {
        Self {
            chain_id,
            root_group: root_group.into(),
            sequence,
            current,
            policy_manager,
        }
    }

    /// Build genesis state from a full configuration tree
    ///
    /// The genesis sequence is the highest version found in the tree.
    ///
    /// # Errors
    ///
    /// Propagates flattening errors (`InvalidName`, `DuplicateKey`).
    pub fn from_genesis(
        chain_id: ChainId,
        root_group: &str,
        config: &ConfigGroup,
        policy_manager: Arc<dyn PolicyManager>,
    ) -> Result<Self> {
        let current = flatten(root_group, config)?;
        Ok(Self::new(
            chain_id,
            root_group,
            compute_sequence(config),
            current,
            policy_manager,
        ))
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn root_group(&self) -> &str {
        &self.root_group
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn current(&self) -> &ConfigSnapshot {
        &self.current
    }

    pub fn policy_manager(&self) -> &dyn PolicyManager {
        self.policy_manager.as_ref()
    }

    /// Sequence the next accepted update must claim
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the sequence space is exhausted.
    pub fn next_sequence(&self) -> Result<u64> {
        self.sequence
            .checked_add(1)
            .ok_or_else(|| ConfigTxError::Internal {
                message: format!("sequence exhausted on chain {}", self.chain_id),
            })
    }

    /// Swap in an authorized snapshot and advance the sequence by one
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the sequence space is exhausted; state is untouched.
    pub fn commit_next(&mut self, snapshot: ConfigSnapshot) -> Result<u64> {
        let next = self.next_sequence()?;
        self.sequence = next;
        self.current = snapshot;
        Ok(next)
    }
}

impl std::fmt::Debug for ConfigManagerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManagerState")
            .field("chain_id", &self.chain_id)
            .field("root_group", &self.root_group)
            .field("sequence", &self.sequence)
            .field("keys", &self.current.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigValue;
    use crate::policy::PolicyManagerImpl;

    #[test]
    fn test_genesis_sequence_is_max_version() {
        let tree = ConfigGroup::new(0, "Admins")
            .with_value("A", ConfigValue::new(4, b"a".to_vec(), "P1"));
        let state = ConfigManagerState::from_genesis(
            ChainId::new("mychannel"),
            "Channel",
            &tree,
            Arc::new(PolicyManagerImpl::new("Channel")),
        )
        .unwrap();

        assert_eq!(state.sequence(), 4);
        assert_eq!(state.root_group(), "Channel");
        assert_eq!(state.current().len(), 2);
    }

    #[test]
    fn test_commit_next_fails_at_exhaustion_without_mutation() {
        let mut state = ConfigManagerState::new(
            ChainId::new("mychannel"),
            "Channel",
            u64::MAX,
            ConfigSnapshot::new(),
            Arc::new(PolicyManagerImpl::new("Channel")),
        );

        let mut replacement = ConfigSnapshot::new();
        replacement.insert(
            "[Groups] /Channel".to_string(),
            crate::flatten::flatten("Channel", &ConfigGroup::default())
                .unwrap()
                .get("[Groups] /Channel")
                .unwrap()
                .clone(),
        );

        assert!(state.commit_next(replacement).is_err());
        assert_eq!(state.sequence(), u64::MAX);
        assert!(state.current().is_empty());
    }
}
