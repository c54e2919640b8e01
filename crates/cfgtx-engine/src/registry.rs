//! Channel registry
//!
//! Channels are independent: each has its own `ConfigManager` and lock, so
//! updates to different channels proceed in parallel. The registry lock is
//! only held to look a channel up, never across an apply.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cfgtx_core::errors::{ConfigTxError, Result};
use cfgtx_core::model::ConfigUpdateEnvelope;
use cfgtx_core::{AuthorizerConfig, ConfigManagerState};
use cfgtx_core_types::ChainId;

use crate::manager::{CommitRecord, ConfigManager};

#[derive(Debug, Default)]
pub struct ChannelRegistry {
    config: AuthorizerConfig,
    channels: RwLock<HashMap<ChainId, Arc<ConfigManager>>>,
}

impl ChannelRegistry {
    pub fn new(config: AuthorizerConfig) -> Self {
        Self {
            config,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a channel from its genesis state
    ///
    /// # Errors
    ///
    /// Returns `ChannelExists` if the chain is already registered, or
    /// `InvalidConfig` if the state's root group differs from the registry's.
    pub fn create_channel(&self, state: ConfigManagerState) -> Result<Arc<ConfigManager>> {
        let chain_id = state.chain_id().clone();
        let mut channels = self.channels.write().map_err(|_| poisoned())?;

        if channels.contains_key(&chain_id) {
            return Err(ConfigTxError::ChannelExists {
                chain_id: chain_id.to_string(),
            });
        }

        let manager = Arc::new(ConfigManager::new(state, self.config.clone())?);
        channels.insert(chain_id.clone(), Arc::clone(&manager));
        tracing::info!(chain_id = %chain_id, "channel created");

        Ok(manager)
    }

    /// # Errors
    ///
    /// Returns `ChannelNotFound` for an unknown chain.
    pub fn get(&self, chain_id: &ChainId) -> Result<Arc<ConfigManager>> {
        let channels = self.channels.read().map_err(|_| poisoned())?;
        channels
            .get(chain_id)
            .cloned()
            .ok_or_else(|| ConfigTxError::ChannelNotFound {
                chain_id: chain_id.to_string(),
            })
    }

    /// Apply an update envelope to the named channel
    ///
    /// # Errors
    ///
    /// `ChannelNotFound`, then anything `ConfigManager::apply` can return.
    pub fn apply(
        &self,
        chain_id: &ChainId,
        envelope: &ConfigUpdateEnvelope,
    ) -> Result<CommitRecord> {
        self.get(chain_id)?.apply(envelope)
    }

    /// Registered chain identities, sorted
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if the registry lock is poisoned.
    pub fn channels(&self) -> Result<Vec<ChainId>> {
        let channels = self.channels.read().map_err(|_| poisoned())?;
        let mut ids: Vec<ChainId> = channels.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

fn poisoned() -> ConfigTxError {
    ConfigTxError::LockPoisoned {
        chain_id: "*".to_string(),
    }
}
