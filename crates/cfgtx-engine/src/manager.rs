//! Per-channel config manager
//!
//! ## Apply pipeline (in order, under one lock acquisition):
//! 1. Authorize the proposed update against the current state
//! 2. Digest the merged snapshot
//! 3. Swap in the snapshot and advance the sequence
//!
//! Any failure before step 3 leaves the channel exactly as it was.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use cfgtx_core::errors::{CfgError, ConfigTxError, Result};
use cfgtx_core::model::{ConfigUpdate, ConfigUpdateEnvelope, Envelope, SignedData};
use cfgtx_core::{
    authorize_envelope, authorize_update, envelope_to_config_update, AuthorizerConfig,
    ConfigManagerState, ConfigSnapshot,
};
use cfgtx_core::{log_op_end, log_op_error, log_op_start};
use cfgtx_core_types::{ChainId, RequestId};

/// Result of a successfully applied update
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub chain_id: ChainId,
    /// Sequence now in force
    pub sequence: u64,
    /// Digest of the committed snapshot
    pub digest: String,
    pub committed_at: DateTime<Utc>,
    pub request_id: RequestId,
}

/// Owner of one channel's configuration state
///
/// All mutation goes through `apply`/`apply_update`, which hold the state
/// lock across authorization and commit. Readers see either the state
/// before an update or after it, never in between.
pub struct ConfigManager {
    chain_id: ChainId,
    config: AuthorizerConfig,
    state: Mutex<ConfigManagerState>,
}

impl ConfigManager {
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` names a different root group than
    /// the one `state` was built under.
    pub fn new(state: ConfigManagerState, config: AuthorizerConfig) -> Result<Self> {
        config.check_state(&state)?;
        Ok(Self {
            chain_id: state.chain_id().clone(),
            config,
            state: Mutex::new(state),
        })
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    /// # Errors
    ///
    /// Returns `LockPoisoned` if a previous holder panicked.
    pub fn sequence(&self) -> Result<u64> {
        Ok(self.lock()?.sequence())
    }

    /// Copy of the configuration currently in force
    ///
    /// # Errors
    ///
    /// Returns `LockPoisoned` if a previous holder panicked.
    pub fn snapshot(&self) -> Result<ConfigSnapshot> {
        Ok(self.lock()?.current().clone())
    }

    /// Authorize without committing
    ///
    /// # Errors
    ///
    /// Anything `authorize_envelope` can return, or `LockPoisoned`.
    pub fn validate(&self, envelope: &ConfigUpdateEnvelope) -> Result<ConfigSnapshot> {
        let state = self.lock()?;
        authorize_envelope(&state, Some(envelope), &self.config)
    }

    /// Authorize and commit a config update envelope
    ///
    /// # Errors
    ///
    /// Anything `authorize_envelope` can return, or `LockPoisoned`.
    pub fn apply(&self, envelope: &ConfigUpdateEnvelope) -> Result<CommitRecord> {
        self.run_commit("apply", |state, config| {
            authorize_envelope(state, Some(envelope), config)
        })
    }

    /// Authorize and commit an already decoded update
    ///
    /// # Errors
    ///
    /// Anything `authorize_update` can return, or `LockPoisoned`.
    pub fn apply_update(
        &self,
        update: &ConfigUpdate,
        signed_data: &[SignedData],
    ) -> Result<CommitRecord> {
        self.run_commit("apply_update", |state, config| {
            authorize_update(state, Some(update), signed_data, config)
        })
    }

    /// Unwrap a generic envelope and apply the config update inside
    ///
    /// # Errors
    ///
    /// Extraction errors (`Decode`, `MissingEnvelopeHeader`,
    /// `InvalidChannelHeader`, `WrongHeaderType`), then anything `apply`
    /// can return.
    pub fn process_envelope(&self, envelope: &Envelope) -> Result<CommitRecord> {
        let update_envelope = envelope_to_config_update(envelope)?;
        self.apply(&update_envelope)
    }

    fn run_commit<F>(&self, op: &'static str, authorize: F) -> Result<CommitRecord>
    where
        F: FnOnce(&ConfigManagerState, &AuthorizerConfig) -> Result<ConfigSnapshot>,
    {
        let request_id = RequestId::new();
        log_op_start!(op, chain_id = %self.chain_id, request_id = %request_id);
        let start = Instant::now();

        let result = self.commit_impl(authorize, request_id);
        match &result {
            Ok(record) => {
                log_op_end!(
                    op,
                    duration_ms = start.elapsed().as_millis() as u64,
                    chain_id = %record.chain_id,
                    sequence = record.sequence,
                    request_id = %request_id
                );
            }
            Err(e) => {
                log_op_error!(
                    op,
                    CfgError::from(e.clone()).with_request_id(request_id),
                    duration_ms = start.elapsed().as_millis() as u64,
                    chain_id = %self.chain_id,
                    request_id = %request_id
                );
            }
        }
        result
    }

    fn commit_impl<F>(&self, authorize: F, request_id: RequestId) -> Result<CommitRecord>
    where
        F: FnOnce(&ConfigManagerState, &AuthorizerConfig) -> Result<ConfigSnapshot>,
    {
        let mut state = self.lock()?;
        let merged = authorize(&state, &self.config)?;
        let digest = merged.digest()?;
        let sequence = state.commit_next(merged)?;

        Ok(CommitRecord {
            chain_id: self.chain_id.clone(),
            sequence,
            digest,
            committed_at: Utc::now(),
            request_id,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ConfigManagerState>> {
        self.state.lock().map_err(|_| ConfigTxError::LockPoisoned {
            chain_id: self.chain_id.to_string(),
        })
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("chain_id", &self.chain_id)
            .field("root_group", &self.config.root_group)
            .finish()
    }
}
