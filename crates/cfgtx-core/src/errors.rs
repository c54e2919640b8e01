use cfgtx_core_types::{ChainId, RequestId};
use thiserror::Error;

/// Result type alias using ConfigTxError
pub type Result<T> = std::result::Result<T, ConfigTxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every rejection of a proposed configuration update falls into one of
/// these kinds. Each kind maps to a stable error code for programmatic
/// handling by the commit pipeline and for log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfgErrorKind {
    // Malformed input
    MalformedInput,
    WrongHeaderType,
    Decode,
    InvalidName,
    DuplicateKey,

    // Protocol / fencing
    SequenceMismatch,
    ChainMismatch,

    // Consistency
    StaleVersion,
    MissingPolicy,
    ImplicitDeletion,

    // Authorization
    PolicyDenied,

    // Channel registry
    NotFound,
    AlreadyExists,

    // Integration
    Serialization,
    Concurrency,
    InvalidConfig,

    // Internal
    Internal,
}

impl CfgErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            CfgErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            CfgErrorKind::WrongHeaderType => "ERR_WRONG_HEADER_TYPE",
            CfgErrorKind::Decode => "ERR_DECODE",
            CfgErrorKind::InvalidName => "ERR_INVALID_NAME",
            CfgErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            CfgErrorKind::SequenceMismatch => "ERR_SEQUENCE_MISMATCH",
            CfgErrorKind::ChainMismatch => "ERR_CHAIN_MISMATCH",
            CfgErrorKind::StaleVersion => "ERR_STALE_VERSION",
            CfgErrorKind::MissingPolicy => "ERR_MISSING_POLICY",
            CfgErrorKind::ImplicitDeletion => "ERR_IMPLICIT_DELETION",
            CfgErrorKind::PolicyDenied => "ERR_POLICY_DENIED",
            CfgErrorKind::NotFound => "ERR_NOT_FOUND",
            CfgErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            CfgErrorKind::Serialization => "ERR_SERIALIZATION",
            CfgErrorKind::Concurrency => "ERR_CONCURRENCY",
            CfgErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            CfgErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context identifies the
/// offending update: the config key, the chain, the sequence involved.
#[derive(Debug, Clone)]
pub struct CfgError {
    kind: CfgErrorKind,
    op: Option<String>,
    key: Option<String>,
    chain_id: Option<ChainId>,
    sequence: Option<u64>,
    request_id: Option<RequestId>,
    message: String,
}

impl CfgError {
    /// Create a new error with the specified kind
    pub fn new(kind: CfgErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key: None,
            chain_id: None,
            sequence: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add config key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add chain context
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Add sequence context
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> CfgErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn chain_id(&self) -> Option<&ChainId> {
        self.chain_id.as_ref()
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for CfgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        if let Some(chain_id) = &self.chain_id {
            write!(f, " (chain: {})", chain_id)?;
        }
        if let Some(sequence) = self.sequence {
            write!(f, " (sequence: {})", sequence)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for CfgError {}

// ========== End Error Facility ==========

/// Error taxonomy for configuration update processing
///
/// No variant is retryable at this layer: every error means the proposed
/// update is rejected and the manager state is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigTxError {
    // ===== Malformed Input =====
    /// No envelope was supplied
    #[error("Cannot process nil ConfigUpdateEnvelope")]
    NilEnvelope,

    /// No update was supplied
    #[error("Cannot process nil ConfigUpdate")]
    NilUpdate,

    /// Update carries no channel header
    #[error("Must have header set")]
    MissingHeader,

    /// Update carries no write set
    #[error("Must have write set")]
    MissingWriteSet,

    /// Generic envelope payload carries no header
    #[error("Envelope must have a Header")]
    MissingEnvelopeHeader,

    /// Channel header bytes could not be decoded
    #[error("Invalid ChannelHeader: {message}")]
    InvalidChannelHeader { message: String },

    /// Envelope declares a type other than CONFIG_UPDATE
    #[error("Not a tx of type CONFIG_UPDATE (header type {header_type})")]
    WrongHeaderType { header_type: i32 },

    /// Bytes for a wire structure could not be decoded
    #[error("Error unmarshaling {what}: {message}")]
    Decode { what: String, message: String },

    /// Tree element name is not a legal config name
    #[error("Illegal name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Two tree elements flattened to the same key
    #[error("Duplicate config key {key}")]
    DuplicateKey { key: String },

    // ===== Fencing =====
    /// Proposed sequence is not exactly current + 1
    #[error("Config sequence number jumped from {current} to {proposed}")]
    SequenceMismatch { current: u64, proposed: u64 },

    /// Update targets another chain
    #[error("Config is for the wrong chain, expected {expected}, got {got}")]
    ChainMismatch { expected: String, got: String },

    // ===== Consistency =====
    /// New key not stamped with the introducing sequence
    #[error("Key {key} was new, but had an older Sequence {version} set (expected {sequence})")]
    NewKeyStaleVersion {
        key: String,
        version: u64,
        sequence: u64,
    },

    /// Modified key not stamped with the current sequence
    #[error("Key {key} was modified, but its Version {version} does not equal current configtx Sequence {sequence}")]
    ModifiedKeyStaleVersion {
        key: String,
        version: u64,
        sequence: u64,
    },

    /// Existing key whose modification policy cannot be resolved
    #[error("Unexpected missing policy {mod_policy} for item {key}")]
    MissingPolicy { key: String, mod_policy: String },

    /// Existing key omitted from the proposed config
    #[error("Missing key {key} in new config")]
    ImplicitDeletion { key: String },

    // ===== Authorization =====
    /// Modification policy evaluated and rejected the signature set
    #[error("Policy for {key} not satisfied: {reason}")]
    PolicyNotSatisfied { key: String, reason: String },

    // ===== Channel Registry =====
    #[error("Channel {chain_id} already exists")]
    ChannelExists { chain_id: String },

    #[error("Channel {chain_id} not found")]
    ChannelNotFound { chain_id: String },

    /// A previous holder of the channel state panicked mid-update
    #[error("State lock poisoned for channel {chain_id}")]
    LockPoisoned { chain_id: String },

    // ===== Configuration =====
    #[error("Invalid engine configuration: {message}")]
    InvalidConfig { message: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for ConfigTxError {
    fn from(err: serde_json::Error) -> Self {
        ConfigTxError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from ConfigTxError to the canonical CfgError
impl From<ConfigTxError> for CfgError {
    fn from(err: ConfigTxError) -> Self {
        let message = err.to_string();
        match err {
            ConfigTxError::NilEnvelope
            | ConfigTxError::NilUpdate
            | ConfigTxError::MissingHeader
            | ConfigTxError::MissingWriteSet
            | ConfigTxError::MissingEnvelopeHeader => {
                CfgError::new(CfgErrorKind::MalformedInput).with_message(message)
            }

            ConfigTxError::InvalidChannelHeader { .. } | ConfigTxError::Decode { .. } => {
                CfgError::new(CfgErrorKind::Decode).with_message(message)
            }

            ConfigTxError::WrongHeaderType { .. } => {
                CfgError::new(CfgErrorKind::WrongHeaderType).with_message(message)
            }

            ConfigTxError::InvalidName { name, .. } => CfgError::new(CfgErrorKind::InvalidName)
                .with_key(name)
                .with_message(message),

            ConfigTxError::DuplicateKey { key } => CfgError::new(CfgErrorKind::DuplicateKey)
                .with_key(key)
                .with_message(message),

            ConfigTxError::SequenceMismatch { proposed, .. } => {
                CfgError::new(CfgErrorKind::SequenceMismatch)
                    .with_sequence(proposed)
                    .with_message(message)
            }

            ConfigTxError::ChainMismatch { got, .. } => CfgError::new(CfgErrorKind::ChainMismatch)
                .with_chain_id(ChainId::new(got))
                .with_message(message),

            ConfigTxError::NewKeyStaleVersion { key, sequence, .. }
            | ConfigTxError::ModifiedKeyStaleVersion { key, sequence, .. } => {
                CfgError::new(CfgErrorKind::StaleVersion)
                    .with_key(key)
                    .with_sequence(sequence)
                    .with_message(message)
            }

            ConfigTxError::MissingPolicy { key, .. } => CfgError::new(CfgErrorKind::MissingPolicy)
                .with_key(key)
                .with_message(message),

            ConfigTxError::ImplicitDeletion { key } => {
                CfgError::new(CfgErrorKind::ImplicitDeletion)
                    .with_key(key)
                    .with_message(message)
            }

            ConfigTxError::PolicyNotSatisfied { key, .. } => {
                CfgError::new(CfgErrorKind::PolicyDenied)
                    .with_key(key)
                    .with_message(message)
            }

            ConfigTxError::ChannelExists { chain_id } => {
                CfgError::new(CfgErrorKind::AlreadyExists)
                    .with_chain_id(ChainId::new(chain_id))
                    .with_message(message)
            }

            ConfigTxError::ChannelNotFound { chain_id } => CfgError::new(CfgErrorKind::NotFound)
                .with_chain_id(ChainId::new(chain_id))
                .with_message(message),

            ConfigTxError::LockPoisoned { chain_id } => CfgError::new(CfgErrorKind::Concurrency)
                .with_chain_id(ChainId::new(chain_id))
                .with_message(message),

            ConfigTxError::InvalidConfig { .. } => {
                CfgError::new(CfgErrorKind::InvalidConfig).with_message(message)
            }

            ConfigTxError::Serialization { .. } => {
                CfgError::new(CfgErrorKind::Serialization).with_message(message)
            }

            ConfigTxError::Internal { .. } => {
                CfgError::new(CfgErrorKind::Internal).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_mismatch_message_names_both_sequences() {
        let err = ConfigTxError::SequenceMismatch {
            current: 4,
            proposed: 6,
        };
        assert_eq!(
            err.to_string(),
            "Config sequence number jumped from 4 to 6"
        );
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = CfgError::new(CfgErrorKind::PolicyDenied)
            .with_op("authorize_update")
            .with_key("[Values] /Channel/A")
            .with_message("not enough signatures");
        let s = err.to_string();
        assert!(s.starts_with("[ERR_POLICY_DENIED]"));
        assert!(s.contains("authorize_update"));
        assert!(s.contains("[Values] /Channel/A"));
    }

    #[test]
    fn test_display_includes_request_id_when_attached() {
        let request_id = RequestId::new();
        let err = CfgError::from(ConfigTxError::ImplicitDeletion {
            key: "[Values] /Channel/B".to_string(),
        })
        .with_op("apply")
        .with_request_id(request_id);

        assert_eq!(err.op(), Some("apply"));
        assert_eq!(err.request_id(), Some(&request_id));
        assert!(err.to_string().ends_with(&format!("(request: {request_id})")));
    }

    #[test]
    fn test_serde_json_error_converts_to_serialization() {
        let bad: std::result::Result<u64, _> = serde_json::from_str("not json");
        let err: ConfigTxError = bad.unwrap_err().into();
        assert!(matches!(err, ConfigTxError::Serialization { .. }));
    }
}
