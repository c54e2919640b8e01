//! cfgtx Core - configuration update authorization kernel
//!
//! This crate decides whether a proposed configuration update may replace
//! the current configuration of a channel, and computes the resulting
//! snapshot. It provides:
//! - Configuration tree, flattened item and envelope models
//! - Envelope extraction and a JSON wire codec
//! - Sequence resolution and tree flattening
//! - Hierarchical modification-policy resolution
//! - Update authorization (sequence fencing, chain isolation, per-item
//!   policy checks, implicit-deletion guard) and result merging
//! - Snapshot digests, the structured error facility, and logging
//!
//! Everything here is side-effect free with respect to channel state; the
//! engine crate owns state and serializes commits.

pub mod authorize;
pub mod codec;
pub mod errors;
pub mod extract;
pub mod flatten;
pub mod logging_facility;
pub mod merge;
pub mod model;
pub mod policy;
pub mod sequence;
pub mod snapshot;
pub mod state;

// Re-export commonly used types
pub use authorize::{authorize_envelope, authorize_update, AuthorizerConfig};
pub use errors::{CfgError, CfgErrorKind, ConfigTxError, Result};
pub use extract::envelope_to_config_update;
pub use model::{ConfigGroup, ConfigUpdate, ConfigUpdateEnvelope, FlatItem, SignedData};
pub use policy::{Policy, PolicyManager, PolicyManagerImpl};
pub use snapshot::ConfigSnapshot;
pub use state::ConfigManagerState;
