//! cfgtx Engine - stateful orchestration
//!
//! Owns per-channel configuration state and serializes the
//! authorize-then-commit cycle on top of `cfgtx-core`.

pub mod config;
pub mod manager;
pub mod registry;

pub use config::EngineConfig;
pub use manager::{CommitRecord, ConfigManager};
pub use registry::ChannelRegistry;
