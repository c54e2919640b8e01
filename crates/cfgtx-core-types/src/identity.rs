//! Chain identity
//!
//! A `ChainId` is the globally unique name of one replicated configuration
//! instance. Updates carry the chain they target in their channel header and
//! are rejected if it does not match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique name of a configuration instance (channel)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Wrap an existing chain name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChainId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ChainId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
