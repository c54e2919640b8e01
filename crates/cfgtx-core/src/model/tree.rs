//! Hierarchical configuration tree
//!
//! This is the shape of both a full genesis configuration and a sparse
//! write-set. Children are kept in `BTreeMap`s so traversal and flattening
//! are deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named group of sub-groups, values and policies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigGroup {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub groups: BTreeMap<String, ConfigGroup>,
    #[serde(default)]
    pub values: BTreeMap<String, ConfigValue>,
    #[serde(default)]
    pub policies: BTreeMap<String, ConfigPolicy>,
    /// Empty means "inherit from the enclosing group"
    #[serde(default)]
    pub mod_policy: String,
}

impl ConfigGroup {
    /// Create an empty group at the given version
    pub fn new(version: u64, mod_policy: impl Into<String>) -> Self {
        Self {
            version,
            mod_policy: mod_policy.into(),
            ..Self::default()
        }
    }

    /// Add (or replace) a child group
    pub fn with_group(mut self, name: impl Into<String>, group: ConfigGroup) -> Self {
        self.groups.insert(name.into(), group);
        self
    }

    /// Add (or replace) a value
    pub fn with_value(mut self, name: impl Into<String>, value: ConfigValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Add (or replace) a policy
    pub fn with_policy(mut self, name: impl Into<String>, policy: ConfigPolicy) -> Self {
        self.policies.insert(name.into(), policy);
        self
    }
}

/// A leaf value holding opaque bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    #[serde(default)]
    pub version: u64,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub value: Vec<u8>,
    #[serde(default)]
    pub mod_policy: String,
}

impl ConfigValue {
    pub fn new(version: u64, value: impl Into<Vec<u8>>, mod_policy: impl Into<String>) -> Self {
        Self {
            version,
            value: value.into(),
            mod_policy: mod_policy.into(),
        }
    }
}

/// Opaque policy definition; only its equality matters here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub policy_type: i32,
    #[serde(default, with = "crate::codec::base64_bytes")]
    pub value: Vec<u8>,
}

/// A policy entry in the tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPolicy {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub policy: Option<PolicyDefinition>,
    #[serde(default)]
    pub mod_policy: String,
}

impl ConfigPolicy {
    pub fn new(
        version: u64,
        policy: Option<PolicyDefinition>,
        mod_policy: impl Into<String>,
    ) -> Self {
        Self {
            version,
            policy,
            mod_policy: mod_policy.into(),
        }
    }
}
