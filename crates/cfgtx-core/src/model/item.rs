//! Flattened configuration items
//!
//! A `FlatItem` is one group, value or policy lifted out of the tree and
//! addressed by its full path. Equality deliberately ignores `version`:
//! re-submitting identical content at a new sequence is not a modification.

use serde::Serialize;
use std::collections::BTreeSet;

use super::tree::PolicyDefinition;

/// Separator between path segments; a leading one marks an absolute policy reference
pub const PATH_SEPARATOR: &str = "/";

/// Which kind of tree element an item was flattened from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ItemKind {
    Group,
    Value,
    Policy,
}

impl ItemKind {
    /// Key prefix used when building the flat map key
    pub fn key_prefix(&self) -> &'static str {
        match self {
            ItemKind::Group => "[Groups]",
            ItemKind::Value => "[Values]",
            ItemKind::Policy => "[Policies]",
        }
    }
}

/// Build the flat map key for an item of `kind` at `path`
///
/// ```
/// use cfgtx_core::model::{item::item_key, ItemKind};
///
/// let path = vec!["Channel".to_string(), "Orderer".to_string()];
/// assert_eq!(item_key(ItemKind::Group, &path), "[Groups] /Channel/Orderer");
/// ```
pub fn item_key(kind: ItemKind, path: &[String]) -> String {
    format!(
        "{} {}{}",
        kind.key_prefix(),
        PATH_SEPARATOR,
        path.join(PATH_SEPARATOR)
    )
}

/// Names of a group's direct children
///
/// A group's own content is its membership, not its children's content:
/// changing a child value leaves the group unmodified, adding or removing a
/// child modifies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupMembership {
    pub groups: BTreeSet<String>,
    pub values: BTreeSet<String>,
    pub policies: BTreeSet<String>,
}

/// Opaque content of a flattened item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ItemContent {
    Group(GroupMembership),
    Value(#[serde(with = "crate::codec::base64_bytes")] Vec<u8>),
    Policy(Option<PolicyDefinition>),
}

/// Reference to the policy that governs changes to an item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PolicyReference {
    /// Resolved directly against the root policy manager (sentinel stripped)
    Absolute(String),
    /// Resolved against the manager of the item's parent group
    Relative(String),
}

impl PolicyReference {
    /// Parse a raw `mod_policy` string
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(PATH_SEPARATOR) {
            Some(path) => PolicyReference::Absolute(path.to_string()),
            None => PolicyReference::Relative(raw.to_string()),
        }
    }
}

/// A single addressable configuration node after flattening
#[derive(Debug, Clone, Serialize)]
pub struct FlatItem {
    pub kind: ItemKind,
    /// Root group name first, the item's own name last
    pub path: Vec<String>,
    pub version: u64,
    pub mod_policy: String,
    pub content: ItemContent,
}

impl FlatItem {
    /// Map key for this item, e.g. `[Values] /Channel/Orderer/BatchSize`
    pub fn key(&self) -> String {
        item_key(self.kind, &self.path)
    }

    /// Path of the group that contains this item (empty for the root group)
    pub fn parent_path(&self) -> &[String] {
        match self.path.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }

    pub fn policy_reference(&self) -> PolicyReference {
        PolicyReference::parse(&self.mod_policy)
    }
}

impl PartialEq for FlatItem {
    fn eq(&self, other: &Self) -> bool {
        // version is excluded on purpose
        self.kind == other.kind
            && self.path == other.path
            && self.mod_policy == other.mod_policy
            && self.content == other.content
    }
}

impl Eq for FlatItem {}
