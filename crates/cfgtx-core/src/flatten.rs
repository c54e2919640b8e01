//! Tree flattening
//!
//! Turns a hierarchical `ConfigGroup` into a `ConfigSnapshot` keyed by
//! `[Kind] /path`. An empty `mod_policy` inherits the effective policy of the
//! nearest enclosing group.

use std::collections::BTreeSet;

use crate::errors::{ConfigTxError, Result};
use crate::model::{ConfigGroup, FlatItem, GroupMembership, ItemContent, ItemKind};
use crate::snapshot::ConfigSnapshot;

/// Longest legal element name
pub const MAX_NAME_LEN: usize = 249;

/// Check that a tree element name is usable as a path segment
///
/// # Errors
///
/// Returns `ConfigTxError::InvalidName` for empty, overlong, or names
/// containing characters outside `[A-Za-z0-9._-]`.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.len() > MAX_NAME_LEN {
        "name exceeds 249 characters"
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        "name contains characters other than [A-Za-z0-9._-]"
    } else {
        return Ok(());
    };

    Err(ConfigTxError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Flatten `root` (named `root_name`) into a snapshot
///
/// # Errors
///
/// - `InvalidName` if any element name is not legal
/// - `DuplicateKey` if two elements flatten to the same key
pub fn flatten(root_name: &str, root: &ConfigGroup) -> Result<ConfigSnapshot> {
    validate_name(root_name)?;
    let mut out = ConfigSnapshot::new();
    let mut path = vec![root_name.to_string()];
    flatten_group(&mut out, &mut path, root, "")?;
    Ok(out)
}

fn effective_policy(own: &str, inherited: &str) -> String {
    if own.is_empty() {
        inherited.to_string()
    } else {
        own.to_string()
    }
}

fn insert(out: &mut ConfigSnapshot, item: FlatItem) -> Result<()> {
    let key = item.key();
    if out.contains_key(&key) {
        return Err(ConfigTxError::DuplicateKey { key });
    }
    out.insert(key, item);
    Ok(())
}

fn child_path(path: &[String], name: &str) -> Result<Vec<String>> {
    validate_name(name)?;
    let mut child = path.to_vec();
    child.push(name.to_string());
    Ok(child)
}

fn flatten_group(
    out: &mut ConfigSnapshot,
    path: &mut Vec<String>,
    group: &ConfigGroup,
    inherited_policy: &str,
) -> Result<()> {
    let group_policy = effective_policy(&group.mod_policy, inherited_policy);

    let membership = GroupMembership {
        groups: group.groups.keys().cloned().collect::<BTreeSet<_>>(),
        values: group.values.keys().cloned().collect::<BTreeSet<_>>(),
        policies: group.policies.keys().cloned().collect::<BTreeSet<_>>(),
    };
    insert(
        out,
        FlatItem {
            kind: ItemKind::Group,
            path: path.clone(),
            version: group.version,
            mod_policy: group_policy.clone(),
            content: ItemContent::Group(membership),
        },
    )?;

    for (name, value) in &group.values {
        insert(
            out,
            FlatItem {
                kind: ItemKind::Value,
                path: child_path(path, name)?,
                version: value.version,
                mod_policy: effective_policy(&value.mod_policy, &group_policy),
                content: ItemContent::Value(value.value.clone()),
            },
        )?;
    }

    for (name, policy) in &group.policies {
        insert(
            out,
            FlatItem {
                kind: ItemKind::Policy,
                path: child_path(path, name)?,
                version: policy.version,
                mod_policy: effective_policy(&policy.mod_policy, &group_policy),
                content: ItemContent::Policy(policy.policy.clone()),
            },
        )?;
    }

    for (name, child) in &group.groups {
        validate_name(name)?;
        path.push(name.clone());
        let result = flatten_group(out, path, child, &group_policy);
        path.pop();
        result?;
    }

    Ok(())
}
