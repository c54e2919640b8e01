//! Sequence resolution for write-sets
//!
//! Changed items are stamped with the new sequence while untouched items
//! keep their older version, so the highest version anywhere in the tree is
//! the sequence the update claims to establish.

use crate::model::ConfigGroup;

/// Compute the sequence a write-set claims to establish
///
/// ```
/// use cfgtx_core::model::{ConfigGroup, ConfigValue};
/// use cfgtx_core::sequence::compute_sequence;
///
/// let tree = ConfigGroup::new(4, "Admins")
///     .with_value("A", ConfigValue::new(5, b"new".to_vec(), "P1"));
/// assert_eq!(compute_sequence(&tree), 5);
/// ```
pub fn compute_sequence(group: &ConfigGroup) -> u64 {
    let values = group.values.values().map(|v| v.version);
    let policies = group.policies.values().map(|p| p.version);
    let groups = group.groups.values().map(compute_sequence);

    values
        .chain(policies)
        .chain(groups)
        .fold(group.version, u64::max)
}
