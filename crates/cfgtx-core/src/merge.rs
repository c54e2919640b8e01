//! Result merging
//!
//! Overlays a validated delta onto the current snapshot. Keys absent from the
//! delta are carried over unchanged; the implicit-deletion check has already
//! run by the time this is called, so nothing is re-verified here.

use crate::snapshot::ConfigSnapshot;

/// Produce the next full snapshot from `old` and `delta`
///
/// ```
/// use cfgtx_core::flatten::flatten;
/// use cfgtx_core::merge::compute_update_result;
/// use cfgtx_core::model::{ConfigGroup, ConfigValue};
///
/// let old = flatten("Channel", &ConfigGroup::new(0, "Admins")
///     .with_value("A", ConfigValue::new(0, b"a".to_vec(), ""))).unwrap();
/// let delta = flatten("Channel", &ConfigGroup::new(0, "Admins")
///     .with_value("A", ConfigValue::new(1, b"b".to_vec(), ""))).unwrap();
///
/// let merged = compute_update_result(&old, &delta);
/// assert_eq!(merged.get("[Values] /Channel/A").unwrap().version, 1);
/// ```
pub fn compute_update_result(old: &ConfigSnapshot, delta: &ConfigSnapshot) -> ConfigSnapshot {
    let mut next = old.clone();
    for (key, value) in delta {
        next.insert(key.clone(), value.clone());
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlatItem, ItemContent, ItemKind};

    fn item(name: &str, version: u64) -> FlatItem {
        FlatItem {
            kind: ItemKind::Value,
            path: vec!["Channel".to_string(), name.to_string()],
            version,
            mod_policy: "Admins".to_string(),
            content: ItemContent::Value(name.as_bytes().to_vec()),
        }
    }

    #[test]
    fn test_untouched_keys_are_retained() {
        let old: ConfigSnapshot = vec![item("A", 1), item("B", 1)].into_iter().collect();
        let delta: ConfigSnapshot = vec![item("A", 2)].into_iter().collect();

        let merged = compute_update_result(&old, &delta);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("[Values] /Channel/A").unwrap().version, 2);
        assert_eq!(merged.get("[Values] /Channel/B").unwrap().version, 1);
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let old: ConfigSnapshot = vec![item("A", 1)].into_iter().collect();
        let delta: ConfigSnapshot = vec![item("C", 2)].into_iter().collect();

        let merged = compute_update_result(&old, &delta);

        assert_eq!(old.len(), 1);
        assert_eq!(delta.len(), 1);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_disjoint_merges_commute() {
        let base: ConfigSnapshot = vec![item("A", 1)].into_iter().collect();
        let d1: ConfigSnapshot = vec![item("B", 2)].into_iter().collect();
        let d2: ConfigSnapshot = vec![item("C", 2)].into_iter().collect();

        let left = compute_update_result(&compute_update_result(&base, &d1), &d2);
        let right = compute_update_result(&compute_update_result(&base, &d2), &d1);
        assert_eq!(left, right);
    }
}
