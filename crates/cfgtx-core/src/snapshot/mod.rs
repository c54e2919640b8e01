//! Materialized configuration snapshots
//!
//! A `ConfigSnapshot` is the full flattened configuration at one sequence.
//! Snapshots are never edited after they are handed out; an accepted update
//! produces a new one via `merge::compute_update_result`.

pub mod digest;

pub use digest::compute_snapshot_digest;

use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::model::FlatItem;

/// Mapping of flat key to item, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigSnapshot {
    items: BTreeMap<String, FlatItem>,
}

impl ConfigSnapshot {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlatItem> {
        self.items.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Insert or overwrite an item, returning the previous one
    pub fn insert(&mut self, key: String, item: FlatItem) -> Option<FlatItem> {
        self.items.insert(key, item)
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, FlatItem> {
        self.items.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FlatItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hex SHA-256 of the canonical encoding; see [`compute_snapshot_digest`]
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the snapshot cannot be encoded.
    pub fn digest(&self) -> crate::errors::Result<String> {
        compute_snapshot_digest(self)
    }
}

impl FromIterator<(String, FlatItem)> for ConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, FlatItem)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<FlatItem> for ConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = FlatItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(|item| (item.key(), item)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConfigSnapshot {
    type Item = (&'a String, &'a FlatItem);
    type IntoIter = btree_map::Iter<'a, String, FlatItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
