use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Deduplicating, unordered collection of items keyed by guid.
/// Serializes as a JSON object keyed by guid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemSet {
    items: HashMap<String, Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut set = Self::new();
        for item in items {
            set.add(item);
        }
        set
    }

    /// Inserts unless the guid is already present; the first-seen copy
    /// wins and is never overwritten.
    pub fn add(&mut self, item: Item) {
        self.items.entry(item.guid.clone()).or_insert(item);
    }

    /// Deletes by guid; no-op if absent.
    pub fn remove(&mut self, item: &Item) {
        self.items.remove(&item.guid);
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains_key(&item.guid)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Every item present in either operand. Guid is the sole identity,
    /// so on collision either copy is acceptable; the receiver's wins.
    pub fn union(&self, other: &ItemSet) -> ItemSet {
        let mut out = self.clone();
        for item in other.iter() {
            out.add(item.clone());
        }
        out
    }

    /// Items whose guid appears in both operands, values taken from the
    /// receiver.
    pub fn intersection(&self, other: &ItemSet) -> ItemSet {
        ItemSet::from_items(self.iter().filter(|item| other.contains(item)).cloned())
    }

    /// Items in the receiver whose guid is absent from `other`.
    pub fn without(&self, other: &ItemSet) -> ItemSet {
        ItemSet::from_items(self.iter().filter(|item| !other.contains(item)).cloned())
    }

    /// Item with the minimum publish time, or None on an empty set.
    /// Equal timestamps break on guid lexical order.
    pub fn earliest(&self) -> Option<&Item> {
        self.items
            .values()
            .min_by(|a, b| a.published_at.cmp(&b.published_at).then_with(|| a.guid.cmp(&b.guid)))
    }

    /// Item with the maximum publish time, or None on an empty set.
    /// Equal timestamps break on guid lexical order.
    pub fn latest(&self) -> Option<&Item> {
        self.items
            .values()
            .max_by(|a, b| a.published_at.cmp(&b.published_at).then_with(|| a.guid.cmp(&b.guid)))
    }
}

#[cfg(test)]
#[path = "itemset_tests.rs"]
mod tests;
