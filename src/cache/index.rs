//! Secondary index of page keys by partition value.
//!
//! Records which composite keys were cached for each locale so that a write can
//! find and evict exactly those entries. The index never serves reads.

use std::collections::HashSet;

use dashmap::DashMap;

use super::keys::PageKey;

/// Tracks partition value → page keys cached under it.
///
/// Entries are only removed by [`SecondaryIndex::untrack`]. A partition that is
/// tracked but never invalidated keeps its keys until the next invalidation.
#[derive(Debug, Default)]
pub struct SecondaryIndex {
    partitions: DashMap<String, HashSet<PageKey>>,
}

impl SecondaryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key to the partition's set, creating the set if absent.
    pub fn track(&self, partition: &str, key: PageKey) {
        self.partitions
            .entry(partition.to_string())
            .or_default()
            .insert(key);
    }

    /// Returns the tracked keys, or an empty set.
    pub fn keys_for(&self, partition: &str) -> HashSet<PageKey> {
        self.partitions
            .get(partition)
            .map(|keys| keys.value().clone())
            .unwrap_or_default()
    }

    /// Removes the partition and returns every key that was tracked under it.
    pub fn untrack(&self, partition: &str) -> HashSet<PageKey> {
        self.partitions
            .remove(partition)
            .map(|(_, keys)| keys)
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        self.partitions.clear();
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn key_count(&self) -> usize {
        self.partitions.iter().map(|entry| entry.value().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pagination::PageRequest;

    fn key(locale: &str, page: u32) -> PageKey {
        PageKey::for_locale(locale, &PageRequest::from_params(page, 10, "updatedAt", "desc"))
    }

    #[test]
    fn track_and_lookup() {
        let index = SecondaryIndex::new();
        index.track("en", key("en", 0));
        index.track("en", key("en", 1));
        index.track("en", key("en", 1));
        index.track("fr", key("fr", 0));

        let keys = index.keys_for("en");
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&key("en", 0)));
        assert_eq!(index.partition_count(), 2);
        assert_eq!(index.key_count(), 3);
    }

    #[test]
    fn unknown_partition_is_empty() {
        let index = SecondaryIndex::new();
        assert!(index.keys_for("de").is_empty());
        assert!(index.untrack("de").is_empty());
    }

    #[test]
    fn untrack_returns_and_drops_partition() {
        let index = SecondaryIndex::new();
        index.track("en", key("en", 0));
        index.track("fr", key("fr", 0));

        let removed = index.untrack("en");
        assert_eq!(removed.len(), 1);
        assert!(index.keys_for("en").is_empty());
        assert_eq!(index.keys_for("fr").len(), 1);
    }

    #[test]
    fn clear_removes_all_partitions() {
        let index = SecondaryIndex::new();
        index.track("en", key("en", 0));
        index.clear();
        assert_eq!(index.partition_count(), 0);
        assert_eq!(index.key_count(), 0);
    }
}
