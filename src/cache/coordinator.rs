//! Cache coordination for translations.
//!
//! The read side looks entries up and remembers store results. The write side
//! decides which entries a create, update or delete makes stale and drops them.
//! Region names never appear outside this module and [`super::keys`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::application::pagination::{Page, PageRequest};
use crate::domain::entities::{TranslationFootprint, TranslationId, TranslationRecord};

use super::config::CacheConfig;
use super::index::SecondaryIndex;
use super::keys::{CacheKey, PageKey, Region};
use super::store::{CachedValue, RegionStore};

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub entries: BTreeMap<Region, usize>,
    pub tracked_partitions: usize,
    pub tracked_keys: usize,
}

impl CacheStats {
    pub fn entries_in(&self, region: Region) -> usize {
        self.entries.get(&region).copied().unwrap_or(0)
    }

    pub fn total_entries(&self) -> usize {
        self.entries.values().sum()
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (region, count) in &self.entries {
            writeln!(f, "{region:<18} {count}")?;
        }
        write!(
            f,
            "tracked partitions {}, tracked keys {}",
            self.tracked_partitions, self.tracked_keys
        )
    }
}

/// Owns the regions and the locale index and keeps them coherent with writes.
pub struct CacheCoordinator {
    config: CacheConfig,
    store: RegionStore,
    locale_index: SecondaryIndex,
}

impl CacheCoordinator {
    pub fn new(config: CacheConfig, store: RegionStore) -> Self {
        Self {
            config,
            store,
            locale_index: SecondaryIndex::new(),
        }
    }

    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(config, RegionStore::in_memory())
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn locale_index(&self) -> &SecondaryIndex {
        &self.locale_index
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn cached_translation(&self, id: TranslationId) -> Option<TranslationRecord> {
        if !self.is_enabled() {
            return None;
        }
        self.store
            .get_as(Region::ById, &CacheKey::Id(id), |value| match value {
                CachedValue::Translation(record) => Ok(record),
                other => Err(other),
            })
    }

    pub fn remember_translation(&self, record: &TranslationRecord) {
        if !self.is_enabled() {
            return;
        }
        self.store.put(
            Region::ById,
            CacheKey::Id(record.id),
            CachedValue::Translation(record.clone()),
        );
    }

    /// An empty cached listing counts as absent.
    pub fn cached_locale_page(
        &self,
        locale: &str,
        request: &PageRequest,
    ) -> Option<Vec<TranslationRecord>> {
        if !self.is_enabled() {
            return None;
        }
        let key = CacheKey::from(PageKey::for_locale(locale, request));
        self.store
            .get_as(Region::LocalePage, &key, |value| match value {
                CachedValue::TranslationList(items) => Ok(items),
                other => Err(other),
            })
            .filter(|items| !items.is_empty())
    }

    /// Caches a non-empty listing and tracks its key under the locale.
    pub fn remember_locale_page(
        &self,
        locale: &str,
        request: &PageRequest,
        items: &[TranslationRecord],
    ) {
        if !self.is_enabled() || items.is_empty() {
            return;
        }
        let key = PageKey::for_locale(locale, request);
        self.store.put(
            Region::LocalePage,
            CacheKey::Page(key.clone()),
            CachedValue::TranslationList(items.to_vec()),
        );
        // Track after the put so every cached key is always reachable from the index.
        self.locale_index.track(locale, key);
    }

    /// Reads a page from one of the wholesale-cleared search regions.
    pub fn cached_search_page(
        &self,
        region: Region,
        key: &PageKey,
    ) -> Option<Page<TranslationRecord>> {
        if !self.is_enabled() {
            return None;
        }
        self.store
            .get_as(region, &CacheKey::Page(key.clone()), |value| match value {
                CachedValue::TranslationPage(page) => Ok(page),
                other => Err(other),
            })
            .filter(|page| !page.is_empty())
    }

    pub fn remember_search_page(
        &self,
        region: Region,
        key: PageKey,
        page: &Page<TranslationRecord>,
    ) {
        if !self.is_enabled() || page.is_empty() {
            return;
        }
        self.store.put(
            region,
            CacheKey::Page(key),
            CachedValue::TranslationPage(page.clone()),
        );
    }

    pub fn cached_locales(&self) -> Option<Vec<String>> {
        if !self.is_enabled() {
            return None;
        }
        self.store
            .get_as(Region::DistinctLocales, &CacheKey::AllLocales, |value| {
                match value {
                    CachedValue::Locales(locales) => Ok(locales),
                    other => Err(other),
                }
            })
            .filter(|locales| !locales.is_empty())
    }

    pub fn remember_locales(&self, locales: &[String]) {
        if !self.is_enabled() || locales.is_empty() {
            return;
        }
        self.store.put(
            Region::DistinctLocales,
            CacheKey::AllLocales,
            CachedValue::Locales(locales.to_vec()),
        );
    }

    // ========================================================================
    // Write side
    // ========================================================================

    /// A new row can land on any page of any listing that matches it.
    pub fn on_created(&self, record: &TranslationRecord) {
        if !self.is_enabled() {
            return;
        }
        self.remember_translation(record);
        self.clear_search_regions();
        self.store.clear(Region::DistinctLocales);
        self.invalidate_locale(&record.locale);
        if record.has_tags() {
            self.store.clear(Region::TagPage);
        }
        debug!(id = record.id, locale = %record.locale, "cache updated after create");
    }

    /// `previous` is the state before the write, when it could be recovered.
    pub fn on_updated(&self, record: &TranslationRecord, previous: Option<&TranslationFootprint>) {
        if !self.is_enabled() {
            return;
        }
        self.remember_translation(record);

        let moved_from = previous.filter(|old| old.locale != record.locale);
        let locale_changed = moved_from.is_some();
        if let Some(old) = moved_from {
            self.invalidate_locale(&old.locale);
        }
        self.invalidate_locale(&record.locale);

        // An unknown previous locale may have been the last of its kind.
        if locale_changed || previous.is_none() {
            self.store.clear(Region::DistinctLocales);
        }
        if record.has_tags() || previous.is_some_and(|old| !old.tags.is_empty()) {
            self.store.clear(Region::TagPage);
        }
        self.clear_search_regions();
        debug!(
            id = record.id,
            locale = %record.locale,
            previous_known = previous.is_some(),
            locale_changed,
            "cache updated after update"
        );
    }

    /// Without `previous` only the by-id entry and the unpartitioned regions can be purged.
    pub fn on_deleted(&self, id: TranslationId, previous: Option<&TranslationFootprint>) {
        if !self.is_enabled() {
            return;
        }
        self.store.evict(Region::ById, &CacheKey::Id(id));
        if let Some(old) = previous {
            self.invalidate_locale(&old.locale);
            if !old.tags.is_empty() {
                self.store.clear(Region::TagPage);
            }
        }
        self.clear_search_regions();
        self.store.clear(Region::DistinctLocales);
        debug!(id, previous_known = previous.is_some(), "cache updated after delete");
    }

    /// Evicts every tracked page of a locale and drops the partition from the index.
    pub fn invalidate_locale(&self, locale: &str) {
        let keys = self.locale_index.untrack(locale);
        if keys.is_empty() {
            return;
        }
        let evicted = keys.len();
        for key in keys {
            self.store.evict(Region::LocalePage, &CacheKey::Page(key));
        }
        debug!(locale, evicted, "locale pages invalidated");
    }

    fn clear_search_regions(&self) {
        self.store.clear(Region::KeySearch);
        self.store.clear(Region::ContentSearch);
    }

    /// Administrative reset of every region and the index.
    pub fn clear_all(&self) {
        self.store.clear_all();
        self.locale_index.clear();
        info!("all translation caches cleared");
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: Region::ALL
                .into_iter()
                .map(|region| (region, self.store.len(region)))
                .collect(),
            tracked_partitions: self.locale_index.partition_count(),
            tracked_keys: self.locale_index.key_count(),
        }
    }

    pub fn log_statistics(&self) {
        let stats = self.stats();
        for (region, entries) in &stats.entries {
            info!(%region, entries, "cache region statistics");
        }
        info!(
            tracked_partitions = stats.tracked_partitions,
            tracked_keys = stats.tracked_keys,
            enabled = self.is_enabled(),
            "locale index statistics"
        );
    }
}
