//! Cache region storage.
//!
//! [`RegionBackend`] is the pluggable map layer and may fail. [`RegionStore`] sits
//! in front of it and turns every failure into a miss or a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use metrics::counter;
use tracing::{debug, warn};

use crate::application::pagination::Page;
use crate::domain::entities::TranslationRecord;

use super::error::CacheError;
use super::keys::{CacheKey, Region};
use super::metric_names;

/// A value held in one of the regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Translation(TranslationRecord),
    TranslationList(Vec<TranslationRecord>),
    TranslationPage(Page<TranslationRecord>),
    Locales(Vec<String>),
}

impl CachedValue {
    fn kind(&self) -> &'static str {
        match self {
            CachedValue::Translation(_) => "translation",
            CachedValue::TranslationList(_) => "translation list",
            CachedValue::TranslationPage(_) => "translation page",
            CachedValue::Locales(_) => "locales",
        }
    }
}

/// Backing maps for the cache regions.
///
/// Implementations must be safe under concurrent calls from independent tasks.
pub trait RegionBackend: Send + Sync {
    fn get(&self, region: Region, key: &CacheKey) -> Result<Option<CachedValue>, CacheError>;

    /// Overwrites any previous value.
    fn put(&self, region: Region, key: CacheKey, value: CachedValue) -> Result<(), CacheError>;

    /// Returns whether an entry was removed.
    fn evict(&self, region: Region, key: &CacheKey) -> Result<bool, CacheError>;

    /// Returns the number of entries removed.
    fn clear(&self, region: Region) -> Result<usize, CacheError>;

    fn len(&self, region: Region) -> Result<usize, CacheError>;
}

/// Process-local backend with one concurrent map per region.
///
/// The set of regions is fixed at construction. Operations on a region that was
/// not configured behave as misses and no-ops.
pub struct InMemoryRegions {
    regions: HashMap<Region, DashMap<CacheKey, CachedValue>>,
}

impl InMemoryRegions {
    pub fn new() -> Self {
        Self::with_regions(Region::ALL)
    }

    pub fn with_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|region| (region, DashMap::new()))
                .collect(),
        }
    }
}

impl Default for InMemoryRegions {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionBackend for InMemoryRegions {
    fn get(&self, region: Region, key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
        Ok(self
            .regions
            .get(&region)
            .and_then(|map| map.get(key).map(|entry| entry.value().clone())))
    }

    fn put(&self, region: Region, key: CacheKey, value: CachedValue) -> Result<(), CacheError> {
        if let Some(map) = self.regions.get(&region) {
            map.insert(key, value);
        }
        Ok(())
    }

    fn evict(&self, region: Region, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self
            .regions
            .get(&region)
            .is_some_and(|map| map.remove(key).is_some()))
    }

    fn clear(&self, region: Region) -> Result<usize, CacheError> {
        let Some(map) = self.regions.get(&region) else {
            return Ok(0);
        };
        let removed = map.len();
        map.clear();
        Ok(removed)
    }

    fn len(&self, region: Region) -> Result<usize, CacheError> {
        Ok(self.regions.get(&region).map_or(0, DashMap::len))
    }
}

/// Error-absorbing front of a [`RegionBackend`].
///
/// Failures are logged at `warn`, counted, and reported to the caller as a miss or
/// a no-op. Nothing here returns an error.
#[derive(Clone)]
pub struct RegionStore {
    backend: Arc<dyn RegionBackend>,
}

impl RegionStore {
    pub fn new(backend: Arc<dyn RegionBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRegions::new()))
    }

    pub fn get(&self, region: Region, key: &CacheKey) -> Option<CachedValue> {
        match self.backend.get(region, key) {
            Ok(Some(value)) => {
                counter!(metric_names::HIT, "region" => region.as_str()).increment(1);
                debug!(%region, %key, "cache hit");
                Some(value)
            }
            Ok(None) => {
                counter!(metric_names::MISS, "region" => region.as_str()).increment(1);
                debug!(%region, %key, "cache miss");
                None
            }
            Err(err) => {
                report(region, "get", &err);
                None
            }
        }
    }

    /// Reads an entry and narrows it to the expected variant.
    ///
    /// An entry of the wrong shape is reported as corrupted, evicted, and treated
    /// as a miss.
    pub fn get_as<T>(
        &self,
        region: Region,
        key: &CacheKey,
        narrow: impl FnOnce(CachedValue) -> Result<T, CachedValue>,
    ) -> Option<T> {
        let value = self.get(region, key)?;
        match narrow(value) {
            Ok(narrowed) => Some(narrowed),
            Err(other) => {
                let err = CacheError::corrupted(
                    region,
                    format!("unexpected {} under key `{key}`", other.kind()),
                );
                report(region, "get", &err);
                self.evict(region, key);
                None
            }
        }
    }

    pub fn put(&self, region: Region, key: CacheKey, value: CachedValue) {
        if let Err(err) = self.backend.put(region, key, value) {
            report(region, "put", &err);
        }
    }

    pub fn evict(&self, region: Region, key: &CacheKey) {
        match self.backend.evict(region, key) {
            Ok(true) => {
                counter!(metric_names::EVICT, "region" => region.as_str()).increment(1);
                debug!(%region, %key, "cache entry evicted");
            }
            Ok(false) => {}
            Err(err) => report(region, "evict", &err),
        }
    }

    pub fn clear(&self, region: Region) {
        match self.backend.clear(region) {
            Ok(removed) => {
                counter!(metric_names::CLEAR, "region" => region.as_str()).increment(1);
                debug!(%region, removed, "cache region cleared");
            }
            Err(err) => report(region, "clear", &err),
        }
    }

    /// Clears every region. A failing region does not stop the others.
    pub fn clear_all(&self) {
        for region in Region::ALL {
            self.clear(region);
        }
    }

    /// Entry count of a region, zero when the backend cannot tell.
    pub fn len(&self, region: Region) -> usize {
        self.backend.len(region).unwrap_or_else(|err| {
            report(region, "len", &err);
            0
        })
    }
}

fn report(region: Region, op: &'static str, err: &CacheError) {
    counter!(metric_names::ERROR, "region" => region.as_str(), "op" => op).increment(1);
    warn!(%region, op, error = %err, "cache operation failed; continuing without cache");
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::entities::TranslationDraft;

    fn record(id: i64, locale: &str) -> TranslationRecord {
        let draft = TranslationDraft::new("app.title", locale, "Hello");
        let now = OffsetDateTime::UNIX_EPOCH;
        TranslationRecord {
            id,
            key: draft.key,
            locale: draft.locale,
            content: draft.content,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }

    struct FailingBackend;

    impl RegionBackend for FailingBackend {
        fn get(&self, region: Region, _: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
            Err(CacheError::unavailable(region, "offline"))
        }

        fn put(&self, region: Region, _: CacheKey, _: CachedValue) -> Result<(), CacheError> {
            Err(CacheError::unavailable(region, "offline"))
        }

        fn evict(&self, region: Region, _: &CacheKey) -> Result<bool, CacheError> {
            Err(CacheError::unavailable(region, "offline"))
        }

        fn clear(&self, region: Region) -> Result<usize, CacheError> {
            Err(CacheError::unavailable(region, "offline"))
        }

        fn len(&self, region: Region) -> Result<usize, CacheError> {
            Err(CacheError::unavailable(region, "offline"))
        }
    }

    #[test]
    fn put_get_evict_roundtrip() {
        let store = RegionStore::in_memory();
        let key = CacheKey::Id(1);

        assert!(store.get(Region::ById, &key).is_none());
        store.put(Region::ById, key.clone(), CachedValue::Translation(record(1, "en")));
        assert_eq!(
            store.get(Region::ById, &key),
            Some(CachedValue::Translation(record(1, "en")))
        );

        store.evict(Region::ById, &key);
        store.evict(Region::ById, &key);
        assert!(store.get(Region::ById, &key).is_none());
    }

    #[test]
    fn put_overwrites() {
        let store = RegionStore::in_memory();
        let key = CacheKey::Id(1);
        store.put(Region::ById, key.clone(), CachedValue::Translation(record(1, "en")));
        store.put(Region::ById, key.clone(), CachedValue::Translation(record(1, "fr")));
        assert_eq!(
            store.get(Region::ById, &key),
            Some(CachedValue::Translation(record(1, "fr")))
        );
        assert_eq!(store.len(Region::ById), 1);
    }

    #[test]
    fn clear_only_touches_one_region() {
        let store = RegionStore::in_memory();
        store.put(Region::ById, CacheKey::Id(1), CachedValue::Translation(record(1, "en")));
        store.put(
            Region::DistinctLocales,
            CacheKey::AllLocales,
            CachedValue::Locales(vec!["en".to_string()]),
        );

        store.clear(Region::DistinctLocales);

        assert_eq!(store.len(Region::DistinctLocales), 0);
        assert_eq!(store.len(Region::ById), 1);
    }

    #[test]
    fn unconfigured_region_is_a_miss() {
        let store = RegionStore::new(Arc::new(InMemoryRegions::with_regions([Region::ById])));
        store.put(
            Region::DistinctLocales,
            CacheKey::AllLocales,
            CachedValue::Locales(vec!["en".to_string()]),
        );
        assert!(store.get(Region::DistinctLocales, &CacheKey::AllLocales).is_none());
        assert_eq!(store.len(Region::DistinctLocales), 0);
        store.clear(Region::DistinctLocales);
    }

    #[test]
    fn backend_failures_degrade_to_miss() {
        let store = RegionStore::new(Arc::new(FailingBackend));
        let key = CacheKey::Id(1);

        store.put(Region::ById, key.clone(), CachedValue::Translation(record(1, "en")));
        assert!(store.get(Region::ById, &key).is_none());
        store.evict(Region::ById, &key);
        store.clear_all();
        assert_eq!(store.len(Region::ById), 0);
    }

    #[test]
    fn wrong_variant_is_evicted_as_corrupted() {
        let store = RegionStore::in_memory();
        let key = CacheKey::Id(3);
        store.put(Region::ById, key.clone(), CachedValue::Locales(vec![]));

        let narrowed = store.get_as(Region::ById, &key, |value| match value {
            CachedValue::Translation(record) => Ok(record),
            other => Err(other),
        });

        assert!(narrowed.is_none());
        assert_eq!(store.len(Region::ById), 0);
    }
}
