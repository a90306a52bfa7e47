//! Read-through, write-invalidate wrapper around a [`TranslationService`].
//!
//! Every call returns exactly what the wrapped service returns. Domain errors pass
//! through untouched and never populate or invalidate anything.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::application::error::AppError;
use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::TranslationFilter;
use crate::application::translations::TranslationService;
use crate::domain::entities::{
    TranslationDraft, TranslationFootprint, TranslationId, TranslationRecord,
};

use super::coordinator::CacheCoordinator;
use super::keys::{PageKey, Region};

/// Caching decorator for any [`TranslationService`].
#[derive(Clone)]
pub struct CachedTranslationService {
    inner: Arc<dyn TranslationService>,
    cache: Arc<CacheCoordinator>,
}

impl CachedTranslationService {
    pub fn new(inner: Arc<dyn TranslationService>, cache: Arc<CacheCoordinator>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<CacheCoordinator> {
        &self.cache
    }

    /// Locale and tags of the entity before a write.
    ///
    /// Served from the by-id region when possible. On a miss the store is asked
    /// directly if cold-state recovery is on; that read is never cached.
    async fn previous_footprint(&self, id: TranslationId) -> Option<TranslationFootprint> {
        if let Some(cached) = self.cache.cached_translation(id) {
            return Some(TranslationFootprint::from(&cached));
        }
        if !self.cache.config().recover_cold_state {
            debug!(id, "previous state not cached; old partitions will not be invalidated");
            return None;
        }
        match self.inner.get_by_id(id).await {
            Ok(record) => Some(TranslationFootprint::from(&record)),
            Err(err) if err.is_not_found() => None,
            Err(err) => {
                warn!(id, error = %err, "failed to recover previous state; old partitions will not be invalidated");
                None
            }
        }
    }

    async fn search_page<F, Fut>(
        &self,
        region: Region,
        key: PageKey,
        fetch: F,
    ) -> Result<Page<TranslationRecord>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Page<TranslationRecord>, AppError>>,
    {
        if let Some(page) = self.cache.cached_search_page(region, &key) {
            return Ok(page);
        }
        let page = fetch().await?;
        self.cache.remember_search_page(region, key, &page);
        Ok(page)
    }
}

#[async_trait]
impl TranslationService for CachedTranslationService {
    #[instrument(skip(self, draft), fields(key = %draft.key, locale = %draft.locale))]
    async fn create(&self, draft: TranslationDraft) -> Result<TranslationRecord, AppError> {
        let record = self.inner.create(draft).await?;
        self.cache.on_created(&record);
        Ok(record)
    }

    #[instrument(skip(self, draft))]
    async fn update(
        &self,
        id: TranslationId,
        draft: TranslationDraft,
    ) -> Result<TranslationRecord, AppError> {
        if !self.cache.is_enabled() {
            return self.inner.update(id, draft).await;
        }
        let previous = self.previous_footprint(id).await;
        let record = self.inner.update(id, draft).await?;
        self.cache.on_updated(&record, previous.as_ref());
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: TranslationId) -> Result<TranslationRecord, AppError> {
        if let Some(record) = self.cache.cached_translation(id) {
            return Ok(record);
        }
        let record = self.inner.get_by_id(id).await?;
        self.cache.remember_translation(&record);
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn list_by_locale(
        &self,
        locale: &str,
        request: &PageRequest,
    ) -> Result<Vec<TranslationRecord>, AppError> {
        if let Some(items) = self.cache.cached_locale_page(locale, request) {
            return Ok(items);
        }
        let items = self.inner.list_by_locale(locale, request).await?;
        self.cache.remember_locale_page(locale, request, &items);
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn find_by_tags(
        &self,
        tags: &[String],
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        if tags.is_empty() {
            return self.inner.find_by_tags(tags, request).await;
        }
        let key = PageKey::for_tags(tags, request);
        self.search_page(Region::TagPage, key, || {
            self.inner.find_by_tags(tags, request)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_key(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        let key = PageKey::for_key_pattern(pattern, request);
        self.search_page(Region::KeySearch, key, || {
            self.inner.find_by_key(pattern, request)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_content(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        let key = PageKey::for_content_pattern(pattern, request);
        self.search_page(Region::ContentSearch, key, || {
            self.inner.find_by_content(pattern, request)
        })
        .await
    }

    /// Filter combinations are unbounded, so combined searches always go to the store.
    #[instrument(skip(self))]
    async fn search(
        &self,
        filter: &TranslationFilter,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        self.inner.search(filter, request).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TranslationId) -> Result<(), AppError> {
        if !self.cache.is_enabled() {
            return self.inner.delete(id).await;
        }
        let previous = self.previous_footprint(id).await;
        self.inner.delete(id).await?;
        self.cache.on_deleted(id, previous.as_ref());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_distinct_locales(&self) -> Result<Vec<String>, AppError> {
        if let Some(locales) = self.cache.cached_locales() {
            return Ok(locales);
        }
        let locales = self.inner.list_distinct_locales().await?;
        self.cache.remember_locales(&locales);
        Ok(locales)
    }
}
