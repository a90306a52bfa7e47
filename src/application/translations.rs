//! Translation service contract and its store-backed implementation.
//!
//! The service knows nothing about caching; `crate::cache::CachedTranslationService`
//! wraps any implementation of [`TranslationService`] with the same signatures.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::application::error::AppError;
use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{TranslationFilter, TranslationsRepo};
use crate::domain::entities::{TranslationDraft, TranslationId, TranslationRecord};

const ENTITY: &str = "translation";

/// Operations exposed to request handlers.
///
/// Listing operations fail with `NotFound` instead of returning an empty result.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn create(&self, draft: TranslationDraft) -> Result<TranslationRecord, AppError>;

    async fn update(
        &self,
        id: TranslationId,
        draft: TranslationDraft,
    ) -> Result<TranslationRecord, AppError>;

    async fn get_by_id(&self, id: TranslationId) -> Result<TranslationRecord, AppError>;

    async fn list_by_locale(
        &self,
        locale: &str,
        request: &PageRequest,
    ) -> Result<Vec<TranslationRecord>, AppError>;

    async fn find_by_tags(
        &self,
        tags: &[String],
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError>;

    async fn find_by_key(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError>;

    async fn find_by_content(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError>;

    async fn search(
        &self,
        filter: &TranslationFilter,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError>;

    async fn delete(&self, id: TranslationId) -> Result<(), AppError>;

    async fn list_distinct_locales(&self) -> Result<Vec<String>, AppError>;
}

/// Translation service backed directly by a [`TranslationsRepo`].
#[derive(Clone)]
pub struct StoreTranslationService {
    repo: Arc<dyn TranslationsRepo>,
}

impl StoreTranslationService {
    pub fn new(repo: Arc<dyn TranslationsRepo>) -> Self {
        Self { repo }
    }
}

fn ensure_page_size(request: &PageRequest) -> Result<(), AppError> {
    if request.size == 0 {
        return Err(AppError::validation("page size must be greater than zero"));
    }
    Ok(())
}

fn non_empty_page(
    page: Page<TranslationRecord>,
    lookup: impl FnOnce() -> String,
) -> Result<Page<TranslationRecord>, AppError> {
    if page.is_empty() {
        return Err(AppError::not_found(ENTITY, lookup()));
    }
    Ok(page)
}

#[async_trait]
impl TranslationService for StoreTranslationService {
    #[instrument(skip(self, draft), fields(key = %draft.key, locale = %draft.locale))]
    async fn create(&self, draft: TranslationDraft) -> Result<TranslationRecord, AppError> {
        Ok(self.repo.insert(draft).await?)
    }

    #[instrument(skip(self, draft))]
    async fn update(
        &self,
        id: TranslationId,
        draft: TranslationDraft,
    ) -> Result<TranslationRecord, AppError> {
        self.repo
            .replace(id, draft)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, format!("id: {id}")))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: TranslationId) -> Result<TranslationRecord, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY, format!("id: {id}")))
    }

    #[instrument(skip(self))]
    async fn list_by_locale(
        &self,
        locale: &str,
        request: &PageRequest,
    ) -> Result<Vec<TranslationRecord>, AppError> {
        ensure_page_size(request)?;
        let items = self.repo.list_by_locale(locale, request).await?;
        if items.is_empty() {
            return Err(AppError::not_found(ENTITY, format!("locale: {locale}")));
        }
        Ok(items)
    }

    #[instrument(skip(self))]
    async fn find_by_tags(
        &self,
        tags: &[String],
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        if tags.is_empty() {
            return Err(AppError::validation("tags list cannot be empty"));
        }
        ensure_page_size(request)?;
        let page = self.repo.find_by_tags(tags, request).await?;
        non_empty_page(page, || format!("tags: {tags:?}"))
    }

    #[instrument(skip(self))]
    async fn find_by_key(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        if pattern.is_empty() {
            return Err(AppError::validation("translation key cannot be empty"));
        }
        ensure_page_size(request)?;
        let page = self.repo.find_by_key(pattern, request).await?;
        non_empty_page(page, || format!("key pattern: {pattern}"))
    }

    #[instrument(skip(self))]
    async fn find_by_content(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        if pattern.trim().is_empty() {
            return Err(AppError::validation("content cannot be empty"));
        }
        ensure_page_size(request)?;
        let page = self.repo.find_by_content(pattern, request).await?;
        non_empty_page(page, || format!("content pattern: {pattern}"))
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        filter: &TranslationFilter,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, AppError> {
        ensure_page_size(request)?;
        let page = self.repo.search(filter, request).await?;
        non_empty_page(page, || "defined criteria".to_string())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: TranslationId) -> Result<(), AppError> {
        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found(ENTITY, format!("id: {id}")))
        }
    }

    #[instrument(skip(self))]
    async fn list_distinct_locales(&self) -> Result<Vec<String>, AppError> {
        Ok(self.repo.distinct_locales().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryTranslations;

    fn service() -> StoreTranslationService {
        StoreTranslationService::new(Arc::new(InMemoryTranslations::new()))
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let service = service();
        let err = service
            .update(99, TranslationDraft::new("k", "en", "v"))
            .await
            .expect_err("missing id");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "translation not found with id: 99");
    }

    #[tokio::test]
    async fn empty_locale_listing_is_not_found() {
        let service = service();
        let err = service
            .list_by_locale("en", &PageRequest::default())
            .await
            .expect_err("no rows");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn search_terms_are_validated_before_the_store() {
        let service = service();
        let request = PageRequest::default();

        assert!(service.find_by_tags(&[], &request).await.unwrap_err().is_validation());
        assert!(service.find_by_key("", &request).await.unwrap_err().is_validation());
        assert!(service.find_by_content("  ", &request).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let service = service();
        assert!(service.delete(5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected() {
        let service = service();
        service
            .create(TranslationDraft::new("k", "en", "v"))
            .await
            .expect("create");
        let request = PageRequest::from_params(0, 0, "id", "asc");
        let err = service.list_by_locale("en", &request).await.unwrap_err();
        assert!(err.is_validation());
    }
}
