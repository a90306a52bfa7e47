//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::{Page, PageRequest};
use crate::domain::entities::{TranslationDraft, TranslationId, TranslationRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Optional criteria for the combined search; absent fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationFilter {
    pub key: Option<String>,
    pub locale: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
}

/// Persistent store holding translations.
///
/// Pattern matching, pagination and sorting semantics belong to the adapter.
#[async_trait]
pub trait TranslationsRepo: Send + Sync {
    async fn insert(&self, draft: TranslationDraft) -> Result<TranslationRecord, RepoError>;

    /// Replaces every mutable field; `None` when the id does not exist.
    async fn replace(
        &self,
        id: TranslationId,
        draft: TranslationDraft,
    ) -> Result<Option<TranslationRecord>, RepoError>;

    async fn find_by_id(&self, id: TranslationId) -> Result<Option<TranslationRecord>, RepoError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: TranslationId) -> Result<bool, RepoError>;

    async fn list_by_locale(
        &self,
        locale: &str,
        request: &PageRequest,
    ) -> Result<Vec<TranslationRecord>, RepoError>;

    /// Records carrying at least one of `tags`.
    async fn find_by_tags(
        &self,
        tags: &[String],
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError>;

    /// Case-sensitive substring match on the translation key.
    async fn find_by_key(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError>;

    /// Case-insensitive substring match on the content.
    async fn find_by_content(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError>;

    async fn search(
        &self,
        filter: &TranslationFilter,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError>;

    /// Distinct locales in ascending order.
    async fn distinct_locales(&self) -> Result<Vec<String>, RepoError>;
}
