//! In-memory translation store.
//!
//! Implements the full [`TranslationsRepo`] contract so the cached service can be
//! exercised without a database.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::pagination::{Page, PageRequest};
use crate::application::repos::{RepoError, TranslationFilter, TranslationsRepo};
use crate::domain::entities::{TranslationDraft, TranslationId, TranslationRecord};
use crate::domain::types::SortDirection;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "infra::memory";

#[derive(Debug, Clone, Copy)]
enum SortField {
    Id,
    Key,
    Locale,
    Content,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn parse(value: &str) -> Result<Self, RepoError> {
        match value {
            "id" => Ok(SortField::Id),
            "key" | "translationKey" => Ok(SortField::Key),
            "locale" => Ok(SortField::Locale),
            "content" => Ok(SortField::Content),
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortField::UpdatedAt),
            other => Err(RepoError::invalid_input(format!(
                "unknown sort field `{other}`"
            ))),
        }
    }

    fn compare(self, a: &TranslationRecord, b: &TranslationRecord) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Key => a.key.cmp(&b.key),
            SortField::Locale => a.locale.cmp(&b.locale),
            SortField::Content => a.content.cmp(&b.content),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

/// Translation store held in process memory.
pub struct InMemoryTranslations {
    rows: RwLock<BTreeMap<TranslationId, TranslationRecord>>,
    next_id: AtomicI64,
}

impl InMemoryTranslations {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.rows, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filters, sorts and slices the rows. Ties on the sort field fall back to id order.
    fn select<F>(&self, request: &PageRequest, predicate: F) -> Result<Page<TranslationRecord>, RepoError>
    where
        F: Fn(&TranslationRecord) -> bool,
    {
        let field = SortField::parse(&request.sort_by)?;
        let mut matched: Vec<TranslationRecord> = rw_read(&self.rows, SOURCE, "select")
            .values()
            .filter(|&record| predicate(record))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = field.compare(a, b).then_with(|| a.id.cmp(&b.id));
            match request.sort_dir {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(request.offset())
            .take(request.size as usize)
            .collect();
        Ok(Page::new(items, request, total))
    }
}

impl Default for InMemoryTranslations {
    fn default() -> Self {
        Self::new()
    }
}

fn shares_any_tag(record: &TranslationRecord, tags: &BTreeSet<&str>) -> bool {
    record.tags.iter().any(|tag| tags.contains(tag.as_str()))
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl TranslationsRepo for InMemoryTranslations {
    async fn insert(&self, draft: TranslationDraft) -> Result<TranslationRecord, RepoError> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let now = OffsetDateTime::now_utc();
        let record = TranslationRecord {
            id,
            key: draft.key,
            locale: draft.locale,
            content: draft.content,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        };
        rw_write(&self.rows, SOURCE, "insert").insert(id, record.clone());
        Ok(record)
    }

    async fn replace(
        &self,
        id: TranslationId,
        draft: TranslationDraft,
    ) -> Result<Option<TranslationRecord>, RepoError> {
        let mut rows = rw_write(&self.rows, SOURCE, "replace");
        let Some(existing) = rows.get_mut(&id) else {
            return Ok(None);
        };
        existing.key = draft.key;
        existing.locale = draft.locale;
        existing.content = draft.content;
        existing.tags = draft.tags;
        existing.updated_at = OffsetDateTime::now_utc();
        Ok(Some(existing.clone()))
    }

    async fn find_by_id(&self, id: TranslationId) -> Result<Option<TranslationRecord>, RepoError> {
        Ok(rw_read(&self.rows, SOURCE, "find_by_id").get(&id).cloned())
    }

    async fn delete(&self, id: TranslationId) -> Result<bool, RepoError> {
        Ok(rw_write(&self.rows, SOURCE, "delete").remove(&id).is_some())
    }

    async fn list_by_locale(
        &self,
        locale: &str,
        request: &PageRequest,
    ) -> Result<Vec<TranslationRecord>, RepoError> {
        Ok(self.select(request, |record| record.locale == locale)?.items)
    }

    async fn find_by_tags(
        &self,
        tags: &[String],
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError> {
        let wanted: BTreeSet<&str> = tags.iter().map(String::as_str).collect();
        self.select(request, |record| shares_any_tag(record, &wanted))
    }

    async fn find_by_key(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError> {
        self.select(request, |record| record.key.contains(pattern))
    }

    async fn find_by_content(
        &self,
        pattern: &str,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError> {
        let needle = pattern.to_lowercase();
        self.select(request, |record| contains_ignore_case(&record.content, &needle))
    }

    async fn search(
        &self,
        filter: &TranslationFilter,
        request: &PageRequest,
    ) -> Result<Page<TranslationRecord>, RepoError> {
        let wanted: BTreeSet<&str> = filter.tags.iter().map(String::as_str).collect();
        let content = filter.content.as_deref().map(str::to_lowercase);
        self.select(request, |record| {
            filter
                .key
                .as_deref()
                .is_none_or(|key| record.key.contains(key))
                && filter
                    .locale
                    .as_deref()
                    .is_none_or(|locale| record.locale == locale)
                && content
                    .as_deref()
                    .is_none_or(|needle| contains_ignore_case(&record.content, needle))
                && (wanted.is_empty() || shares_any_tag(record, &wanted))
        })
    }

    async fn distinct_locales(&self) -> Result<Vec<String>, RepoError> {
        let locales: BTreeSet<String> = rw_read(&self.rows, SOURCE, "distinct_locales")
            .values()
            .map(|record| record.locale.clone())
            .collect();
        Ok(locales.into_iter().collect())
    }
}
