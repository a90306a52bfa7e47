//! Domain entities mirrored from persistent storage.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Store-assigned identifier of a translation.
pub type TranslationId = i64;

/// A localized text entry as returned by the store.
///
/// Snapshots are immutable once cached; the coordinator replaces them wholesale
/// when a write returns fresh data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub id: TranslationId,
    pub key: String,
    pub locale: String,
    pub content: String,
    pub tags: BTreeSet<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TranslationRecord {
    pub fn has_tags(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// Caller-supplied fields for creating or replacing a translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationDraft {
    pub key: String,
    pub locale: String,
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl TranslationDraft {
    pub fn new(
        key: impl Into<String>,
        locale: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            locale: locale.into(),
            content: content.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// The parts of a snapshot that decide which partitioned cache entries it can appear in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFootprint {
    pub locale: String,
    pub tags: BTreeSet<String>,
}

impl From<&TranslationRecord> for TranslationFootprint {
    fn from(record: &TranslationRecord) -> Self {
        Self {
            locale: record.locale.clone(),
            tags: record.tags.clone(),
        }
    }
}
