//! Cache region and key definitions.
//!
//! Keys are structured values rather than concatenated strings, so two requests
//! with identical parameters always hash to the same entry. `Display` renders the
//! textual form used in logs (`en_0_10_updatedAt_desc`).

use std::collections::BTreeSet;
use std::fmt;

use crate::application::pagination::PageRequest;
use crate::domain::entities::TranslationId;
use crate::domain::types::SortDirection;

/// Independently managed cache partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Single translations keyed by id.
    ById,
    /// Locale listings, tracked per locale in the secondary index.
    LocalePage,
    /// Tag search pages. Cleared wholesale.
    TagPage,
    /// Key substring search pages. Cleared wholesale.
    KeySearch,
    /// Content substring search pages. Cleared wholesale.
    ContentSearch,
    /// The sorted list of every locale in the store.
    DistinctLocales,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::ById,
        Region::LocalePage,
        Region::TagPage,
        Region::KeySearch,
        Region::ContentSearch,
        Region::DistinctLocales,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::ById => "by-id",
            Region::LocalePage => "by-locale-page",
            Region::TagPage => "by-tag-page",
            Region::KeySearch => "by-key-search",
            Region::ContentSearch => "by-content-search",
            Region::DistinctLocales => "distinct-locales",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The value a page query is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Partition {
    /// A locale or a search pattern.
    Value(String),
    /// A normalized tag set. Tags may contain any character, including `,`.
    Tags(BTreeSet<String>),
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Value(value) => f.write_str(value),
            Partition::Tags(tags) => {
                for (position, tag) in tags.iter().enumerate() {
                    if position > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(tag)?;
                }
                Ok(())
            }
        }
    }
}

/// Composite key for a paginated, sorted query within one partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    partition: Partition,
    page: u32,
    size: u32,
    sort_by: String,
    sort_dir: SortDirection,
}

impl PageKey {
    fn new(partition: Partition, request: &PageRequest) -> Self {
        Self {
            partition,
            page: request.page,
            size: request.size,
            sort_by: request.sort_by.clone(),
            sort_dir: request.sort_dir,
        }
    }

    pub fn for_locale(locale: &str, request: &PageRequest) -> Self {
        Self::new(Partition::Value(locale.to_string()), request)
    }

    /// Tag order and duplicates do not change the result, so they do not change the key.
    pub fn for_tags(tags: &[String], request: &PageRequest) -> Self {
        let normalized: BTreeSet<String> = tags.iter().cloned().collect();
        Self::new(Partition::Tags(normalized), request)
    }

    pub fn for_key_pattern(pattern: &str, request: &PageRequest) -> Self {
        Self::new(Partition::Value(pattern.to_string()), request)
    }

    /// Content search ignores case, so the key does too.
    pub fn for_content_pattern(pattern: &str, request: &PageRequest) -> Self {
        Self::new(Partition::Value(pattern.to_lowercase()), request)
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_{}",
            self.partition, self.page, self.size, self.sort_by, self.sort_dir
        )
    }
}

/// Key of one entry inside a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Id(TranslationId),
    Page(PageKey),
    /// The single entry of [`Region::DistinctLocales`].
    AllLocales,
}

impl From<PageKey> for CacheKey {
    fn from(key: PageKey) -> Self {
        CacheKey::Page(key)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Id(id) => write!(f, "{id}"),
            CacheKey::Page(key) => key.fmt(f),
            CacheKey::AllLocales => f.write_str("all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(dir: &str) -> PageRequest {
        PageRequest::from_params(0, 10, "updatedAt", dir)
    }

    #[test]
    fn locale_key_renders_composite_form() {
        let key = PageKey::for_locale("en", &request("desc"));
        assert_eq!(key.to_string(), "en_0_10_updatedAt_desc");
        assert_eq!(key.partition(), &Partition::Value("en".to_string()));
    }

    #[test]
    fn identical_parameters_produce_equal_keys() {
        let a = PageKey::for_locale("en", &request("DESC"));
        let b = PageKey::for_locale("en", &request("desc"));
        assert_eq!(a, b);
        assert_ne!(a, PageKey::for_locale("en", &request("asc")));
        assert_ne!(a, PageKey::for_locale("fr", &request("desc")));
    }

    #[test]
    fn underscores_in_values_do_not_collide() {
        let a = PageKey::for_locale("en_0", &PageRequest::from_params(1, 10, "id", "asc"));
        let b = PageKey::for_locale("en", &PageRequest::from_params(0, 1, "10_id", "asc"));
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a, b);
    }

    #[test]
    fn tag_keys_ignore_order_and_duplicates() {
        let a = PageKey::for_tags(
            &["web".to_string(), "ui".to_string(), "ui".to_string()],
            &request("asc"),
        );
        let b = PageKey::for_tags(&["ui".to_string(), "web".to_string()], &request("asc"));
        assert_eq!(a, b);
        assert_eq!(a.partition().to_string(), "ui,web");
    }

    #[test]
    fn comma_inside_a_tag_is_not_a_separator() {
        let single = PageKey::for_tags(&["a,b".to_string()], &request("asc"));
        let pair = PageKey::for_tags(&["a".to_string(), "b".to_string()], &request("asc"));
        assert_eq!(single.to_string(), pair.to_string());
        assert_ne!(single, pair);
    }

    #[test]
    fn content_keys_ignore_case() {
        let a = PageKey::for_content_pattern("Hello", &request("asc"));
        let b = PageKey::for_content_pattern("hELLO", &request("asc"));
        assert_eq!(a, b);
    }

    #[test]
    fn cache_key_display() {
        assert_eq!(CacheKey::Id(7).to_string(), "7");
        assert_eq!(CacheKey::AllLocales.to_string(), "all");
        assert_eq!(Region::LocalePage.to_string(), "by-locale-page");
    }
}
