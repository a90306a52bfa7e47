//! Offset pagination shared by the store contract and the cache keys.

use serde::Serialize;

use crate::domain::types::SortDirection;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_SORT_FIELD: &str = "updatedAt";

/// Page window and ordering of a listing query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDirection,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort_by: impl Into<String>, sort_dir: SortDirection) -> Self {
        Self {
            page,
            size,
            sort_by: sort_by.into(),
            sort_dir,
        }
    }

    /// Builds a request from raw query parameters, parsing the direction leniently.
    pub fn from_params(page: u32, size: u32, sort_by: &str, sort_dir: &str) -> Self {
        Self::new(page, size, sort_by, SortDirection::parse_lenient(sort_dir))
    }

    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD, SortDirection::Desc)
    }
}

/// One page of a counted listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_items.div_ceil(u64::from(self.size))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_multiplies_page_and_size() {
        let request = PageRequest::from_params(3, 20, "key", "asc");
        assert_eq!(request.offset(), 60);
        assert_eq!(request.sort_dir, SortDirection::Asc);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::from_params(0, 10, "id", "asc");
        let page = Page::new(vec![1, 2, 3], &request, 21);
        assert_eq!(page.total_pages(), 3);
        assert!(!page.is_empty());
    }

    #[test]
    fn default_request_matches_listing_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 50);
        assert_eq!(request.sort_by, "updatedAt");
        assert_eq!(request.sort_dir, SortDirection::Desc);
    }
}
