//! Verba translation cache.
//!
//! Read-through, write-invalidate caching in front of a [`TranslationService`]:
//!
//! - **Regions**: independent concurrent maps per query shape (by id, by locale
//!   page, by tag page, key search, content search, distinct locales)
//! - **Secondary index**: locale → cached page keys, used to evict exactly the
//!   locale pages a write can make stale
//! - **Coordinator**: decides what each write invalidates
//!
//! Cache failures are absorbed by [`RegionStore`]; callers only ever see the
//! wrapped service's results.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! recover_cold_state = true
//! ```
//!
//! [`TranslationService`]: crate::application::translations::TranslationService

mod config;
mod coordinator;
mod error;
mod index;
mod keys;
mod service;
mod store;

pub use config::CacheConfig;
pub use coordinator::{CacheCoordinator, CacheStats};
pub use error::CacheError;
pub use index::SecondaryIndex;
pub use keys::{CacheKey, PageKey, Partition, Region};
pub use service::CachedTranslationService;
pub use store::{CachedValue, InMemoryRegions, RegionBackend, RegionStore};

/// Names of the counters emitted by the cache.
pub mod metric_names {
    pub const HIT: &str = "verba_cache_hit_total";
    pub const MISS: &str = "verba_cache_miss_total";
    pub const EVICT: &str = "verba_cache_evict_total";
    pub const CLEAR: &str = "verba_cache_clear_total";
    pub const ERROR: &str = "verba_cache_error_total";
}
