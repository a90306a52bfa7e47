use thiserror::Error;

use super::keys::Region;

/// Failure of a cache backend. Never crosses the [`super::RegionStore`] boundary.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache region `{region}` is unavailable: {reason}")]
    Unavailable { region: Region, reason: String },
    #[error("cache region `{region}` holds a corrupted entry: {reason}")]
    Corrupted { region: Region, reason: String },
}

impl CacheError {
    pub fn unavailable(region: Region, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            region,
            reason: reason.into(),
        }
    }

    pub fn corrupted(region: Region, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            region,
            reason: reason.into(),
        }
    }
}
