//! Cache configuration.
//!
//! Controls the translation cache via the `[cache]` table of `verba.toml`.

/// Cache configuration resolved from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// When false every call passes straight through to the wrapped service.
    pub enabled: bool,
    /// Read the previous state from the store when it is not cached before an
    /// update or delete, so the old locale and tags are still invalidated.
    pub recover_cold_state: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recover_cold_state: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            recover_cold_state: settings.recover_cold_state,
        }
    }
}

impl CacheConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert!(config.recover_cold_state);
    }

    #[test]
    fn disabled_keeps_other_defaults() {
        let config = CacheConfig::disabled();
        assert!(!config.enabled);
        assert!(config.recover_cold_state);
    }

    #[test]
    fn converts_from_settings() {
        let settings = crate::config::CacheSettings {
            enabled: false,
            recover_cold_state: false,
        };
        let config = CacheConfig::from(&settings);
        assert!(!config.enabled);
        assert!(!config.recover_cold_state);
    }
}
