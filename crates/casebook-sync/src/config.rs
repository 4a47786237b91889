//! Synchronization layer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default debounce window for free-text search, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Configuration shared by every query store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Debounce window in milliseconds.
    ///
    /// After a search edit the store waits this long before dispatching.
    /// Further edits re-arm the same timer.
    pub debounce_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SyncConfig {
    /// Config with a custom debounce window.
    #[must_use]
    pub fn with_debounce_ms(debounce_ms: u64) -> Self {
        Self { debounce_ms }
    }

    /// The debounce window as a `Duration`.
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.debounce_window(), Duration::from_millis(300));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SyncConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SyncConfig::default());
    }
}
