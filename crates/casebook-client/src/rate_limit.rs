//! Client-side request throttling.
//!
//! A fixed-window counter per key. Windows live in a concurrent map and
//! expire after their TTL; the limiter is created by the caller and handed
//! to the transport, so tests and separate processes never share state.
//! Expired windows are swept every [`PURGE_EVERY`] checks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::{ClientError, Result};

/// Number of `check` calls between sweeps of expired windows.
pub const PURGE_EVERY: u64 = 64;

/// Window size and request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Requests allowed per key per window.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 120,
            window_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Window length.
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Per-key fixed-window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, Window>,
    checks: AtomicU64,
}

impl RateLimiter {
    /// Create an empty limiter.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
            checks: AtomicU64::new(0),
        }
    }

    /// The limiter's configuration.
    #[must_use]
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count one request against `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::RateLimited`] when the key's window is used up.
    pub fn check(&self, key: &str) -> Result<()> {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            let purged = self.purge_expired();
            if purged > 0 {
                trace!(purged, "swept expired rate-limit windows");
            }
        }

        let now = Instant::now();
        let window = self.config.window();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= window {
            trace!(key, "rate-limit window rolled over");
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.config.max_requests {
            let remaining = window.saturating_sub(now.duration_since(entry.started));
            let retry_after = remaining.as_secs().max(1);
            debug!(key, retry_after, "request throttled");
            return Err(ClientError::RateLimited { retry_after });
        }

        entry.count += 1;
        Ok(())
    }

    /// Drop windows older than the TTL. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let window = self.config.window();
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window);
        before.saturating_sub(self.windows.len())
    }

    /// Forget every window.
    pub fn reset(&self) {
        self.windows.clear();
    }

    /// Number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether no key is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
