//! Persisted CLI settings.
//!
//! Settings live in `settings.toml` under the platform config directory
//! (overridable with `--config`). Every section is optional; missing keys
//! fall back to their defaults, and command-line flags win over the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use casebook_client::{ClientConfig, RateLimitConfig};
use casebook_sync::SyncConfig;
use serde::{Deserialize, Serialize};

/// Everything the CLI needs to build a transport and stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend address, timeout and user agent.
    pub client: ClientConfig,
    /// Debounce window for list stores.
    pub sync: SyncConfig,
    /// Client-side throttling. `None` disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,
}

/// Values from the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
}

impl Settings {
    /// Default settings file location.
    #[must_use]
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "Casebook", "casebook")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("read settings from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse settings in {}", path.display()))
    }

    /// Write settings to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Fails if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serialize settings")?;
        fs::write(path, content).with_context(|| format!("write settings to {}", path.display()))
    }

    /// Apply command-line overrides.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(base_url) = &overrides.base_url {
            self.client.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.client.timeout_secs = timeout_secs;
        }
        if let Some(debounce_ms) = overrides.debounce_ms {
            self.sync.debounce_ms = debounce_ms;
        }
    }
}
