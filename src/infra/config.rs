// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::paths;

/// Environment variable that overrides `[api] base_url`.
pub const API_URL_ENV: &str = "SHARETUNES_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Backend connection settings shared by both transports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined to.
    pub base_url: String,
    /// Timeout for ordinary calls.
    pub timeout_ms: u64,
    /// Timeout for recommendation generation (LLM-backed, slow).
    pub long_timeout_ms: u64,
    /// Token refresh endpoint, relative to `base_url`.
    pub refresh_path: String,
    /// Honor HTTP(S)_PROXY from the environment.
    pub use_proxy: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://backend:8000/api".into(),
            timeout_ms: 60_000,
            long_timeout_ms: 120_000,
            refresh_path: "auth/token/refresh/".into(),
            use_proxy: true,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn long_timeout(&self) -> Duration {
        Duration::from_millis(self.long_timeout_ms)
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply SHARETUNES_API_URL if present in the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(base_url = %url, "API base URL overridden from environment");
            self.api.base_url = url.trim().to_string();
        }
    }
}
