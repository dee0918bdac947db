//! Settings structures for gh-user-search configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable pointing at a settings file
pub const SETTINGS_PATH_ENV: &str = "GH_USER_SEARCH_SETTINGS";

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Locate and load settings, falling back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::find_file() {
            Some(path) => {
                info!("Loading settings from: {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                info!("No settings file found, using defaults");
                Self::default()
            }
        };
        settings.merge_env();
        Ok(settings)
    }

    fn find_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let mut paths = vec![PathBuf::from("settings.yml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("gh-user-search/settings.yml"));
        }
        paths.into_iter().find(|p| p.exists())
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("GITHUB_TOKEN") {
            if !val.is_empty() {
                self.api.token = Some(val);
            }
        }
        if let Ok(val) = std::env::var("GH_USER_SEARCH_API_URL") {
            self.api.base_url = val;
        }
        if let Ok(val) = std::env::var("GH_USER_SEARCH_PER_PAGE") {
            if let Ok(per_page) = val.parse() {
                self.search.per_page = per_page;
            }
        }
        if let Ok(val) = std::env::var("GH_USER_SEARCH_TIMEOUT") {
            match val.parse::<f64>() {
                Ok(timeout) if timeout.is_finite() && timeout > 0.0 => {
                    self.outgoing.request_timeout = timeout;
                }
                _ => warn!("Ignoring invalid GH_USER_SEARCH_TIMEOUT: {}", val),
            }
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// REST API root
    pub base_url: String,
    /// Personal access token (raises the rate limit)
    pub token: Option<String>,
    /// User-Agent header; the API rejects requests without one
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            user_agent: format!("gh-user-search/{}", crate::VERSION),
        }
    }
}

/// Pagination and ordering of user searches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per page (API maximum is 100)
    pub per_page: u32,
    /// Sort field: followers, repositories or joined
    pub sort: String,
    /// Sort direction: asc or desc
    pub order: String,
    /// Hard cap on reachable results
    pub result_cap: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            per_page: crate::DEFAULT_PER_PAGE,
            sort: "followers".to_string(),
            order: "desc".to_string(),
            result_cap: crate::PROVIDER_RESULT_CAP,
        }
    }
}

impl SearchSettings {
    /// Page size clamped to what the API accepts
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, crate::MAX_PER_PAGE)
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: crate::DEFAULT_TIMEOUT as f64,
            pool_maxsize: 10,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

impl OutgoingSettings {
    /// Request timeout as a duration
    ///
    /// Fails on zero, negative, NaN or infinite values.
    pub fn timeout(&self) -> Result<Duration> {
        let secs = self.request_timeout;
        if !(secs.is_finite() && secs > 0.0) {
            return Err(anyhow!("invalid request_timeout: {}", secs));
        }
        Duration::try_from_secs_f64(secs)
            .map_err(|e| anyhow!("invalid request_timeout {}: {}", secs, e))
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}
