//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (HARBOR_*, nested keys split on `__`)
//! 2. TOML config file (if HARBOR_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::policy::StrategyTable;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (HARBOR_*)
/// 2. TOML config file (if HARBOR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via HARBOR_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL the worker controls. Its origin is the application origin,
    /// and relative manifest paths resolve against it.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Cache version; also the name of the current generation.
    ///
    /// Bump whenever the precache list changes.
    #[serde(default = "default_version")]
    pub version: String,

    /// Precache manifest, in order.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Application shell document served to offline navigations.
    #[serde(default = "default_shell_document")]
    pub shell_document: String,

    /// Absolute URL prefixes that are always served cache-first.
    #[serde(default)]
    pub pinned_resources: Vec<String>,

    /// Strategy per request class.
    #[serde(default)]
    pub strategies: StrategyTable,

    /// Write successful cross-origin network-first responses through to the cache.
    #[serde(default)]
    pub cache_cross_origin_successes: bool,

    /// Answer unserviceable subresource requests with a 503 instead of an error.
    #[serde(default)]
    pub synthesize_offline_response: bool,

    /// Request headers that select between cached representations.
    #[serde(default)]
    pub vary_headers: Vec<String>,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Background-sync tag that triggers the sync handler.
    #[serde(default = "default_sync_tag")]
    pub sync_tag: String,

    #[serde(default)]
    pub notification: NotificationConfig,
}

/// Push notification presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub title: String,
    /// Body used when a push carries no payload.
    pub default_body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub tag: String,
    pub require_interaction: bool,
    /// Window opened when a notification is clicked.
    pub click_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "Time Tracker".into(),
            default_body: "Timer notification".into(),
            icon: "/icon-192.png".into(),
            badge: "/icon-192.png".into(),
            vibrate: vec![200, 100, 200],
            tag: "timer-notification".into(),
            require_interaction: true,
            click_url: "/".into(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./harbor-cache.sqlite")
}

fn default_scope() -> String {
    "http://localhost:8080/".into()
}

fn default_version() -> String {
    "v1".into()
}

fn default_precache() -> Vec<String> {
    ["./index.html", "./manifest.json", "./icon-192.png", "./icon-512.png"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_shell_document() -> String {
    "./index.html".into()
}

fn default_user_agent() -> String {
    "harbor/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_sync_tag() -> String {
    "sync-activities".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            scope: default_scope(),
            version: default_version(),
            precache: default_precache(),
            shell_document: default_shell_document(),
            pinned_resources: Vec::new(),
            strategies: StrategyTable::default(),
            cache_cross_origin_successes: false,
            synthesize_offline_response: false,
            vary_headers: Vec::new(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            sync_tag: default_sync_tag(),
            notification: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The parsed scope URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `scope` is not an absolute http(s) URL.
    pub fn scope_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.scope)
            .map_err(|e| ConfigError::Invalid { field: "scope".into(), reason: e.to_string() })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::Invalid { field: "scope".into(), reason: format!("unsupported scheme: {scheme}") }),
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `HARBOR_`
    /// 2. TOML file from `HARBOR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("HARBOR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("HARBOR_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
