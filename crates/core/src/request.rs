//! Outbound request model.

use serde::{Deserialize, Serialize};
use url::Url;

/// How the request was issued by the client application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Full document load.
    Navigate,
    SameOrigin,
    #[default]
    Cors,
    NoCors,
}

/// Whether an existing HTTP-level cached representation may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    #[default]
    Default,
    /// Force a fresh network copy.
    Reload,
}

/// A request intercepted from the client application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
    pub cache: CacheMode,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// A plain `GET` subresource request.
    pub fn get(url: Url) -> Self {
        Self { method: "GET".to_string(), url, mode: RequestMode::default(), cache: CacheMode::Default, headers: Vec::new() }
    }

    /// A `GET` page-navigation request.
    pub fn navigate(url: Url) -> Self {
        Self { mode: RequestMode::Navigate, ..Self::get(url) }
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Case-insensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_is_get() {
        let req = Request::navigate(Url::parse("https://app.test/").unwrap());
        assert_eq!(req.method, "GET");
        assert!(req.is_navigation());
        assert_eq!(req.cache, CacheMode::Default);
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let req = Request::get(Url::parse("https://app.test/a.css").unwrap()).with_header("Accept", "text/css");
        assert_eq!(req.header("accept"), Some("text/css"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&RequestMode::NoCors).unwrap();
        assert_eq!(json, "\"no-cors\"");
    }
}
