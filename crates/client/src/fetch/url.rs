//! URL resolution for consistent cache keys.

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for harbor_core::Error {
    fn from(err: UrlError) -> Self {
        harbor_core::Error::InvalidUrl(err.to_string())
    }
}

/// Resolve a manifest path or request URL against the worker scope.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join relative references (`./index.html`, `/app.js`) onto `base`
/// 3. Reject anything but http/https
/// 4. Remove fragment (#...), which never reaches the network
/// 5. Keep query string intact (do not reorder)
///
/// Host lowercasing and default-port removal come from URL parsing.
pub fn resolve(base: &url::Url, input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> url::Url {
        url::Url::parse("https://app.test/tracker/").unwrap()
    }

    #[test]
    fn test_resolve_dot_relative() {
        let url = resolve(&scope(), "./index.html").unwrap();
        assert_eq!(url.as_str(), "https://app.test/tracker/index.html");
    }

    #[test]
    fn test_resolve_root_relative() {
        let url = resolve(&scope(), "/icon-192.png").unwrap();
        assert_eq!(url.as_str(), "https://app.test/icon-192.png");
    }

    #[test]
    fn test_resolve_absolute_keeps_other_origin() {
        let url = resolve(&scope(), "https://CDN.example.com/lib.css").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/lib.css");
    }

    #[test]
    fn test_resolve_remove_fragment() {
        let url = resolve(&scope(), "./index.html#today").unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_resolve_preserve_query() {
        let url = resolve(&scope(), "data.json?b=2&a=1").unwrap();
        assert_eq!(url.query(), Some("b=2&a=1"));
    }

    #[test]
    fn test_resolve_default_port_dropped() {
        let url = resolve(&scope(), "https://app.test:443/x").unwrap();
        assert_eq!(url.as_str(), "https://app.test/x");
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&scope(), "file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve(&scope(), ""), Err(UrlError::Empty)));
        assert!(matches!(resolve(&scope(), "   "), Err(UrlError::Empty)));
    }
}
