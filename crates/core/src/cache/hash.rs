//! Request identity for cache slots.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::Request;

/// Identity of a cache slot within a generation.
///
/// `hash` is the lookup key; `method` and `url` are kept for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub hash: String,
    pub method: String,
    pub url: String,
}

impl RequestKey {
    /// Derive the key for `request`, folding in the values of `vary_headers`.
    pub fn for_request(request: &Request, vary_headers: &[String]) -> Self {
        let vary = vary_headers
            .iter()
            .map(|name| format!("{}={}", name.to_ascii_lowercase(), request.header(name).unwrap_or("")))
            .collect::<Vec<_>>()
            .join("&");
        let method = request.method.to_ascii_uppercase();
        let url = request.url.to_string();
        Self { hash: compute_request_key(&method, &url, &vary), method, url }
    }
}

/// Compute the content-addressed key for a method, URL and vary string.
pub fn compute_request_key(method: &str, url: &str, vary_headers: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    hasher.update(vary_headers.as_bytes());
    hex::encode(hasher.finalize())
}
