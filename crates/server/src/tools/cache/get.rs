//! cache_get tool implementation.
//!
//! Retrieves a cached entry from the current generation by URL.

use harbor_client::OfflineWorker;
use harbor_core::Error;
use harbor_core::Request;
use harbor_core::cache::EntrySummary;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// URL (or scope-relative path) of the cached resource.
    pub url: String,

    /// Include the body as lossy UTF-8 text.
    #[serde(default)]
    pub include_body: bool,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub generation: String,
    pub key: String,
    pub entry: EntrySummary,
    pub body: Option<String>,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(worker: &OfflineWorker, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let url = worker.resolve(&params.url)?;
    let generations = worker.generations();
    let key = generations.key_for(&Request::get(url));

    let entry = generations
        .lookup(&key)
        .await?
        .ok_or_else(|| Error::CacheMiss(key.url.clone()))?;

    let output = CacheGetOutput {
        generation: generations.current().to_string(),
        key: key.hash,
        body: params
            .include_body
            .then(|| String::from_utf8_lossy(&entry.body).to_string()),
        entry: entry.summary(),
    };
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::lifecycle::install_impl;
    use crate::tools::test_support::{output, worker};

    #[tokio::test]
    async fn test_get_impl_missing() {
        let (worker, _host) = worker("v1").await;
        let params = CacheGetParams { url: "./index.html".to_string(), include_body: false };

        let result = get_impl(&worker, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_impl_found() {
        let (worker, host) = worker("v1").await;
        install_impl(&worker, &host).await.unwrap();

        let params = CacheGetParams { url: "./index.html".to_string(), include_body: true };
        let result = get_impl(&worker, params).await.unwrap();
        let out: CacheGetOutput = output(&result);
        assert_eq!(out.generation, "v1");
        assert_eq!(out.entry.url, "https://app.test/index.html");
        assert_eq!(out.entry.status, 200);
        assert_eq!(out.body.as_deref(), Some("<html>shell</html>"));
    }
}
