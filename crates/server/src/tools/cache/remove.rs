//! cache_remove tool implementation.

use harbor_client::OfflineWorker;
use harbor_core::Request;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_remove tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheRemoveParams {
    /// URL (or scope-relative path) to evict from the current generation.
    pub url: String,
}

/// Output from the cache_remove tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheRemoveOutput {
    pub url: String,
    /// Whether an entry existed.
    pub removed: bool,
}

/// Implementation of the cache_remove tool.
pub async fn remove_impl(worker: &OfflineWorker, params: CacheRemoveParams) -> Result<CallToolResult, McpError> {
    let url = worker.resolve(&params.url)?;
    let generations = worker.generations();
    let key = generations.key_for(&Request::get(url));
    let removed = generations.remove(&key).await?;

    json_result(&CacheRemoveOutput { url: key.url, removed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::lifecycle::install_impl;
    use crate::tools::test_support::{output, worker};

    #[tokio::test]
    async fn test_remove_precached_entry() {
        let (worker, host) = worker("v1").await;
        install_impl(&worker, &host).await.unwrap();

        let params = CacheRemoveParams { url: "./icon-512.png".into() };
        let out: CacheRemoveOutput = output(&remove_impl(&worker, params.clone()).await.unwrap());
        assert!(out.removed);
        assert_eq!(out.url, "https://app.test/icon-512.png");

        let out: CacheRemoveOutput = output(&remove_impl(&worker, params).await.unwrap());
        assert!(!out.removed);
    }

    #[tokio::test]
    async fn test_remove_bad_url() {
        let (worker, _host) = worker("v1").await;
        let result = remove_impl(&worker, CacheRemoveParams { url: "file:///etc/hosts".into() }).await;
        assert!(result.is_err());
    }
}
