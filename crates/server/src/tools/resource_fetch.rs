//! resource_fetch tool implementation.
//!
//! Routes one request through the worker's caching strategies.

use std::collections::BTreeMap;

use harbor_client::{OfflineWorker, ResponseSource};
use harbor_core::policy::{RequestClass, Strategy};
use harbor_core::{Request, RequestMode, ResponseType};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

/// Input parameters for resource_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceFetchParams {
    /// Absolute URL, or a path relative to the worker scope.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Treat the request as a full page navigation.
    #[serde(default)]
    pub navigate: bool,

    /// Extra request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for resource_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceFetchOutput {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    /// cache, network, shell or offline.
    pub source: String,
    pub class: String,
    pub strategy: String,
    pub response_type: String,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8, lossy.
    pub body: String,
    pub body_bytes: usize,
}

fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Implementation of the resource_fetch tool.
pub async fn fetch_impl(worker: &OfflineWorker, params: ResourceFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(ToolError::InvalidInput("url cannot be empty".into()).into());
    }

    let url = worker.resolve(&params.url)?;
    let mut request = Request::get(url);
    request.method = params.method.to_ascii_uppercase();
    if params.navigate {
        request = request.with_mode(RequestMode::Navigate);
    } else if worker.scope().origin() == request.url.origin() {
        request = request.with_mode(RequestMode::SameOrigin);
    }
    for (name, value) in params.headers {
        request = request.with_header(name, value);
    }

    let served = worker.on_fetch(request).await?;
    let response = &served.response;
    let body = response.body();

    let output = ResourceFetchOutput {
        url: response.url.to_string(),
        status: response.status,
        status_text: response.status_text.clone(),
        source: label::<ResponseSource>(&served.source),
        class: label::<RequestClass>(&served.class),
        strategy: label::<Strategy>(&served.strategy),
        response_type: label::<ResponseType>(&response.response_type),
        content_type: response.content_type().map(str::to_string),
        headers: response.headers.clone(),
        body: String::from_utf8_lossy(body).to_string(),
        body_bytes: body.len(),
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::lifecycle::install_impl;
    use crate::tools::test_support::{output, worker};

    fn params(url: &str, navigate: bool) -> ResourceFetchParams {
        ResourceFetchParams { url: url.into(), method: default_method(), navigate, headers: BTreeMap::new() }
    }

    #[tokio::test]
    async fn test_fetch_empty_url() {
        let (worker, _host) = worker("v1").await;
        assert!(fetch_impl(&worker, params("  ", false)).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_precached_from_cache() {
        let (worker, host) = worker("v1").await;
        install_impl(&worker, &host).await.unwrap();

        let result = fetch_impl(&worker, params("./manifest.json", false)).await.unwrap();
        let out: ResourceFetchOutput = output(&result);
        assert_eq!(out.source, "cache");
        assert_eq!(out.class, "same-origin");
        assert_eq!(out.strategy, "cache-first");
        assert_eq!(out.response_type, "basic");
        assert_eq!(out.status, 200);
        assert!(out.body.contains("Time Tracker"));
    }

    #[tokio::test]
    async fn test_fetch_offline_navigation_gets_shell() {
        let (worker, host) = worker("v1").await;
        install_impl(&worker, &host).await.unwrap();

        let result = fetch_impl(&worker, params("/reports/2024", true)).await.unwrap();
        let out: ResourceFetchOutput = output(&result);
        assert_eq!(out.source, "shell");
        assert_eq!(out.body, "<html>shell</html>");
    }

    #[tokio::test]
    async fn test_fetch_unreachable_cross_origin_is_error() {
        let (worker, _host) = worker("v1").await;
        let result = fetch_impl(&worker, params("https://cdn.test/lib.js", false)).await;
        assert!(result.is_err());
    }
}
