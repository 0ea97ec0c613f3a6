//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the offline worker.
use std::sync::Arc;

use harbor_client::{LocalHost, OfflineWorker};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::cache::{CacheGetParams, CacheRemoveParams, generations_impl, get_impl, remove_impl};
use crate::tools::events::{NotificationClickParams, PushParams, SyncParams, click_impl, push_impl, sync_impl};
use crate::tools::lifecycle::{activate_impl, install_impl};
use crate::tools::resource_fetch::{ResourceFetchParams, fetch_impl};

/// The main MCP server handler for harbor.
#[derive(Clone)]
pub struct HarborServer {
    worker: Arc<OfflineWorker>,
    host: Arc<LocalHost>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl HarborServer {
    /// Create a new server handler around a wired worker and its host.
    pub fn new(worker: Arc<OfflineWorker>, host: Arc<LocalHost>) -> Self {
        Self { worker, host, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Install the worker: precache the manifest into the current cache generation and activate immediately. Returns stored and failed entries."
    )]
    async fn worker_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.worker, &self.host).await
    }

    #[tool(description = "Activate the worker: delete every cache generation except the current one and claim clients.")]
    async fn worker_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.worker, &self.host).await
    }

    /// Route a request through the caching strategies.
    #[tool(
        description = "Fetch a resource through the offline cache. Relative URLs resolve against the worker scope. Returns the response and whether it came from cache, network, the shell document or an offline placeholder."
    )]
    async fn resource_fetch(&self, params: Parameters<ResourceFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, params.0).await
    }

    #[tool(description = "Deliver a background-sync event with the given tag.")]
    async fn worker_sync(&self, params: Parameters<SyncParams>) -> Result<CallToolResult, McpError> {
        sync_impl(&self.worker, params.0).await
    }

    #[tool(description = "Deliver a push message; shows a notification with the payload text as body.")]
    async fn worker_push(&self, params: Parameters<PushParams>) -> Result<CallToolResult, McpError> {
        push_impl(&self.worker, params.0).await
    }

    #[tool(description = "Simulate a click on a shown notification: closes it and opens the application window.")]
    async fn notification_click(&self, params: Parameters<NotificationClickParams>) -> Result<CallToolResult, McpError> {
        click_impl(&self.worker, params.0).await
    }

    #[tool(description = "Look up a URL in the current cache generation without touching the network.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.worker, params.0).await
    }

    #[tool(description = "Remove a URL from the current cache generation.")]
    async fn cache_remove(&self, params: Parameters<CacheRemoveParams>) -> Result<CallToolResult, McpError> {
        remove_impl(&self.worker, params.0).await
    }

    #[tool(description = "List cache generations with their entry counts and which one is current.")]
    async fn cache_generations(&self) -> Result<CallToolResult, McpError> {
        generations_impl(&self.worker).await
    }
}

impl ServerHandler for HarborServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "harbor".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::worker;

    #[tokio::test]
    async fn test_all_tools_registered() {
        let (worker, host) = worker("v1").await;
        let server = HarborServer::new(worker, host);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "cache_generations",
                "cache_get",
                "cache_remove",
                "notification_click",
                "resource_fetch",
                "worker_activate",
                "worker_install",
                "worker_push",
                "worker_sync",
            ]
        );
    }
}
