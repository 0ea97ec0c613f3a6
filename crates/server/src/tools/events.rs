//! worker_sync, worker_push and notification_click tool implementations.
//!
//! These forward platform events to the worker unchanged.

use harbor_client::{Notification, OfflineWorker, SyncOutcome};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::error::ToolError;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncParams {
    /// Sync registration tag.
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncOutput {
    pub tag: String,
    /// handled or ignored.
    pub outcome: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PushParams {
    /// Push message text; the default body is used when absent.
    #[serde(default)]
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PushOutput {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub icon: String,
    pub vibrate: Vec<u32>,
    pub require_interaction: bool,
}

impl From<Notification> for PushOutput {
    fn from(n: Notification) -> Self {
        Self {
            title: n.title,
            body: n.body,
            tag: n.tag,
            icon: n.icon,
            vibrate: n.vibrate,
            require_interaction: n.require_interaction,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NotificationClickParams {
    /// Tag of the clicked notification (default: the configured tag).
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotificationClickOutput {
    pub opened: String,
}

/// Implementation of the worker_sync tool.
pub async fn sync_impl(worker: &OfflineWorker, params: SyncParams) -> Result<CallToolResult, McpError> {
    if params.tag.is_empty() {
        return Err(ToolError::InvalidInput("tag cannot be empty".into()).into());
    }

    let outcome = match worker.on_sync(&params.tag).await {
        SyncOutcome::Handled => "handled",
        SyncOutcome::Ignored => "ignored",
    };
    json_result(&SyncOutput { tag: params.tag, outcome: outcome.into() })
}

/// Implementation of the worker_push tool.
pub async fn push_impl(worker: &OfflineWorker, params: PushParams) -> Result<CallToolResult, McpError> {
    let notification = worker.on_push(params.payload.as_deref()).await?;
    json_result(&PushOutput::from(notification))
}

/// Implementation of the notification_click tool.
pub async fn click_impl(worker: &OfflineWorker, params: NotificationClickParams) -> Result<CallToolResult, McpError> {
    let opened = worker.on_notification_click(params.tag.as_deref()).await?;
    json_result(&NotificationClickOutput { opened: opened.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{output, worker};

    #[tokio::test]
    async fn test_sync_registered_tag() {
        let (worker, _host) = worker("v1").await;
        let result = sync_impl(&worker, SyncParams { tag: "sync-activities".into() }).await.unwrap();
        let out: SyncOutput = output(&result);
        assert_eq!(out.outcome, "handled");

        let result = sync_impl(&worker, SyncParams { tag: "other".into() }).await.unwrap();
        let out: SyncOutput = output(&result);
        assert_eq!(out.outcome, "ignored");
    }

    #[tokio::test]
    async fn test_sync_empty_tag() {
        let (worker, _host) = worker("v1").await;
        assert!(sync_impl(&worker, SyncParams { tag: String::new() }).await.is_err());
    }

    #[tokio::test]
    async fn test_push_then_click() {
        let (worker, host) = worker("v1").await;

        let result = push_impl(&worker, PushParams { payload: Some("Break over".into()) }).await.unwrap();
        let out: PushOutput = output(&result);
        assert_eq!(out.body, "Break over");
        assert_eq!(out.tag, "timer-notification");
        assert_eq!(host.state().await.notifications.len(), 1);

        let result = click_impl(&worker, NotificationClickParams::default()).await.unwrap();
        let out: NotificationClickOutput = output(&result);
        assert_eq!(out.opened, "https://app.test/");
        assert!(host.state().await.notifications.is_empty());
    }
}
