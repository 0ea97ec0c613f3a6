//! worker_install and worker_activate tool implementations.

use harbor_client::{LocalHost, OfflineWorker};
use harbor_core::cache::{ProvisionReport, ReconcileReport};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Output from the worker_install tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InstallOutput {
    pub report: ProvisionReport,
    /// Whether the worker asked to become active immediately.
    pub skipped_waiting: bool,
}

/// Output from the worker_activate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActivateOutput {
    pub report: ReconcileReport,
    pub clients_claimed: bool,
}

/// Implementation of the worker_install tool.
pub async fn install_impl(worker: &OfflineWorker, host: &LocalHost) -> Result<CallToolResult, McpError> {
    let report = worker.on_install().await?;
    let output = InstallOutput { report, skipped_waiting: host.state().await.skipped_waiting };
    json_result(&output)
}

/// Implementation of the worker_activate tool.
pub async fn activate_impl(worker: &OfflineWorker, host: &LocalHost) -> Result<CallToolResult, McpError> {
    let report = worker.on_activate().await?;
    let output = ActivateOutput { report, clients_claimed: host.state().await.clients_claimed };
    json_result(&output)
}
