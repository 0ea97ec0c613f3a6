//! cache_generations tool implementation.

use harbor_client::OfflineWorker;
use harbor_core::cache::GenerationInfo;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_generations tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGenerationsOutput {
    pub current: String,
    pub generations: Vec<GenerationInfo>,
}

/// Implementation of the cache_generations tool.
pub async fn generations_impl(worker: &OfflineWorker) -> Result<CallToolResult, McpError> {
    let manager = worker.generations();
    let output = CacheGenerationsOutput { current: manager.current().to_string(), generations: manager.generations().await? };
    json_result(&output)
}
