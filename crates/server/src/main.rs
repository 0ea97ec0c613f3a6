//! harbor server entry point.
//!
//! Boots an offline worker and exposes its lifecycle hooks as MCP tools on
//! stdio transport. Logging goes to stderr to avoid interfering with the
//! JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use harbor_client::{FetchClient, FetchConfig, LocalHost, OfflineWorker};
use harbor_core::CacheDb;
use harbor_core::config::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let scope = config.scope_url()?;

    tracing::info!(
        scope = %scope,
        version = %config.version,
        db_path = %config.db_path.display(),
        "Starting harbor server on stdio transport"
    );

    let store = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache database {}", config.db_path.display()))?;

    let fetch_config = FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.max_bytes,
        timeout: config.timeout(),
        ..Default::default()
    };
    let transport = FetchClient::new(fetch_config, scope.origin())?;
    let host = Arc::new(LocalHost::new());

    let worker = OfflineWorker::from_config(&config, Arc::new(store), Arc::new(transport), host.clone())?;

    let handler = handler::HarborServer::new(Arc::new(worker), host);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
