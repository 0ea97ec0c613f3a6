//! Platform calls the worker makes on its host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use harbor_core::Error;

/// A notification as handed to the host for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub tag: String,
    pub require_interaction: bool,
}

/// The runtime hosting the worker.
#[async_trait]
pub trait ClientHost: Send + Sync {
    /// Become active immediately instead of waiting for old clients to close.
    async fn skip_waiting(&self) -> Result<(), Error>;

    /// Take control of already-open clients.
    async fn claim_clients(&self) -> Result<(), Error>;

    async fn show_notification(&self, notification: Notification) -> Result<(), Error>;

    async fn close_notification(&self, tag: &str) -> Result<(), Error>;

    async fn open_window(&self, url: &str) -> Result<(), Error>;
}

/// Snapshot of everything a [`LocalHost`] has been asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostState {
    pub skipped_waiting: bool,
    pub clients_claimed: bool,
    /// Notifications currently shown, oldest first.
    pub notifications: Vec<Notification>,
    pub opened_windows: Vec<String>,
}

/// Host for a worker running outside a browser: logs each call and keeps
/// the resulting state for inspection.
#[derive(Debug, Default)]
pub struct LocalHost {
    state: RwLock<HostState>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn state(&self) -> HostState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ClientHost for LocalHost {
    async fn skip_waiting(&self) -> Result<(), Error> {
        tracing::info!("worker skipping wait, activating immediately");
        self.state.write().await.skipped_waiting = true;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), Error> {
        tracing::info!("worker claiming open clients");
        self.state.write().await.clients_claimed = true;
        Ok(())
    }

    async fn show_notification(&self, notification: Notification) -> Result<(), Error> {
        tracing::info!(title = %notification.title, tag = %notification.tag, "showing notification");
        let mut state = self.state.write().await;
        // a new notification replaces any shown under the same tag
        state.notifications.retain(|n| n.tag != notification.tag);
        state.notifications.push(notification);
        Ok(())
    }

    async fn close_notification(&self, tag: &str) -> Result<(), Error> {
        tracing::debug!(tag, "closing notification");
        self.state.write().await.notifications.retain(|n| n.tag != tag);
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), Error> {
        tracing::info!(url, "opening window");
        self.state.write().await.opened_windows.push(url.to_string());
        Ok(())
    }
}
