//! The offline worker: lifecycle hooks over the router and generation manager.
//!
//! The host runtime calls these methods; nothing is registered globally.
//!
//! - `on_install` provisions the current generation, then skips waiting
//! - `on_activate` deletes stale generations, then claims clients
//! - `on_fetch` routes a request and always answers with a response or error
//! - `on_sync`, `on_push`, `on_notification_click` are thin pass-throughs

pub mod host;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use harbor_core::cache::{CacheStore, GenerationManager, ProvisionReport, ReconcileReport};
use harbor_core::config::{AppConfig, NotificationConfig};
use harbor_core::policy::Classifier;
use harbor_core::{Error, Request, RequestMode, Transport};

pub use host::{ClientHost, HostState, LocalHost, Notification};

use crate::fetch::resolve;
use crate::router::{Router, RouterOptions, Served};

/// Whether a sync event matched a registered tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    Handled,
    Ignored,
}

pub struct OfflineWorker {
    scope: Url,
    generations: Arc<GenerationManager>,
    router: Router,
    transport: Arc<dyn Transport>,
    host: Arc<dyn ClientHost>,
    manifest: Vec<Request>,
    sync_tag: String,
    notification: NotificationConfig,
}

impl OfflineWorker {
    /// Wire a worker from configuration and injected collaborators.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if the scope, a precache entry or the
    /// shell document cannot be resolved.
    pub fn from_config(
        config: &AppConfig, store: Arc<dyn CacheStore>, transport: Arc<dyn Transport>, host: Arc<dyn ClientHost>,
    ) -> Result<Self, Error> {
        let scope = config.scope_url().map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let manifest = config
            .precache
            .iter()
            .map(|entry| -> Result<Request, Error> { Ok(precache_request(&scope, resolve(&scope, entry)?)) })
            .collect::<Result<Vec<_>, Error>>()?;
        let shell = Request::get(resolve(&scope, &config.shell_document)?);

        let generations = Arc::new(
            GenerationManager::new(store, config.version.clone()).with_vary_headers(config.vary_headers.clone()),
        );
        let router = Router::new(
            generations.clone(),
            transport.clone(),
            Classifier::new(&scope, config.pinned_resources.clone()),
            config.strategies,
            RouterOptions {
                cache_cross_origin_successes: config.cache_cross_origin_successes,
                synthesize_offline_response: config.synthesize_offline_response,
                shell,
            },
        );

        Ok(Self {
            scope,
            generations,
            router,
            transport,
            host,
            manifest,
            sync_tag: config.sync_tag.clone(),
            notification: config.notification.clone(),
        })
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub fn generations(&self) -> &GenerationManager {
        &self.generations
    }

    pub fn manifest(&self) -> &[Request] {
        &self.manifest
    }

    /// Resolve a URL or path against the scope.
    pub fn resolve(&self, input: &str) -> Result<Url, Error> {
        Ok(resolve(&self.scope, input)?)
    }

    /// Provision the current generation, then ask to activate immediately.
    ///
    /// Skip-waiting is signalled even when provisioning fails, so the worker
    /// still becomes operational with whatever it managed to cache.
    pub async fn on_install(&self) -> Result<ProvisionReport, Error> {
        tracing::info!(generation = %self.generations.current(), "worker installing");
        let report = self
            .generations
            .provision_current_generation(&self.manifest, self.transport.as_ref())
            .await;
        if let Err(err) = &report {
            tracing::error!(error = %err, "precache provisioning failed");
        }
        self.host.skip_waiting().await?;
        report
    }

    /// Delete stale generations, then take control of open clients.
    pub async fn on_activate(&self) -> Result<ReconcileReport, Error> {
        tracing::info!(generation = %self.generations.current(), "worker activating");
        let report = self.generations.reconcile_generations().await;
        self.host.claim_clients().await?;
        Ok(report)
    }

    pub async fn on_fetch(&self, request: Request) -> Result<Served, Error> {
        self.router.handle(request).await
    }

    pub async fn on_sync(&self, tag: &str) -> SyncOutcome {
        if tag != self.sync_tag {
            tracing::debug!(tag, "ignoring unregistered sync tag");
            return SyncOutcome::Ignored;
        }
        self.sync_activities().await;
        SyncOutcome::Handled
    }

    /// Placeholder for pushing locally recorded activity to a server.
    async fn sync_activities(&self) {
        tracing::info!(tag = %self.sync_tag, "background sync triggered");
    }

    /// Show a notification built from the push payload.
    pub async fn on_push(&self, payload: Option<&str>) -> Result<Notification, Error> {
        let n = &self.notification;
        let notification = Notification {
            title: n.title.clone(),
            body: payload.map(str::to_string).unwrap_or_else(|| n.default_body.clone()),
            icon: n.icon.clone(),
            badge: n.badge.clone(),
            vibrate: n.vibrate.clone(),
            tag: n.tag.clone(),
            require_interaction: n.require_interaction,
        };
        self.host.show_notification(notification.clone()).await?;
        Ok(notification)
    }

    /// Close the clicked notification and open the application window.
    ///
    /// Returns the URL opened.
    pub async fn on_notification_click(&self, tag: Option<&str>) -> Result<Url, Error> {
        self.host
            .close_notification(tag.unwrap_or(&self.notification.tag))
            .await?;
        let target = self.resolve(&self.notification.click_url)?;
        self.host.open_window(target.as_str()).await?;
        Ok(target)
    }
}

/// Same-origin manifest entries are fetched as same-origin requests,
/// external ones in CORS mode.
fn precache_request(scope: &Url, url: Url) -> Request {
    let mode = if url.origin() == scope.origin() { RequestMode::SameOrigin } else { RequestMode::Cors };
    Request::get(url).with_mode(mode)
}
