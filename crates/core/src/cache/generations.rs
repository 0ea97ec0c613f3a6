//! Versioned cache generations.
//!
//! A generation is a named store whose name is the configured version
//! string. Install provisions the current generation from the precache
//! manifest; activation deletes every other generation. Neither step fails
//! the lifecycle: per-asset and per-generation problems are logged and
//! reported, and the worker proceeds with whatever was cached.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use super::entries::CachedEntry;
use super::hash::RequestKey;
use super::store::CacheStore;
use crate::{CacheMode, Error, Request, Response, Transport};

/// Outcome of provisioning the current generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ProvisionReport {
    pub generation: String,
    /// Whether the single all-or-nothing pass succeeded.
    pub bulk: bool,
    pub stored: Vec<String>,
    /// `(url, reason)` for every manifest entry left out of the cache.
    pub failed: Vec<(String, String)>,
}

/// Outcome of deleting stale generations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ReconcileReport {
    pub current: String,
    pub deleted: Vec<String>,
    /// `(generation, reason)`; empty generation name means enumeration failed.
    pub failed: Vec<(String, String)>,
}

/// A generation name and its entry count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GenerationInfo {
    pub name: String,
    pub entries: u64,
    pub current: bool,
}

/// Owns the lifecycle of versioned cache stores.
pub struct GenerationManager {
    store: Arc<dyn CacheStore>,
    version: String,
    vary_headers: Vec<String>,
}

impl GenerationManager {
    pub fn new(store: Arc<dyn CacheStore>, version: impl Into<String>) -> Self {
        Self { store, version: version.into(), vary_headers: Vec::new() }
    }

    /// Headers whose values take part in request identity.
    pub fn with_vary_headers(mut self, vary_headers: Vec<String>) -> Self {
        self.vary_headers = vary_headers;
        self
    }

    /// Name of the current generation.
    pub fn current(&self) -> &str {
        &self.version
    }

    pub fn key_for(&self, request: &Request) -> RequestKey {
        RequestKey::for_request(request, &self.vary_headers)
    }

    /// Open the current generation and populate it from `manifest`.
    ///
    /// Every entry is fetched with [`CacheMode::Reload`]. A bulk pass stores
    /// nothing unless every entry fetched with a 2xx status; otherwise each
    /// entry is fetched and stored on its own, skipping failures.
    ///
    /// # Errors
    ///
    /// Only when the generation itself cannot be opened.
    pub async fn provision_current_generation(
        &self, manifest: &[Request], transport: &dyn Transport,
    ) -> Result<ProvisionReport, Error> {
        self.store
            .open(&self.version)
            .await
            .map_err(|e| Error::ProvisionFailed(format!("cannot open generation {}: {e}", self.version)))?;
        tracing::info!(generation = %self.version, entries = manifest.len(), "opened cache generation");

        let requests: Vec<Request> = manifest
            .iter()
            .map(|r| r.clone().with_cache(CacheMode::Reload))
            .collect();

        match self.add_all(&requests, transport).await {
            Ok(stored) => {
                tracing::info!(generation = %self.version, stored = stored.len(), "all precache entries cached");
                return Ok(ProvisionReport { generation: self.version.clone(), bulk: true, stored, failed: Vec::new() });
            }
            Err(err) => {
                tracing::warn!(generation = %self.version, error = %err, "bulk precache failed, caching entries one by one");
            }
        }

        let outcomes = join_all(requests.iter().map(|r| self.add(r, transport))).await;

        let mut report = ProvisionReport { generation: self.version.clone(), ..Default::default() };
        for (request, outcome) in requests.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.stored.push(request.url.to_string()),
                Err(err) => {
                    tracing::warn!(url = %request.url, error = %err, "failed to cache precache entry");
                    report.failed.push((request.url.to_string(), err.to_string()));
                }
            }
        }
        Ok(report)
    }

    /// Fetch everything first, store only if every fetch succeeded.
    async fn add_all(&self, requests: &[Request], transport: &dyn Transport) -> Result<Vec<String>, Error> {
        let responses = join_all(requests.iter().map(|r| fetch_ok(r, transport))).await;
        let responses = responses.into_iter().collect::<Result<Vec<_>, Error>>()?;

        let mut stored = Vec::with_capacity(requests.len());
        for (request, response) in requests.iter().zip(responses) {
            self.store.put(&self.version, &CachedEntry::capture(self.key_for(request), response)).await?;
            stored.push(request.url.to_string());
        }
        Ok(stored)
    }

    async fn add(&self, request: &Request, transport: &dyn Transport) -> Result<(), Error> {
        let response = fetch_ok(request, transport).await?;
        self.store
            .put(&self.version, &CachedEntry::capture(self.key_for(request), response))
            .await
    }

    /// Delete every generation except the current one.
    ///
    /// Never fails; problems are logged and listed in the report, and are
    /// retried naturally the next time activation runs.
    pub async fn reconcile_generations(&self) -> ReconcileReport {
        let mut report = ReconcileReport { current: self.version.clone(), ..Default::default() };

        let names = match self.store.keys().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "failed to enumerate cache generations");
                report.failed.push((String::new(), err.to_string()));
                return report;
            }
        };

        for name in names.into_iter().filter(|n| *n != self.version) {
            tracing::info!(generation = %name, "deleting old cache generation");
            match self.store.delete(&name).await {
                Ok(_) => report.deleted.push(name),
                Err(err) => {
                    tracing::warn!(generation = %name, error = %err, "failed to delete cache generation");
                    report.failed.push((name, err.to_string()));
                }
            }
        }
        report
    }

    /// Look up `key` in the current generation.
    pub async fn lookup(&self, key: &RequestKey) -> Result<Option<CachedEntry>, Error> {
        self.store.match_entry(&self.version, key).await
    }

    /// Store `response` for `request` in the current generation.
    pub async fn store(&self, request: &Request, response: Response) -> Result<(), Error> {
        let entry = CachedEntry::capture(self.key_for(request), response);
        self.store.put(&self.version, &entry).await
    }

    pub async fn remove(&self, key: &RequestKey) -> Result<bool, Error> {
        self.store.remove(&self.version, key).await
    }

    /// All generations with their entry counts.
    pub async fn generations(&self) -> Result<Vec<GenerationInfo>, Error> {
        let mut out = Vec::new();
        for name in self.store.keys().await? {
            let entries = self.store.count(&name).await?;
            let current = name == self.version;
            out.push(GenerationInfo { name, entries, current });
        }
        Ok(out)
    }
}

async fn fetch_ok(request: &Request, transport: &dyn Transport) -> Result<Response, Error> {
    let response = transport.fetch(request).await?;
    if !response.ok() {
        return Err(Error::HttpError(format!("{} returned status {}", request.url, response.status)));
    }
    Ok(response)
}
