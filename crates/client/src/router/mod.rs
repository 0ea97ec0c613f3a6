//! Request routing.
//!
//! Every intercepted request is classified, mapped through the strategy
//! table, and executed by one of the strategies in [`strategies`]. Each
//! request walks:
//!
//! `Received -> Classified -> {CacheLookup | NetworkFetch} -> [fallback] -> Responded | Failed`
//!
//! `Failed` is only reachable for non-navigation requests when offline
//! synthesis is disabled; navigations always resolve to some document.

mod strategies;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use harbor_core::cache::GenerationManager;
use harbor_core::policy::{Classifier, RequestClass, Strategy, StrategyTable};
use harbor_core::{Error, Request, Response, Transport};

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Network,
    /// The precached application shell document.
    Shell,
    /// Synthesized 503.
    Offline,
}

/// A response together with how it was obtained.
#[derive(Debug)]
pub struct Served {
    pub response: Response,
    pub source: ResponseSource,
    pub class: RequestClass,
    pub strategy: Strategy,
}

/// Deployment switches that vary between worker variants.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Write successful network-first responses through to the cache.
    pub cache_cross_origin_successes: bool,
    /// Answer unserviceable subresource requests with a 503 instead of `Err`.
    pub synthesize_offline_response: bool,
    /// Request used to look up the precached shell document.
    pub shell: Request,
}

/// Classifies requests and executes the configured strategy.
pub struct Router {
    generations: Arc<GenerationManager>,
    transport: Arc<dyn Transport>,
    classifier: Classifier,
    table: StrategyTable,
    options: RouterOptions,
}

impl Router {
    pub fn new(
        generations: Arc<GenerationManager>, transport: Arc<dyn Transport>, classifier: Classifier, table: StrategyTable,
        options: RouterOptions,
    ) -> Self {
        Self { generations, transport, classifier, table, options }
    }

    /// Handle one intercepted request.
    ///
    /// # Errors
    ///
    /// Returns the network error when nothing can serve a non-navigation
    /// request and offline synthesis is disabled.
    pub async fn handle(&self, request: Request) -> Result<Served, Error> {
        let class = self.classifier.classify(&request);
        let strategy = self.table.strategy_for(class);
        tracing::debug!(
            url = %request.url,
            ?class,
            ?strategy,
            navigate = request.is_navigation(),
            "classified request"
        );

        let result = match strategy {
            Strategy::NetworkFirst => self.network_first(&request).await,
            Strategy::CacheFirst => self.cache_first(&request, false).await,
            Strategy::CacheFirstRefresh => self.cache_first(&request, true).await,
        };

        match result {
            Ok((response, source)) => {
                tracing::debug!(url = %request.url, ?source, status = response.status, "responded");
                Ok(Served { response, source, class, strategy })
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "request failed with no fallback");
                Err(err)
            }
        }
    }
}
