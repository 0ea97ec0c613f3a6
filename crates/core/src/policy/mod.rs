//! Request classification and the strategy table.
//!
//! Which caching strategy applies to a request is data, not control flow:
//! a [`StrategyTable`] maps each [`RequestClass`] to a [`Strategy`], and the
//! presets cover the deployment variants in use:
//!
//! - `hybrid` - pinned CDN resources cache-first-refresh, other cross-origin
//!   network-first, same-origin cache-first (default)
//! - `network_first` - every class network-first
//! - `cache_first` - every class cache-first

mod classify;

pub use classify::Classifier;

use serde::{Deserialize, Serialize};

/// Result of classifying a request, first match wins in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestClass {
    /// Matches a designated always-cache-first resource prefix.
    Pinned,
    /// Any other origin than the application's.
    CrossOrigin,
    /// The application's own origin.
    SameOrigin,
}

/// A caching strategy the router can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Network first, cache only as fallback.
    NetworkFirst,
    /// Cache first, network fallback with write-through.
    CacheFirst,
    /// Cache first, refill on miss, shell document on failure.
    CacheFirstRefresh,
}

/// Mapping from request class to strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyTable {
    pub pinned: Strategy,
    pub cross_origin: Strategy,
    pub same_origin: Strategy,
}

impl StrategyTable {
    pub fn hybrid() -> Self {
        Self {
            pinned: Strategy::CacheFirstRefresh,
            cross_origin: Strategy::NetworkFirst,
            same_origin: Strategy::CacheFirst,
        }
    }

    pub fn network_first() -> Self {
        Self { pinned: Strategy::NetworkFirst, cross_origin: Strategy::NetworkFirst, same_origin: Strategy::NetworkFirst }
    }

    pub fn cache_first() -> Self {
        Self { pinned: Strategy::CacheFirst, cross_origin: Strategy::CacheFirst, same_origin: Strategy::CacheFirst }
    }

    pub fn strategy_for(&self, class: RequestClass) -> Strategy {
        match class {
            RequestClass::Pinned => self.pinned,
            RequestClass::CrossOrigin => self.cross_origin,
            RequestClass::SameOrigin => self.same_origin,
        }
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::hybrid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hybrid_table() {
        let table = StrategyTable::default();
        assert_eq!(table.strategy_for(RequestClass::Pinned), Strategy::CacheFirstRefresh);
        assert_eq!(table.strategy_for(RequestClass::CrossOrigin), Strategy::NetworkFirst);
        assert_eq!(table.strategy_for(RequestClass::SameOrigin), Strategy::CacheFirst);
    }

    #[test]
    fn test_uniform_presets() {
        for class in [RequestClass::Pinned, RequestClass::CrossOrigin, RequestClass::SameOrigin] {
            assert_eq!(StrategyTable::network_first().strategy_for(class), Strategy::NetworkFirst);
            assert_eq!(StrategyTable::cache_first().strategy_for(class), Strategy::CacheFirst);
        }
    }

    #[test]
    fn test_table_deserializes_from_names() {
        let table: StrategyTable = serde_json::from_str(
            r#"{"pinned":"cache-first","cross_origin":"network-first","same_origin":"cache-first-refresh"}"#,
        )
        .unwrap();
        assert_eq!(table.same_origin, Strategy::CacheFirstRefresh);
    }
}
