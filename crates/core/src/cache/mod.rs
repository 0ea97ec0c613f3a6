//! Versioned response cache.
//!
//! This module provides the generation-scoped cache that backs the request
//! router:
//!
//! - [`CacheStore`]: the storage seam, keyed by generation name and request key
//! - [`CacheDb`]: SQLite implementation with async access via tokio-rusqlite
//!   (WAL mode, automatic schema migrations, cascading generation deletes)
//! - [`GenerationManager`]: provisions the current generation and deletes
//!   stale ones

pub mod connection;
pub mod entries;
pub mod generations;
pub mod hash;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{CachedEntry, EntrySummary};
pub use generations::{GenerationInfo, GenerationManager, ProvisionReport, ReconcileReport};
pub use hash::RequestKey;
pub use store::CacheStore;
