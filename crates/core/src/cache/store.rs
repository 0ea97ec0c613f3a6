//! The cache store seam.

use async_trait::async_trait;

use super::entries::CachedEntry;
use super::hash::RequestKey;
use crate::Error;

/// Byte store for cached responses, organised into named generations.
///
/// Implementations must tolerate concurrent callers. Writes to the same key
/// are last-writer-wins; no multi-key transactions are required.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Create the generation if it does not exist yet.
    async fn open(&self, name: &str) -> Result<(), Error>;

    /// Names of all existing generations.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a generation and all of its entries. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    async fn match_entry(&self, name: &str, key: &RequestKey) -> Result<Option<CachedEntry>, Error>;

    /// Insert or replace an entry, opening the generation if needed.
    async fn put(&self, name: &str, entry: &CachedEntry) -> Result<(), Error>;

    /// Remove one entry. Returns whether it existed.
    async fn remove(&self, name: &str, key: &RequestKey) -> Result<bool, Error>;

    /// Number of entries held by a generation.
    async fn count(&self, name: &str) -> Result<u64, Error>;
}
