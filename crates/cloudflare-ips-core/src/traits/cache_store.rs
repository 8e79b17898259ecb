// # Cache Store Trait
//
// The host-provided cache the fetched lists are memoized in.
//
// ## Purpose
//
// Lists are fetched at most once per TTL per kind. Whatever backs the store
// (process memory, a shared cache service) decides how long entries really
// live; the pipeline only asks for a TTL and treats an absent entry as a miss.
//
// ## Implementations
//
// - In-memory: `MemoryCacheStore`
// - Host caches: adapt `load`/`store` to the host's API

use crate::error::Result;
use crate::types::NetworkList;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for cache backends
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Failure
///
/// Backend failures are reported as `Error::Cache`. They never poison an
/// entry: a failed `store` leaves the previous state in place.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load an unexpired entry
    ///
    /// # Returns
    ///
    /// - `Ok(Some(list))`: cache hit
    /// - `Ok(None)`: absent or expired
    /// - `Err(Error)`: backend failure
    async fn load(&self, key: &str) -> Result<Option<NetworkList>>;

    /// Store an entry that expires after `ttl`
    async fn store(&self, key: &str, value: NetworkList, ttl: Duration) -> Result<()>;

    /// Whether concurrent misses on one key should run a single producer
    ///
    /// Stores that resolve fill races themselves return `true`; the adapter
    /// then coalesces producers per key. Otherwise concurrent producers all
    /// run and the last write wins.
    fn single_flight(&self) -> bool {
        false
    }
}
