// # Memory Cache Store
//
// In-memory implementation of CacheStore.
//
// ## Purpose
//
// Default cache for hosts that do not bring their own, and the backend the
// tests run against. Entries live in a HashMap behind a RwLock and expire
// on `tokio::time::Instant`, so paused-clock tests can step past a TTL.
//
// ## Crash Behavior
//
// Nothing survives a restart; the first call after one fetches both lists.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::Result;
use crate::traits::CacheStore;
use crate::types::NetworkList;

#[derive(Debug, Clone)]
struct Entry {
    value: NetworkList,

    /// `None` when the TTL reaches past what the clock can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// In-memory cache store
///
/// Cloning yields a handle onto the same entries.
///
/// # Example
///
/// ```rust,no_run
/// use cloudflare_ips_core::cache::MemoryCacheStore;
/// use cloudflare_ips_core::traits::CacheStore;
/// use cloudflare_ips_core::FallbackIps;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryCacheStore::new();
///
///     store
///         .store("cloudflare-rails:ips_v4", FallbackIps::v4(), Duration::from_secs(60))
///         .await?;
///
///     let cached = store.load("cloudflare-rails:ips_v4").await?;
///     assert_eq!(cached, Some(FallbackIps::v4()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCacheStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drop one entry
    pub async fn remove(&self, key: &str) {
        self.inner.write().await.remove(key);
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self, key: &str) -> Result<Option<NetworkList>> {
        let now = Instant::now();
        let guard = self.inner.read().await;
        Ok(guard
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone()))
    }

    async fn store(&self, key: &str, value: NetworkList, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.inner.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    fn single_flight(&self) -> bool {
        true
    }
}
