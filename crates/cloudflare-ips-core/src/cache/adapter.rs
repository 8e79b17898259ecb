//! Get-or-compute over a [`CacheStore`]
//!
//! A hit returns the cached list without running the producer. A miss runs
//! the producer and stores its result with the TTL; a failing producer is
//! propagated and leaves the cache untouched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

use crate::error::Result;
use crate::traits::CacheStore;
use crate::types::NetworkList;

/// Cache adapter shared by every aggregator call
pub struct CacheAdapter {
    store: Arc<dyn CacheStore>,

    /// Per-key locks coalescing producers when the store asks for it
    flights: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CacheAdapter {
    /// Wrap a cache store
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Return the entry under `key`, computing and storing it on a miss
    ///
    /// With a single-flight store, concurrent misses on one key wait for the
    /// first producer and then read its result.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<NetworkList>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<NetworkList>>,
    {
        if let Some(hit) = self.store.load(key).await? {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        if !self.store.single_flight() {
            return self.fill(key, ttl, producer).await;
        }

        let flight = self.flight(key);
        let _guard = flight.lock().await;

        // Another caller may have filled the entry while we waited
        if let Some(hit) = self.store.load(key).await? {
            debug!("Cache filled by concurrent caller for {}", key);
            return Ok(hit);
        }

        self.fill(key, ttl, producer).await
    }

    async fn fill<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<NetworkList>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<NetworkList>>,
    {
        debug!("Cache miss for {}, computing", key);
        let value = producer().await?;
        self.store.store(key, value.clone(), ttl).await?;
        Ok(value)
    }

    fn flight(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(flights.entry(key.to_string()).or_default())
    }
}
