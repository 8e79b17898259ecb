//! Public entry point
//!
//! [`CloudflareIps`] answers "what are Cloudflare's ranges right now" with the
//! fewest possible fetches:
//!
//! ```text
//! cloudflare_ips(config, refresh)
//!     │
//!     ├── memoized aggregate? ──────────────► return it
//!     │
//!     ├── CacheAdapter(ips_v4) ── miss ──► Fetcher ──► Transport + parser
//!     ├── CacheAdapter(ips_v6) ── miss ──► Fetcher ──► Transport + parser
//!     │
//!     ├── ok ────► v4 ++ v6, memoize, return
//!     └── error ─► warn once, return FallbackIps (not memoized)
//! ```
//!
//! Configuration errors are the exception: they are returned to the caller
//! instead of being masked by the fallback.

use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use crate::cache::CacheAdapter;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::fallback::FallbackIps;
use crate::fetcher::Fetcher;
use crate::traits::{CacheStore, TracingSink, Transport, WarningSink};
use crate::types::{AggregateList, NetworkList, ResourceKind};

/// Fetches, caches and falls back for the Cloudflare IP ranges
///
/// ## Threading
///
/// Share one instance (e.g. behind an `Arc`) across tasks. The memoized
/// aggregate sits behind a mutex that is only held to read or replace the
/// reference; the list itself is immutable.
pub struct CloudflareIps {
    fetcher: Fetcher,
    cache: CacheAdapter,
    sink: Arc<dyn WarningSink>,
    memo: Mutex<Option<AggregateList>>,
}

impl CloudflareIps {
    /// Create an aggregator logging its fallback warning through `tracing`
    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            fetcher: Fetcher::new(transport),
            cache: CacheAdapter::new(store),
            sink: Arc::new(TracingSink),
            memo: Mutex::new(None),
        }
    }

    /// Send the fallback warning to `sink` instead
    pub fn with_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fetch the IPv4 list, bypassing every cache
    pub async fn ips_v4(&self, config: &FetchConfig) -> Result<NetworkList> {
        self.fetcher.fetch(ResourceKind::V4, config).await
    }

    /// Fetch the IPv6 list, bypassing every cache
    pub async fn ips_v6(&self, config: &FetchConfig) -> Result<NetworkList> {
        self.fetcher.fetch(ResourceKind::V6, config).await
    }

    /// Current ranges, v4 first
    ///
    /// With `refresh`, the memoized aggregate is dropped first; the cache
    /// entries keep their own TTL. Transport, parse and cache failures are
    /// logged through the sink and answered with [`FallbackIps::all`].
    ///
    /// # Returns
    ///
    /// - `Ok(AggregateList)`: live, cached or fallback ranges, never empty
    /// - `Err(Error::Config(_))`: the configuration cannot be used, or both
    ///   the live and the fallback lists are empty
    pub async fn cloudflare_ips(
        &self,
        config: &FetchConfig,
        refresh: bool,
    ) -> Result<AggregateList> {
        if refresh {
            debug!("Dropping memoized Cloudflare ranges");
            *self.memo_slot() = None;
        } else if let Some(agg) = self.memoized() {
            return Ok(agg);
        }

        config.validate()?;

        match self.live(config).await {
            Ok(agg) if !agg.is_empty() => {
                *self.memo_slot() = Some(agg.clone());
                Ok(agg)
            }
            Ok(_) => self.fall_back(&"no ranges published"),
            Err(e) if e.is_recoverable() => self.fall_back(&e),
            Err(e) => Err(e),
        }
    }

    /// The memoized aggregate, if a live fetch has been published
    pub fn memoized(&self) -> Option<AggregateList> {
        self.memo_slot().clone()
    }

    /// Both halves from this call's view of the cache, v4 first
    async fn live(&self, config: &FetchConfig) -> Result<AggregateList> {
        let v4 = self.fetch_with_cache(ResourceKind::V4, config).await?;
        let v6 = self.fetch_with_cache(ResourceKind::V6, config).await?;
        Ok(AggregateList::concat(&v4, &v6))
    }

    async fn fetch_with_cache(
        &self,
        kind: ResourceKind,
        config: &FetchConfig,
    ) -> Result<NetworkList> {
        self.cache
            .get_or_compute(&kind.cache_key(), config.expires_in, || {
                self.fetcher.fetch(kind, config)
            })
            .await
    }

    fn fall_back(&self, reason: &dyn Display) -> Result<AggregateList> {
        self.sink.warn(&format!(
            "cloudflare-rails: error fetching ip addresses from {} ({}), falling back to defaults",
            self.fetcher.origin(),
            reason
        ));

        let fallback = FallbackIps::all();
        if fallback.is_empty() {
            return Err(Error::config("no live or fallback Cloudflare ranges available"));
        }
        Ok(fallback)
    }

    fn memo_slot(&self) -> std::sync::MutexGuard<'_, Option<AggregateList>> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
