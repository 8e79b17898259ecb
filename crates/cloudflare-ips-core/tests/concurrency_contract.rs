//! Contract Test: Concurrency and TTL
//!
//! Verifies that:
//! - Concurrent callers on a cold cache trigger one GET per kind
//! - Every returned aggregate is internally consistent (v4 block then v6 block)
//! - Expired cache entries are refetched, fresh ones are not

mod common;

use common::*;
use cloudflare_ips_core::{CloudflareIps, Family, FetchConfig};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_fetch_per_kind() {
    let transport = MockTransport::healthy();
    let ips = Arc::new(CloudflareIps::new(
        Arc::new(transport.clone()),
        Arc::new(CountingCacheStore::new()),
    ));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let ips = Arc::clone(&ips);
            tokio::spawn(async move { ips.cloudflare_ips(&FetchConfig::default(), false).await })
        })
        .collect();

    for task in tasks {
        let agg = task.await.unwrap().unwrap();
        assert_eq!(agg.len(), 3);
        assert!(agg.v4().iter().all(|n| Family::of(n) == Family::V4));
        assert!(agg.v6().iter().all(|n| Family::of(n) == Family::V6));
    }

    assert_eq!(transport.call_count("/ips-v4/"), 1);
    assert_eq!(transport.call_count("/ips-v6/"), 1);
}

#[tokio::test(start_paused = true)]
async fn expired_entries_are_refetched() {
    let transport = MockTransport::healthy();
    let ips = CloudflareIps::new(
        Arc::new(transport.clone()),
        Arc::new(CountingCacheStore::new()),
    );
    let config = FetchConfig::default().with_expires_in(Duration::from_secs(60));

    ips.cloudflare_ips(&config, false).await.unwrap();

    // Still fresh: refresh rebuilds the aggregate from cache
    tokio::time::advance(Duration::from_secs(30)).await;
    ips.cloudflare_ips(&config, true).await.unwrap();
    assert_eq!(transport.call_count("/ips-v4/"), 1);

    // Expired: refresh goes back to the origin
    tokio::time::advance(Duration::from_secs(31)).await;
    ips.cloudflare_ips(&config, true).await.unwrap();
    assert_eq!(transport.call_count("/ips-v4/"), 2);
    assert_eq!(transport.call_count("/ips-v6/"), 2);
}

#[tokio::test(start_paused = true)]
async fn memoized_aggregate_outlives_cache_ttl() {
    let transport = MockTransport::healthy();
    let ips = CloudflareIps::new(
        Arc::new(transport.clone()),
        Arc::new(CountingCacheStore::new()),
    );
    let config = FetchConfig::default().with_expires_in(Duration::from_secs(60));

    let first = ips.cloudflare_ips(&config, false).await.unwrap();
    tokio::time::advance(Duration::from_secs(3600)).await;
    let second = ips.cloudflare_ips(&config, false).await.unwrap();

    assert!(first.ptr_eq(&second));
    assert_eq!(transport.call_count("/ips-v4/"), 1);
}
