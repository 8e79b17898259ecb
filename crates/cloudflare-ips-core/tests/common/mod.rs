//! Test doubles shared by the contract tests
//!
//! Each double counts how it is used so tests can assert on fetches and
//! cache consultations, not just on returned values.

#![allow(dead_code)]

use async_trait::async_trait;
use cloudflare_ips_core::error::Result;
use cloudflare_ips_core::{
    Body, CacheStore, Error, FetchConfig, MemoryCacheStore, NetworkList, Transport,
    TransportError, WarningSink,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ORIGIN: &str = "https://www.cloudflare.com";

pub const V4_BODY: &str = "103.21.244.0/22\n103.22.200.0/22\n";
pub const V6_BODY: &str = "2400:cb00::/32\n";

/// Scripted response for one path
#[derive(Clone)]
pub enum Reply {
    Ok(&'static str),
    Status(u16),
    Network(&'static str),
    Config(&'static str),
}

/// A transport that answers from a per-path script and counts GETs
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<HashMap<String, Reply>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport serving the happy-path bodies
    pub fn healthy() -> Self {
        let transport = Self::new();
        transport.reply("/ips-v4/", Reply::Ok(V4_BODY));
        transport.reply("/ips-v6/", Reply::Ok(V6_BODY));
        transport
    }

    pub fn reply(&self, path: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(path.to_string(), reply);
    }

    /// Paths requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|p| p.as_str() == path).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, _config: &FetchConfig) -> Result<Body> {
        self.calls.lock().unwrap().push(path.to_string());

        let reply = self.replies.lock().unwrap().get(path).cloned();
        match reply {
            Some(Reply::Ok(text)) => Ok(Body::new(200, text)),
            Some(Reply::Status(status)) => Err(TransportError::bad_status(status, None).into()),
            Some(Reply::Network(msg)) => Err(Error::network(msg)),
            Some(Reply::Config(msg)) => Err(Error::config(msg)),
            None => Err(TransportError::bad_status(404, None).into()),
        }
    }

    fn origin(&self) -> &str {
        ORIGIN
    }
}

/// A memory cache that counts loads and stores and can be made to fail
#[derive(Clone, Default)]
pub struct CountingCacheStore {
    inner: MemoryCacheStore,
    loads: Arc<AtomicUsize>,
    stores: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl CountingCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    /// Make every subsequent load and store fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Write an entry directly, bypassing the counters
    pub async fn seed(&self, key: &str, value: NetworkList, ttl: Duration) {
        self.inner.store(key, value, ttl).await.unwrap();
    }

    pub async fn peek(&self, key: &str) -> Option<NetworkList> {
        self.inner.load(key).await.unwrap()
    }
}

#[async_trait]
impl CacheStore for CountingCacheStore {
    async fn load(&self, key: &str) -> Result<Option<NetworkList>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::cache("backend unavailable"));
        }
        self.inner.load(key).await
    }

    async fn store(&self, key: &str, value: NetworkList, ttl: Duration) -> Result<()> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::cache("backend unavailable"));
        }
        self.inner.store(key, value, ttl).await
    }

    fn single_flight(&self) -> bool {
        self.inner.single_flight()
    }
}

/// A warning sink that keeps every message
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl WarningSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Render a list for comparison
pub fn render<'a>(nets: impl IntoIterator<Item = &'a ipnet::IpNet>) -> Vec<String> {
    nets.into_iter().map(|n| n.to_string()).collect()
}

/// Assert a fallback warning of the documented shape
pub fn assert_fallback_warning(message: &str) {
    let prefix = format!("cloudflare-rails: error fetching ip addresses from {} (", ORIGIN);
    assert!(
        message.starts_with(&prefix),
        "unexpected warning prefix: {message}"
    );
    assert!(
        message.ends_with("), falling back to defaults"),
        "unexpected warning suffix: {message}"
    );
}
