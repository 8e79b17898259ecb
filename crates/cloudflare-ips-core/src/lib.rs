// # cloudflare-ips-core
//
// Fetch, parse, cache and fall back for the IP ranges Cloudflare publishes,
// so a host can recognize requests that came through Cloudflare's edge.
//
// ## Architecture Overview
//
// - **Transport**: Trait for the single GET against the origin
// - **parser**: Newline-delimited CIDR text → typed `NetworkList`
// - **Fetcher**: Transport + parser for one `ResourceKind`
// - **CacheStore / CacheAdapter**: Pluggable TTL cache with get-or-compute
// - **CloudflareIps**: Public entry point, memoization and fallback
// - **FallbackIps**: Compiled-in ranges used when nothing live is available
//
// ## Design Principles
//
// 1. **Explicit configuration**: Every call takes a `FetchConfig`; nothing is read from globals
// 2. **Typed failures**: The pipeline returns `Result`, the aggregator picks the fallback by matching
// 3. **Never cache garbage**: Only fully parsed lists reach the cache or the memo slot
// 4. **Library-first**: No network code here; `cloudflare-ips-http` supplies the transport

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod parser;
pub mod traits;
pub mod types;

// Re-export core types for convenience
pub use aggregator::CloudflareIps;
pub use cache::{CacheAdapter, MemoryCacheStore};
pub use config::FetchConfig;
pub use error::{Error, ParseError, Result, TransportError};
pub use fallback::FallbackIps;
pub use fetcher::Fetcher;
pub use traits::{Body, CacheStore, TracingSink, Transport, WarningSink};
pub use types::{
    AggregateList, CACHE_NAMESPACE, CLOUDFLARE_ORIGIN, Family, NetworkList, ResourceKind,
};
