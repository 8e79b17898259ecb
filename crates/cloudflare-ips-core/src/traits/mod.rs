//! Collaborator traits
//!
//! The pipeline talks to the outside world only through these interfaces:
//!
//! - [`Transport`]: a single GET against the origin
//! - [`CacheStore`]: the host's key/value cache
//! - [`WarningSink`]: where the fallback warning goes

pub mod cache_store;
pub mod transport;
pub mod warning_sink;

pub use cache_store::CacheStore;
pub use transport::{Body, Transport};
pub use warning_sink::{TracingSink, WarningSink};
