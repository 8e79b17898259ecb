// # Transport Trait
//
// One HTTPS GET against the fixed origin plus a relative path.
//
// ## Contract
//
// - Exactly one request per call: no retries, no redirects followed
// - Proxy selection and the shared connect/read timeout come from the
//   `FetchConfig` passed in
// - A 2xx response yields a `Body`; anything else is `TransportError::BadStatus`
// - DNS, connect, TLS and read failures (timeouts included) are
//   `TransportError::Network`
// - An unusable proxy setting is `Error::Config`
//
// ## Implementations
//
// - reqwest-based: `cloudflare-ips-http` crate
// - Tests: scripted transports in `tests/common`

use crate::config::FetchConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Successful response from the origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    /// HTTP status code (always 2xx)
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl Body {
    /// Create a response body
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }
}

/// Trait for transport implementations
///
/// Implementations must be thread-safe; one transport is shared by every
/// caller of the aggregator. Nothing may be held open between calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `origin() + path`
    ///
    /// # Parameters
    ///
    /// - `path`: relative path starting with `/`
    /// - `config`: proxy and timeout settings for this request
    ///
    /// # Returns
    ///
    /// - `Ok(Body)`: 2xx response
    /// - `Err(Error::Transport(_))`: network failure or non-2xx status
    /// - `Err(Error::Config(_))`: the proxy setting cannot be used
    async fn get(&self, path: &str, config: &FetchConfig) -> Result<Body>;

    /// Origin requests are sent to, e.g. `https://www.cloudflare.com`
    fn origin(&self) -> &str;
}
