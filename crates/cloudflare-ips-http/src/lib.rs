// # HTTP Transport
//
// This crate provides the reqwest-based `Transport` for cloudflare-ips-core.
//
// ## Behaviour
//
// - ✅ One GET per call against `origin + path`
// - ✅ Proxy from `proxy_server`, else `http_proxy`, else direct
// - ✅ The configured timeout bounds both connect and read
// - ✅ Non-2xx responses reported with status (and small bodies)
// - ❌ NO retries (a failed fetch falls back to the compiled-in list)
// - ❌ NO redirects (the published paths are stable)
// - ❌ NO connection reuse across calls (a client is built per request)

pub mod proxy;

use async_trait::async_trait;
use cloudflare_ips_core::error::MAX_ERROR_BODY_LEN;
use cloudflare_ips_core::{
    Body, CLOUDFLARE_ORIGIN, CloudflareIps, Error, FetchConfig, MemoryCacheStore, Result, Transport,
    TransportError,
};
use proxy::{HTTP_PROXY_ENV, ProxyChoice, select_proxy};
use std::error::Error as _;
use std::fmt;
use std::sync::Arc;

/// Looks up an environment variable
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    /// Scheme and host requests are sent to
    origin: String,

    /// Source of `http_proxy`, read on every request
    env: EnvLookup,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport against the Cloudflare origin
    pub fn new() -> Self {
        Self {
            origin: CLOUDFLARE_ORIGIN.to_string(),
            env: Arc::new(|name: &str| std::env::var(name).ok()),
        }
    }

    /// Send requests to another origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Read environment variables through `env` instead of the process
    pub fn with_env_lookup(
        mut self,
        env: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Build a client for one request
    fn client(&self, config: &FetchConfig) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(config.timeout)
            .read_timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("cloudflare-ips/", env!("CARGO_PKG_VERSION")));

        let env_proxy = (self.env)(HTTP_PROXY_ENV);
        if let ProxyChoice::Proxy(descriptor) =
            select_proxy(config.proxy_server(), env_proxy.as_deref())?
        {
            tracing::debug!(
                "Using proxy {}:{} (auth: {})",
                descriptor.host,
                descriptor.port,
                descriptor.user.is_some()
            );
            let proxy = reqwest::Proxy::all(descriptor.url.as_str()).map_err(|e| {
                Error::config(format!(
                    "unusable proxy {}:{}: {}",
                    descriptor.host, descriptor.port, e
                ))
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {}", describe(&e))))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, config: &FetchConfig) -> Result<Body> {
        let client = self.client(config)?;
        let url = format!("{}{}", self.origin, path);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::network(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response, MAX_ERROR_BODY_LEN).await;
            tracing::debug!("GET {} returned {}", url, status);
            return Err(TransportError::bad_status(status.as_u16(), body).into());
        }

        let text = response.text().await.map_err(|e| {
            Error::network(format!("failed to read response body: {}", describe(&e)))
        })?;

        Ok(Body::new(status.as_u16(), text))
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}

/// Read an error body of at most `limit` bytes
///
/// Stops once more than `limit` bytes have arrived; larger bodies are dropped.
async fn read_error_body(mut response: reqwest::Response, limit: usize) -> Option<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await.ok()? {
        buf.extend_from_slice(&chunk);
        if buf.len() > limit {
            return None;
        }
    }
    Some(String::from_utf8_lossy(&buf).into_owned())
}

/// Render a reqwest error with its causes, e.g. the timeout behind a send error
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Aggregator over the Cloudflare origin with an in-memory cache
///
/// Hosts bringing their own cache use [`CloudflareIps::new`] with an
/// [`HttpTransport`] instead.
pub fn default_client() -> CloudflareIps {
    CloudflareIps::new(
        Arc::new(HttpTransport::new()),
        Arc::new(MemoryCacheStore::new()),
    )
}
