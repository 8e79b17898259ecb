//! Outbound proxy selection
//!
//! First match wins:
//!
//! 1. `proxy_server` from the host configuration, when non-empty
//! 2. the `http_proxy` environment variable, when non-empty
//! 3. a direct connection

use cloudflare_ips_core::{Error, Result};
use reqwest::Url;

/// Environment variable consulted when no proxy is configured
pub const HTTP_PROXY_ENV: &str = "http_proxy";

/// How requests leave the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyChoice {
    Direct,
    Proxy(ProxyDescriptor),
}

/// A parsed proxy URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub url: Url,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ProxyDescriptor {
    /// Parse a proxy URL, requiring an http(s) scheme and a host
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| Error::config(format!("invalid proxy URL {:?}: {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported proxy scheme {:?} in {:?}",
                url.scheme(),
                raw
            )));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::config(format!("proxy URL {:?} has no host", raw)))?
            .to_string();
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::config(format!("proxy URL {:?} has no port", raw)))?;
        let user = Some(url.username().to_string()).filter(|u| !u.is_empty());
        let password = url.password().map(str::to_string).filter(|p| !p.is_empty());

        Ok(Self {
            url,
            host,
            port,
            user,
            password,
        })
    }
}

/// Pick the proxy for a request
///
/// # Parameters
///
/// - `proxy_server`: configured proxy URL, if any
/// - `http_proxy_env`: value of `http_proxy`, if set
///
/// # Returns
///
/// - `Ok(ProxyChoice)`: the selected route
/// - `Err(Error::Config(_))`: the selected URL cannot be used
pub fn select_proxy(
    proxy_server: Option<&str>,
    http_proxy_env: Option<&str>,
) -> Result<ProxyChoice> {
    let non_empty = |s: &&str| !s.trim().is_empty();

    match proxy_server.filter(non_empty).or(http_proxy_env.filter(non_empty)) {
        Some(raw) => ProxyDescriptor::parse(raw).map(ProxyChoice::Proxy),
        None => Ok(ProxyChoice::Direct),
    }
}
