//! Operator configuration for fetching
//!
//! The host reads its own configuration surface and hands a [`FetchConfig`]
//! to every call. The recognized options are `proxy_server`, `timeout` and
//! `expires_in`; durations are given in seconds.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::time::Duration;

/// Environment variable holding the outbound proxy URL
pub const ENV_PROXY_SERVER: &str = "CLOUDFLARE_PROXY_SERVER";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT: &str = "CLOUDFLARE_TIMEOUT";
/// Environment variable holding the cache TTL in seconds
pub const ENV_EXPIRES_IN: &str = "CLOUDFLARE_EXPIRES_IN";

/// Network and cache settings for one operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Outbound proxy URL, overriding `http_proxy` when non-empty
    pub proxy_server: Option<String>,

    /// Applied to both connection establishment and response read
    #[serde(with = "seconds")]
    pub timeout: Duration,

    /// TTL of each cached list
    #[serde(with = "seconds")]
    pub expires_in: Duration,
}

impl FetchConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            proxy_server: None,
            timeout: default_timeout(),
            expires_in: default_expires_in(),
        }
    }

    /// Set the outbound proxy URL
    pub fn with_proxy_server(mut self, proxy_server: impl Into<String>) -> Self {
        self.proxy_server = Some(proxy_server.into());
        self
    }

    /// Set the connect/read timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the cache TTL
    pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// The proxy URL, if one is set and non-empty
    pub fn proxy_server(&self) -> Option<&str> {
        self.proxy_server.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Build from a JSON-like host configuration value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("invalid cloudflare configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `CLOUDFLARE_*` environment variables
    ///
    /// Unset variables keep their defaults. A set but unparseable number is
    /// an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(proxy) = env::var(ENV_PROXY_SERVER) {
            config.proxy_server = Some(proxy);
        }
        if let Ok(raw) = env::var(ENV_TIMEOUT) {
            config.timeout = parse_seconds(ENV_TIMEOUT, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_EXPIRES_IN) {
            config.expires_in = parse_seconds(ENV_EXPIRES_IN, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::config("timeout must be > 0"));
        }
        if self.expires_in.is_zero() {
            return Err(Error::config("expires_in must be > 0"));
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_expires_in() -> Duration {
    Duration::from_secs(12 * 60 * 60)
}

fn parse_seconds(name: &str, raw: &str) -> Result<Duration> {
    let secs: f64 = raw.trim().parse().map_err(|_| {
        Error::config(format!("{} must be a number of seconds, got {:?}", name, raw))
    })?;
    Duration::try_from_secs_f64(secs).map_err(|_| {
        Error::config(format!("{} must be a non-negative duration, got {}", name, raw))
    })
}

/// Durations as (possibly fractional) seconds
mod seconds {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.proxy_server, None);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.expires_in, Duration::from_secs(43_200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_value() {
        let config = FetchConfig::from_value(json!({
            "proxy_server": "http://proxy.internal:3128",
            "timeout": 2.5,
            "expires_in": 3600
        }))
        .unwrap();

        assert_eq!(config.proxy_server(), Some("http://proxy.internal:3128"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.expires_in, Duration::from_secs(3600));
    }

    #[test]
    fn test_from_value_fills_defaults() {
        let config = FetchConfig::from_value(json!({ "timeout": 1 })).unwrap();
        assert_eq!(config.expires_in, default_expires_in());
        assert_eq!(config.proxy_server, None);
    }

    #[test]
    fn test_non_numeric_timeout_is_config_error() {
        let err = FetchConfig::from_value(json!({ "timeout": "soon" })).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_negative_timeout_is_config_error() {
        let err = FetchConfig::from_value(json!({ "timeout": -1 })).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unknown_option_is_config_error() {
        let err = FetchConfig::from_value(json!({ "retries": 3 })).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_durations_rejected() {
        let config = FetchConfig::new().with_timeout(Duration::ZERO);
        assert!(config.validate().is_err());

        let config = FetchConfig::new().with_expires_in(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_proxy_server_is_unset() {
        let config = FetchConfig::new().with_proxy_server("  ");
        assert_eq!(config.proxy_server(), None);
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("T", " 10 ").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_seconds("T", "0.25").unwrap(), Duration::from_millis(250));
        assert!(parse_seconds("T", "ten").is_err());
        assert!(parse_seconds("T", "-3").is_err());
    }
}
