//! Minimal embedding example
//!
//! Reads `FetchConfig` from the environment, prints the current Cloudflare
//! ranges, then asks again to show the memoized answer.
//!
//! ```bash
//! export CLOUDFLARE_TIMEOUT=3
//! export CLOUDFLARE_EXPIRES_IN=3600
//! export CLOUDFLARE_IPS_LOG_LEVEL=debug
//! cargo run -p cloudflare-ips-demos --bin fetch_ips
//! ```

use anyhow::{Context, Result};
use cloudflare_ips_core::FetchConfig;
use std::env;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let level = env::var("CLOUDFLARE_IPS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = FetchConfig::from_env().context("Invalid CLOUDFLARE_* configuration")?;
    info!(
        "Fetching Cloudflare ranges (timeout={:?}, expires_in={:?}, proxy={})",
        config.timeout,
        config.expires_in,
        config.proxy_server().is_some()
    );

    let ips = cloudflare_ips_http::default_client();

    let ranges = ips.cloudflare_ips(&config, false).await?;
    info!("{} IPv4 and {} IPv6 ranges", ranges.v4().len(), ranges.v6().len());
    for net in &ranges {
        println!("{}", net);
    }

    let again = ips.cloudflare_ips(&config, false).await?;
    info!("Second call served from memory: {}", again.ptr_eq(&ranges));

    Ok(())
}
