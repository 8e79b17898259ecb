//! Fetch one published list: transport, then parser
//!
//! No caching happens here; see [`crate::CloudflareIps`] for that.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::parser;
use crate::traits::Transport;
use crate::types::{NetworkList, ResourceKind};

/// Composes a [`Transport`] with the parser
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    /// Create a fetcher over a transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Origin the transport talks to
    pub fn origin(&self) -> &str {
        self.transport.origin()
    }

    /// GET and parse the list for `kind`
    ///
    /// # Returns
    ///
    /// - `Ok(NetworkList)`: every entry of the published list, in order
    /// - `Err(Error::Transport(_))`: the GET failed
    /// - `Err(Error::Parse { .. })`: the body is not a valid list for `kind`
    /// - `Err(Error::Config(_))`: the proxy setting is unusable
    pub async fn fetch(&self, kind: ResourceKind, config: &FetchConfig) -> Result<NetworkList> {
        debug!("Fetching {} from {}{}", kind, self.origin(), kind.path());

        let body = self.transport.get(kind.path(), config).await?;
        let list =
            parser::parse(&body.text, kind.family()).map_err(|e| Error::parse(kind, e))?;

        info!("Fetched {} - {} ranges", kind, list.len());
        Ok(list)
    }
}
