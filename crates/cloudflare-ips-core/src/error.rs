//! Error types for the Cloudflare IP range pipeline
//!
//! Every stage of the fetch → parse → cache pipeline reports through [`Error`].
//! Transport and parse failures keep their own typed errors so callers can
//! tell a refused connection from a bad response body.

use crate::types::{Family, ResourceKind};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Bodies of non-2xx responses are only kept up to this many bytes
pub const MAX_ERROR_BODY_LEN: usize = 512;

/// Longest line excerpt carried by a [`ParseError`]
const MAX_SNIPPET_LEN: usize = 64;

/// Core error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The GET against the origin did not produce a usable response
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The response body was not a valid list of networks
    #[error("failed to parse {kind} list: {source}")]
    Parse {
        /// Which list was being parsed
        kind: ResourceKind,
        /// What was wrong with it
        source: ParseError,
    },

    /// The cache backend failed to load or store an entry
    #[error("cache error: {0}")]
    Cache(String),

    /// Operator configuration is missing or unusable
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a cache backend error
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network-level transport error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Transport(TransportError::Network(msg.into()))
    }

    /// Wrap a parse failure for the given list
    pub fn parse(kind: ResourceKind, source: ParseError) -> Self {
        Self::Parse { kind, source }
    }

    /// Whether the aggregator may mask this error with the fallback list
    ///
    /// Configuration errors are never masked: hiding them would hide
    /// misconfiguration behind a list that merely looks right.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// Failure of a single GET against the origin
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, connect, TLS or read failure, including timeouts
    #[error("network error: {0}")]
    Network(String),

    /// The origin answered with a status outside 2xx
    #[error("unexpected HTTP status {status}")]
    BadStatus {
        /// HTTP status code
        status: u16,
        /// Response body, only when it was small
        body: Option<String>,
    },
}

impl TransportError {
    /// Build a bad-status error, keeping the body only if it is short
    pub fn bad_status(status: u16, body: Option<String>) -> Self {
        let body = body.filter(|b| b.len() <= MAX_ERROR_BODY_LEN);
        Self::BadStatus { status, body }
    }
}

/// Failure to turn a response body into a network list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A non-blank line is not an IP network
    #[error("line {line}: invalid network {content:?}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// The offending line, truncated
        content: String,
    },

    /// A line parsed, but as the wrong address family
    #[error("line {line}: expected an {expected} network, got {content:?}")]
    FamilyMismatch {
        /// 1-based line number
        line: usize,
        /// Family the list was supposed to hold
        expected: Family,
        /// The offending line, truncated
        content: String,
    },
}

/// Cut a line down to a loggable excerpt
pub(crate) fn snippet(line: &str) -> String {
    match line.char_indices().nth(MAX_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
