//! Error types for the resilient-fetch crate.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Error returned when a proxy list could not be loaded from its source.
///
/// These never reach callers of [`crate::ResilientFetcher::fetch`]; the pool
/// logs them and keeps its previous contents.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The list could not be downloaded.
    #[error("failed to download proxy list: {0}")]
    Http(#[from] reqwest::Error),

    /// The list server answered with a non-success status.
    #[error("proxy list source answered with status {0}")]
    Status(StatusCode),

    /// The list file could not be read.
    #[error("failed to read proxy list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error returned by a fetch.
///
/// Proxy-layer failures are absorbed by the retry loop, so a `FetchError`
/// coming out of a fetch describes either a request that could not be built
/// or the failure of the final direct attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure reported by reqwest.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The target URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The attempt did not finish within the per-attempt timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A proxy entry could not be turned into a reqwest proxy.
    #[error("invalid proxy {url}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request body cannot be replayed across attempts.
    #[error("request object is not cloneable, are you passing a streaming body?")]
    NotCloneable,

    /// The final response did not carry a success status.
    #[error("request failed with status {0}")]
    Status(StatusCode),

    /// The proxy list source could not be set up.
    #[error("proxy source unavailable: {0}")]
    Source(#[from] SourceError),

    /// A page parser rejected the fetched document.
    #[error("failed to parse page: {0}")]
    Parse(String),
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
