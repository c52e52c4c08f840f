//! # resilient-fetch
//!
//! A rotating proxy fetch layer for reqwest.
//!
//! Requests are routed through a pool of public HTTP, SOCKS4 and SOCKS5
//! proxies that is reloaded from a remote list when stale. Failing proxies are
//! retried with the next one in rotation, and a final direct connection is
//! made once the retry budget runs out.

pub mod config;
pub mod error;
pub mod fetcher;
mod global;
pub mod middleware;
pub mod parser;
pub mod pool;
pub mod proxy;
pub mod request;
pub mod source;
pub mod transport;

pub use config::{ProxyPoolConfig, ProxyPoolConfigBuilder};
pub use error::{FetchError, SourceError};
pub use fetcher::ResilientFetcher;
pub use global::{fetch, setup_proxy_support, shared_fetcher};
pub use middleware::ProxyPoolMiddleware;
pub use parser::PageParser;
pub use pool::{ProxyPool, RefreshOutcome};
pub use proxy::{ProxyEndpoint, ProxyScheme, Route};
pub use request::FetchOptions;
pub use source::{FileListSource, ProxySource, RemoteListSource};
pub use transport::{ReqwestTransport, Transport};
