//! Middleware implementation for reqwest.

use crate::config::ProxyPoolConfig;
use crate::error::FetchError;
use crate::fetcher::ResilientFetcher;

use anyhow::anyhow;
use async_trait::async_trait;
use log::info;
use reqwest_middleware::{Error, Middleware, Next, Result};

/// Middleware that sends every request through the resilient fetcher.
///
/// The inner client of the middleware stack is not used; proxied and direct
/// attempts are issued by the fetcher's own transport.
#[derive(Clone)]
pub struct ProxyPoolMiddleware {
    fetcher: ResilientFetcher,
}

impl ProxyPoolMiddleware {
    /// Create a middleware with its own pool built from `config`.
    pub fn new(config: ProxyPoolConfig) -> Result<Self> {
        let fetcher = ResilientFetcher::new(config).map_err(into_middleware_error)?;
        info!(
            "Proxy pool middleware ready, proxies from {}",
            fetcher.pool().config.source
        );
        Ok(Self { fetcher })
    }

    /// Wrap an existing fetcher, sharing its pool.
    pub fn from_fetcher(fetcher: ResilientFetcher) -> Self {
        Self { fetcher }
    }
}

fn into_middleware_error(error: FetchError) -> Error {
    match error {
        FetchError::Http(e) => Error::Reqwest(e),
        other => Error::Middleware(anyhow!(other)),
    }
}

#[async_trait]
impl Middleware for ProxyPoolMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        _extensions: &mut http::Extensions,
        _next: Next<'_>,
    ) -> Result<reqwest::Response> {
        self.fetcher
            .execute(req)
            .await
            .map_err(into_middleware_error)
    }
}
