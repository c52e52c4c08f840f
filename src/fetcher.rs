//! Retrying fetcher that rotates through the proxy pool.

use crate::config::ProxyPoolConfig;
use crate::error::{FetchError, Result};
use crate::parser::PageParser;
use crate::pool::ProxyPool;
use crate::proxy::Route;
use crate::request::{self, FetchOptions};
use crate::transport::{ReqwestTransport, Transport};

use log::{info, warn};
use reqwest::header::HeaderMap;
use reqwest::{Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Position in the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    /// Proxy attempts still available.
    Attempting(usize),
    /// Budget spent, one direct attempt left.
    Fallback,
}

/// Whether a received status ends the retry loop.
fn is_ok_status(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// HTTP fetcher that routes requests through a shared proxy pool.
///
/// Every call tries up to `retry_budget` proxies, drawing a fresh one each
/// time, and then makes one direct attempt whose outcome is returned as-is.
#[derive(Clone)]
pub struct ResilientFetcher {
    pool: Arc<ProxyPool>,
    transport: Arc<dyn Transport>,
    default_headers: HeaderMap,
}

impl ResilientFetcher {
    /// Create a fetcher with its own pool and a reqwest transport.
    pub fn new(config: ProxyPoolConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.attempt_timeout)?);
        let pool = ProxyPool::new(config)?;
        Ok(Self::with_parts(pool, transport))
    }

    /// Create a fetcher sharing `pool` and executing through `transport`.
    pub fn with_parts(pool: Arc<ProxyPool>, transport: Arc<dyn Transport>) -> Self {
        let default_headers = request::default_headers(&pool.config.product_token);
        Self {
            pool,
            transport,
            default_headers,
        }
    }

    /// The pool this fetcher draws proxies from.
    pub fn pool(&self) -> &Arc<ProxyPool> {
        &self.pool
    }

    /// Fetch `url` with the given options.
    ///
    /// Only an invalid request or the failure of the final direct attempt
    /// produce an error; proxy failures are retried away.
    pub async fn fetch(&self, url: &str, options: FetchOptions) -> Result<Response> {
        let request = options.into_request(url)?;
        self.execute(request).await
    }

    /// GET `url` with default options.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.fetch(url, FetchOptions::default()).await
    }

    /// Fetch `url` and hand its body to `parser`.
    ///
    /// Fails with [`FetchError::Status`] when the final response is not a
    /// success.
    pub async fn fetch_page<P: PageParser>(&self, url: &str, parser: &P) -> Result<P::Output> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let html = response.text().await?;
        parser.parse(&html)
    }

    /// Run an already built request through the retry loop.
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        let merged = request::merge_headers(&self.default_headers, request.headers());
        *request.headers_mut() = merged;

        let budget = self.pool.config.retry_budget;
        let mut state = RetryState::Attempting(budget);

        loop {
            match state {
                RetryState::Attempting(0) => state = RetryState::Fallback,
                RetryState::Attempting(remaining) => {
                    let attempt = budget - remaining + 1;
                    let Some(endpoint) = self.pool.next().await else {
                        info!(
                            "No proxy available, using direct connection for {}",
                            request.url()
                        );
                        return self.attempt(request, &Route::Direct).await;
                    };

                    let route = Route::Proxy(endpoint);
                    info!("Using {} for {} (attempt {})", route, request.url(), attempt);

                    match self.attempt(clone_request(&request)?, &route).await {
                        Ok(response) if is_ok_status(response.status()) => return Ok(response),
                        Ok(response) => {
                            warn!(
                                "Request through {} failed with status {} (attempt {}), retrying",
                                route,
                                response.status(),
                                attempt
                            );
                        }
                        Err(e) => {
                            warn!(
                                "Request through {} failed (attempt {}): {}",
                                route, attempt, e
                            );
                        }
                    }
                    state = RetryState::Attempting(remaining - 1);
                }
                RetryState::Fallback => {
                    warn!(
                        "All {} proxy attempts failed for {}, using direct connection",
                        budget,
                        request.url()
                    );
                    return self.attempt(request, &Route::Direct).await;
                }
            }
        }
    }

    /// One network attempt bounded by the per-attempt timeout.
    async fn attempt(&self, request: Request, route: &Route) -> Result<Response> {
        let timeout = self.attempt_timeout();
        match tokio::time::timeout(timeout, self.transport.execute(request, route)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        }
    }

    fn attempt_timeout(&self) -> Duration {
        self.pool.config.attempt_timeout
    }
}

fn clone_request(request: &Request) -> Result<Request> {
    request.try_clone().ok_or(FetchError::NotCloneable)
}
