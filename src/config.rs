//! Configuration for the proxy pool and the fetcher.

use std::time::Duration;

/// Proxy list fetched when no other source is configured.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/monosans/proxy-list/main/proxies/all.txt";

/// Product identifier prepended to the User-Agent of every request.
pub const DEFAULT_PRODUCT_TOKEN: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Configuration for the proxy pool.
#[derive(Debug, Clone)]
pub struct ProxyPoolConfig {
    /// Where the proxy list comes from: an `http(s)` URL or a local file path.
    pub source: String,
    /// Minimum time between successful list refreshes.
    pub stale_interval: Duration,
    /// Minimum time between a failed refresh and the next attempt.
    pub failure_backoff: Duration,
    /// Number of proxy attempts before falling back to a direct connection.
    pub retry_budget: usize,
    /// Timeout applied to every single network attempt.
    pub attempt_timeout: Duration,
    /// Timeout for downloading the proxy list.
    pub source_timeout: Duration,
    /// Product identifier placed at the front of the User-Agent.
    pub product_token: String,
}

impl ProxyPoolConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProxyPoolConfigBuilder {
        ProxyPoolConfigBuilder::new()
    }
}

impl Default for ProxyPoolConfig {
    fn default() -> Self {
        ProxyPoolConfigBuilder::new().build()
    }
}

/// Builder for `ProxyPoolConfig`.
pub struct ProxyPoolConfigBuilder {
    source: Option<String>,
    stale_interval: Option<Duration>,
    failure_backoff: Option<Duration>,
    retry_budget: Option<usize>,
    attempt_timeout: Option<Duration>,
    source_timeout: Option<Duration>,
    product_token: Option<String>,
}

impl ProxyPoolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            source: None,
            stale_interval: None,
            failure_backoff: None,
            retry_budget: None,
            attempt_timeout: None,
            source_timeout: None,
            product_token: None,
        }
    }

    /// Set the URL or file path the proxy list is read from.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the proxy-list refresh period.
    pub fn stale_interval(mut self, interval: Duration) -> Self {
        self.stale_interval = Some(interval);
        self
    }

    /// Set how long a failed refresh blocks further refresh attempts.
    pub fn failure_backoff(mut self, backoff: Duration) -> Self {
        self.failure_backoff = Some(backoff);
        self
    }

    /// Set the number of proxy attempts made before the direct fallback.
    pub fn retry_budget(mut self, budget: usize) -> Self {
        self.retry_budget = Some(budget);
        self
    }

    /// Set the per-attempt timeout.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Set the timeout for downloading the proxy list.
    pub fn source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = Some(timeout);
        self
    }

    /// Set the product identifier used in the User-Agent.
    pub fn product_token(mut self, token: impl Into<String>) -> Self {
        self.product_token = Some(token.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ProxyPoolConfig {
        ProxyPoolConfig {
            source: self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            stale_interval: self.stale_interval.unwrap_or(Duration::from_secs(30 * 60)),
            failure_backoff: self.failure_backoff.unwrap_or(Duration::ZERO),
            retry_budget: self.retry_budget.unwrap_or(3),
            attempt_timeout: self.attempt_timeout.unwrap_or(Duration::from_secs(10)),
            source_timeout: self.source_timeout.unwrap_or(Duration::from_secs(15)),
            product_token: self
                .product_token
                .unwrap_or_else(|| DEFAULT_PRODUCT_TOKEN.to_string()),
        }
    }
}

impl Default for ProxyPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyPoolConfig::default();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.stale_interval, Duration::from_secs(1800));
        assert_eq!(config.failure_backoff, Duration::ZERO);
        assert_eq!(config.retry_budget, 3);
        assert!(config.product_token.starts_with("resilient-fetch/"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ProxyPoolConfig::builder()
            .source("proxies.txt")
            .stale_interval(Duration::from_secs(60))
            .retry_budget(5)
            .attempt_timeout(Duration::from_secs(2))
            .product_token("Scraper/2.0")
            .build();
        assert_eq!(config.source, "proxies.txt");
        assert_eq!(config.stale_interval, Duration::from_secs(60));
        assert_eq!(config.retry_budget, 5);
        assert_eq!(config.attempt_timeout, Duration::from_secs(2));
        assert_eq!(config.product_token, "Scraper/2.0");
    }
}
