//! Core proxy pool implementation.

use crate::config::ProxyPoolConfig;
use crate::error::SourceError;
use crate::proxy::{self, ProxyEndpoint};
use crate::source::{self, ProxySource};

use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a call to [`ProxyPool::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list was replaced with this many proxies.
    Replaced(usize),
    /// Another task is already refreshing.
    InFlight,
    /// The last successful refresh is younger than the staleness interval.
    Fresh,
    /// The last refresh failed less than `failure_backoff` ago.
    BackingOff,
    /// The source yielded no usable proxies; the old list was kept.
    Empty,
    /// The source could not be read; the old list was kept.
    Failed,
}

/// Mutable pool contents, always read and written under one lock.
struct PoolState {
    endpoints: Vec<ProxyEndpoint>,
    cursor: usize,
    last_refresh_at: Option<Instant>,
    last_failure_at: Option<Instant>,
}

impl PoolState {
    fn is_stale(&self, interval: Duration) -> bool {
        self.last_refresh_at
            .map_or(true, |at| at.elapsed() >= interval)
    }
}

/// Clears the refresh flag when dropped, including when the refreshing
/// future is cancelled mid-download.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A pool of proxies dispensed in round-robin order.
pub struct ProxyPool {
    /// Proxies, cursor and refresh timestamps.
    state: Mutex<PoolState>,
    /// Set while a refresh is downloading the list.
    refreshing: AtomicBool,
    /// Where the list comes from.
    source: Arc<dyn ProxySource>,
    /// Configuration for the pool.
    pub config: ProxyPoolConfig,
}

impl ProxyPool {
    /// Create an empty pool reading from the configured source.
    ///
    /// Nothing is downloaded here; the list is loaded on first use.
    pub fn new(config: ProxyPoolConfig) -> Result<Arc<Self>, SourceError> {
        let source = source::source_from_location(&config.source, config.source_timeout)?;
        Ok(Self::with_source(config, source))
    }

    /// Create an empty pool reading from a custom source.
    pub fn with_source(config: ProxyPoolConfig, source: Arc<dyn ProxySource>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PoolState {
                endpoints: Vec::new(),
                cursor: 0,
                last_refresh_at: None,
                last_failure_at: None,
            }),
            refreshing: AtomicBool::new(false),
            source,
            config,
        })
    }

    /// Reload the proxy list from the source.
    ///
    /// Skips the download when another refresh is running, when the list is
    /// still fresh, or while backing off after a failure. On success the list
    /// is swapped wholesale and the cursor reset; on failure nothing changes.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Proxy list refresh already in progress");
            return RefreshOutcome::InFlight;
        }
        let _guard = RefreshGuard(&self.refreshing);

        {
            let state = self.state.lock();
            if !state.is_stale(self.config.stale_interval) {
                return RefreshOutcome::Fresh;
            }
            if let Some(at) = state.last_failure_at {
                if at.elapsed() < self.config.failure_backoff {
                    return RefreshOutcome::BackingOff;
                }
            }
        }

        let location = self.source.location();
        let content = match self.source.fetch_list().await {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to fetch proxies from {}: {}", location, e);
                self.state.lock().last_failure_at = Some(Instant::now());
                return RefreshOutcome::Failed;
            }
        };

        let endpoints = proxy::parse_proxy_list(&content);
        let mut state = self.state.lock();
        if endpoints.is_empty() {
            warn!("Proxy list from {} contained no usable proxies", location);
            state.last_failure_at = Some(Instant::now());
            return RefreshOutcome::Empty;
        }

        let count = endpoints.len();
        state.endpoints = endpoints;
        state.cursor = 0;
        state.last_refresh_at = Some(Instant::now());
        state.last_failure_at = None;
        info!("Updated proxy list from {}: {} proxies available", location, count);
        RefreshOutcome::Replaced(count)
    }

    /// Hand out the next proxy in rotation.
    ///
    /// Refreshes first when the pool is empty or stale. `None` means no proxy
    /// is available and the caller should connect directly.
    pub async fn next(&self) -> Option<ProxyEndpoint> {
        let needs_refresh = {
            let state = self.state.lock();
            state.endpoints.is_empty() || state.is_stale(self.config.stale_interval)
        };
        if needs_refresh {
            self.refresh().await;
        }

        let mut state = self.state.lock();
        let len = state.endpoints.len();
        if len == 0 {
            return None;
        }
        let index = state.cursor;
        state.cursor = (index + 1) % len;

        let endpoint = &mut state.endpoints[index];
        endpoint.last_used_at = Some(Instant::now());
        Some(endpoint.clone())
    }

    /// Number of proxies currently in the pool.
    pub fn len(&self) -> usize {
        self.state.lock().endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the pool contents in rotation order.
    pub fn endpoints(&self) -> Vec<ProxyEndpoint> {
        self.state.lock().endpoints.clone()
    }

    /// When the list was last replaced successfully.
    pub fn last_refresh_at(&self) -> Option<Instant> {
        self.state.lock().last_refresh_at
    }
}
