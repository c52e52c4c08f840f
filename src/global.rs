//! Process-wide fetcher behind the free functions.

use crate::config::ProxyPoolConfig;
use crate::error::Result;
use crate::fetcher::ResilientFetcher;
use crate::pool::RefreshOutcome;
use crate::request::FetchOptions;

use log::{info, warn};
use reqwest::Response;
use std::sync::OnceLock;

static SHARED: OnceLock<ResilientFetcher> = OnceLock::new();

/// The fetcher shared by [`fetch`] and [`setup_proxy_support`], created with
/// the default configuration on first use.
pub fn shared_fetcher() -> Result<&'static ResilientFetcher> {
    if let Some(fetcher) = SHARED.get() {
        return Ok(fetcher);
    }
    let fetcher = ResilientFetcher::new(ProxyPoolConfig::default())?;
    Ok(SHARED.get_or_init(|| fetcher))
}

/// Fetch `url` through the shared proxy pool.
///
/// See [`ResilientFetcher::fetch`].
pub async fn fetch(url: &str, options: FetchOptions) -> Result<Response> {
    shared_fetcher()?.fetch(url, options).await
}

/// Start loading the shared proxy list in the background.
///
/// Best-effort: failures are logged and never returned. Must be called from
/// within a Tokio runtime to have any effect.
pub fn setup_proxy_support() {
    let fetcher = match shared_fetcher() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            warn!("Failed to initialize proxy support: {}", e);
            return;
        }
    };
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(e) => {
            warn!("Failed to initialize proxy support: {}", e);
            return;
        }
    };

    let pool = fetcher.pool().clone();
    handle.spawn(async move {
        match pool.refresh().await {
            RefreshOutcome::Replaced(count) => {
                info!("Proxy support ready with {} proxies", count)
            }
            outcome => warn!("Proxy pool not populated at startup: {:?}", outcome),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_outside_runtime_does_not_panic() {
        setup_proxy_support();
    }

    #[test]
    fn test_shared_fetcher_is_reused() {
        let first = shared_fetcher().unwrap() as *const ResilientFetcher;
        let second = shared_fetcher().unwrap() as *const ResilientFetcher;
        assert_eq!(first, second);
    }
}
