//! HTTP execution along a route.

use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use std::time::Duration;

use crate::error::{FetchError, Result};
use crate::proxy::Route;

/// Executes one request along one route.
///
/// Implementations report transport failures as errors and hand any received
/// response back unchanged, whatever its status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request, route: &Route) -> Result<Response>;
}

/// Transport backed by reqwest.
///
/// Direct requests share one client; proxied requests get a client built for
/// the chosen proxy.
pub struct ReqwestTransport {
    direct: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let direct = Route::Direct
            .configure(Client::builder().timeout(timeout))?
            .build()?;
        Ok(Self { direct, timeout })
    }

    fn client_for(&self, route: &Route) -> Result<Client> {
        match route {
            Route::Direct => Ok(self.direct.clone()),
            Route::Proxy(_) => {
                let builder = route.configure(Client::builder().timeout(self.timeout))?;
                builder.build().map_err(FetchError::from)
            }
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request, route: &Route) -> Result<Response> {
        let client = self.client_for(route)?;
        Ok(client.execute(request).await?)
    }
}
