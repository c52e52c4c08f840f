//! Simple example of using resilient-fetch.

use reqwest_middleware::ClientBuilder;
use resilient_fetch::{FetchOptions, ProxyPoolConfig, ProxyPoolMiddleware, ResilientFetcher};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Warm up the shared pool while the rest of the program starts.
    resilient_fetch::setup_proxy_support();

    println!("Sending request through the shared pool...");
    let response = resilient_fetch::fetch("https://httpbin.org/ip", FetchOptions::default()).await?;
    println!("Status: {}", response.status());
    println!("Response: {}", response.text().await?);

    let config = ProxyPoolConfig::builder()
        // free socks5 proxy list, one `host:port` per line
        .source("https://cdn.jsdelivr.net/gh/proxifly/free-proxy-list@main/proxies/protocols/socks5/data.txt")
        .attempt_timeout(Duration::from_secs(5))
        .retry_budget(2)
        .build();

    let fetcher = ResilientFetcher::new(config)?;
    let client = ClientBuilder::new(reqwest::Client::new())
        .with(ProxyPoolMiddleware::from_fetcher(fetcher))
        .build();

    println!("Sending request through the middleware...");
    let response = client.get("https://httpbin.org/headers").send().await?;
    println!("Status: {}", response.status());
    println!("Response: {}", response.text().await?);

    Ok(())
}
