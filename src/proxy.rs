//! Proxy endpoints and request routing.

use std::fmt;
use std::time::Instant;

use reqwest::ClientBuilder;
use url::Url;

use crate::error::FetchError;

/// Protocol spoken by a proxy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyScheme {
    /// HTTP(S) CONNECT proxy.
    Http,
    /// SOCKS4 proxy.
    Socks4,
    /// SOCKS5 proxy.
    Socks5,
}

impl ProxyScheme {
    /// Split a known scheme prefix off `line`.
    fn strip(line: &str) -> Option<(Self, &str)> {
        const PREFIXES: [(&str, ProxyScheme); 4] = [
            ("socks5://", ProxyScheme::Socks5),
            ("socks4://", ProxyScheme::Socks4),
            ("http://", ProxyScheme::Http),
            ("https://", ProxyScheme::Http),
        ];
        PREFIXES.iter().find_map(|(prefix, scheme)| {
            line.strip_prefix(prefix).map(|rest| (*scheme, rest))
        })
    }
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyScheme::Http => f.write_str("http"),
            ProxyScheme::Socks4 => f.write_str("socks4"),
            ProxyScheme::Socks5 => f.write_str("socks5"),
        }
    }
}

/// Representation of a proxy server.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    /// Protocol spoken by the proxy.
    pub scheme: ProxyScheme,
    /// Host and port, with optional credentials (e.g. "user:pass@1.2.3.4:1080").
    pub address: String,
    /// Full connection URL (e.g. "socks5://1.2.3.4:1080").
    pub url: String,
    /// When the pool last handed this endpoint out.
    pub last_used_at: Option<Instant>,
}

impl ProxyEndpoint {
    /// Parse one line of a proxy list.
    ///
    /// Returns `None` for blank lines and for anything that does not name a
    /// network endpoint. Lines without a scheme are treated as HTTP proxies.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (scheme, url, address) = match ProxyScheme::strip(line) {
            Some((scheme, rest)) => (scheme, line.to_string(), rest.to_string()),
            None => (ProxyScheme::Http, format!("http://{}", line), line.to_string()),
        };

        if address.is_empty() {
            return None;
        }
        let parsed = Url::parse(&url).ok()?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return None;
        }

        Some(Self {
            scheme,
            address,
            url,
            last_used_at: None,
        })
    }

    /// Convert the endpoint to a reqwest::Proxy covering all schemes.
    pub fn to_reqwest_proxy(&self) -> Result<reqwest::Proxy, FetchError> {
        reqwest::Proxy::all(&self.url).map_err(|source| FetchError::InvalidProxy {
            url: self.url.clone(),
            source,
        })
    }
}

impl PartialEq for ProxyEndpoint {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.url == other.url
    }
}

impl Eq for ProxyEndpoint {}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Parse a newline-delimited proxy list, dropping unusable lines.
pub fn parse_proxy_list(content: &str) -> Vec<ProxyEndpoint> {
    content.lines().filter_map(ProxyEndpoint::parse).collect()
}

/// How a single attempt reaches the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Connect to the target without any proxy.
    Direct,
    /// Tunnel through the given proxy endpoint.
    Proxy(ProxyEndpoint),
}

impl Route {
    /// Configure a client builder so its requests follow this route.
    pub fn configure(&self, builder: ClientBuilder) -> Result<ClientBuilder, FetchError> {
        match self {
            Route::Direct => Ok(builder.no_proxy()),
            Route::Proxy(endpoint) => Ok(builder.proxy(endpoint.to_reqwest_proxy()?)),
        }
    }

    /// The proxy used by this route, if any.
    pub fn endpoint(&self) -> Option<&ProxyEndpoint> {
        match self {
            Route::Direct => None,
            Route::Proxy(endpoint) => Some(endpoint),
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Route::Direct)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct => f.write_str("direct"),
            Route::Proxy(endpoint) => write!(f, "{} proxy {}", endpoint.scheme, endpoint.url),
        }
    }
}
