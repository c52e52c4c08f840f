//! Request options and default headers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Body, Method, Request};
use url::Url;

use crate::error::Result;

/// Browser identity appended after the product token.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Per-call options for a fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// HTTP method, `GET` unless set.
    pub method: Method,
    /// Headers that override the defaults on key collision.
    pub headers: HeaderMap,
    /// Request body, replayed on every attempt.
    pub body: Option<Vec<u8>>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header, replacing any earlier value for the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace all caller headers.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build a replayable request for `url`.
    pub(crate) fn into_request(self, url: &str) -> Result<Request> {
        let mut request = Request::new(self.method, Url::parse(url)?);
        *request.headers_mut() = self.headers;
        if let Some(body) = self.body {
            *request.body_mut() = Some(Body::from(body));
        }
        Ok(request)
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Default headers sent with every request.
///
/// The User-Agent starts with `product_token` followed by a browser identity.
pub fn default_headers(product_token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let user_agent = format!("{} {}", product_token, BROWSER_USER_AGENT);
    let user_agent = HeaderValue::from_str(&user_agent)
        .unwrap_or_else(|_| HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(USER_AGENT, user_agent);
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE));
    headers
}

/// Layer `overrides` over `defaults`; every name present in `overrides`
/// replaces all default values for that name.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    merged.extend(overrides.clone());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_default_user_agent_carries_product() {
        let headers = default_headers("NekoScraper/1.5.1");
        let user_agent = headers.get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(user_agent.starts_with("NekoScraper/1.5.1 Mozilla/5.0"));
        assert!(headers.contains_key(ACCEPT));
    }

    #[test]
    fn test_invalid_product_token_falls_back() {
        let headers = default_headers("bad\ntoken");
        assert_eq!(headers.get(USER_AGENT).unwrap(), BROWSER_USER_AGENT);
    }

    #[test]
    fn test_caller_headers_win() {
        let defaults = default_headers("Test/1.0");
        let mut overrides = HeaderMap::new();
        overrides.insert(USER_AGENT, HeaderValue::from_static("custom"));
        overrides.insert("x-extra", HeaderValue::from_static("1"));

        let merged = merge_headers(&defaults, &overrides);
        assert_eq!(merged.get(USER_AGENT).unwrap(), "custom");
        assert_eq!(merged.get_all(USER_AGENT).iter().count(), 1);
        assert_eq!(merged.get("x-extra").unwrap(), "1");
        assert_eq!(merged.get(ACCEPT_LANGUAGE).unwrap(), DEFAULT_ACCEPT_LANGUAGE);
    }

    #[test]
    fn test_into_request() {
        let options = FetchOptions::new()
            .method(Method::POST)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body("q=1");
        let request = assert_ok!(options.into_request("https://example.com/search"));
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), "https://example.com/search");
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "application/json");
        assert!(request.try_clone().is_some());
    }

    #[test]
    fn test_into_request_rejects_bad_url() {
        assert!(FetchOptions::new().into_request("not a url").is_err());
    }
}
