#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::{Request, Response};
use resilient_fetch::error::Result;
use resilient_fetch::{FetchError, ProxySource, Route, SourceError, Transport};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Proxy list served from memory.
pub struct StaticSource {
    content: String,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(content: &str) -> Arc<Self> {
        Arc::new(Self {
            content: content.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProxySource for StaticSource {
    async fn fetch_list(&self) -> std::result::Result<String, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.content.clone())
    }

    fn location(&self) -> &str {
        "memory"
    }
}

/// What the scripted transport does for one call.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Answer with this status.
    Status(u16),
    /// Fail as if the connection broke.
    Fail,
    /// Never answer.
    Hang,
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct Call {
    pub route: Route,
    pub url: String,
    pub headers: HeaderMap,
}

/// Transport replaying a script of outcomes; unscripted calls answer 200.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(steps: &[Step]) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.iter().copied().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn routes(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|call| match call.route.endpoint() {
                Some(endpoint) => endpoint.url.clone(),
                None => "direct".to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: Request, route: &Route) -> Result<Response> {
        self.calls.lock().push(Call {
            route: route.clone(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
        });
        let step = self.steps.lock().pop_front().unwrap_or(Step::Status(200));

        match step {
            Step::Status(code) => {
                let body = if route.is_direct() { "direct" } else { "proxied" };
                let response = http::Response::builder().status(code).body(body).unwrap();
                Ok(Response::from(response))
            }
            Step::Fail => Err(FetchError::Timeout(Duration::from_millis(1))),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("hanging attempt outlived its timeout")
            }
        }
    }
}
