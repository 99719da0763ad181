//! Mock transport for testing.
//!
//! Allows scripting responses per URL fragment and capturing every request
//! for verification. Clones share state, so a test can keep one handle while
//! the code under test owns another.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::transport::{HttpRequest, HttpTransport};
use crate::error::NetworkError;

/// A scripted response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// A 2xx response with this body.
    Body(Vec<u8>),
    /// A transport failure.
    Error(NetworkError),
}

impl MockResponse {
    /// A JSON body.
    pub fn json(value: &serde_json::Value) -> Self {
        Self::Body(value.to_string().into_bytes())
    }

    /// A raw text body.
    pub fn text(body: &str) -> Self {
        Self::Body(body.as_bytes().to_vec())
    }
}

#[derive(Debug)]
struct MockRoute {
    url_contains: String,
    body_contains: Option<String>,
    queue: VecDeque<MockResponse>,
    fallback: Option<MockResponse>,
}

impl MockRoute {
    fn matches(&self, request: &HttpRequest) -> bool {
        if !request.url.contains(&self.url_contains) {
            return false;
        }
        match &self.body_contains {
            Some(fragment) => request
                .body_text()
                .is_some_and(|body| body.contains(fragment.as_str())),
            None => true,
        }
    }

    fn specificity(&self) -> usize {
        self.url_contains.len() + self.body_contains.as_ref().map_or(0, String::len)
    }

    fn next(&mut self) -> Option<MockResponse> {
        self.queue.pop_front().or_else(|| self.fallback.clone())
    }
}

#[derive(Debug, Default)]
struct MockTransportInner {
    routes: Vec<MockRoute>,
    requests: Vec<HttpRequest>,
    delay: Option<Duration>,
}

/// Scripted [`HttpTransport`] that records every request.
///
/// Routes match when the request URL contains the route's fragment (and,
/// optionally, the body contains a body fragment). The most specific match
/// wins. Unmatched requests fail with HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockTransportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn route_mut(&self, url: &str, body: Option<&str>, f: impl FnOnce(&mut MockRoute)) {
        let mut inner = self.lock();
        let existing = inner
            .routes
            .iter_mut()
            .find(|r| r.url_contains == url && r.body_contains.as_deref() == body);
        match existing {
            Some(route) => f(route),
            None => {
                let mut route = MockRoute {
                    url_contains: url.to_string(),
                    body_contains: body.map(str::to_string),
                    queue: VecDeque::new(),
                    fallback: None,
                };
                f(&mut route);
                inner.routes.push(route);
            }
        }
    }

    /// Always answer requests whose URL contains `url` with `response`.
    pub fn respond(&self, url: &str, response: MockResponse) {
        self.route_mut(url, None, |r| r.fallback = Some(response));
    }

    /// Always answer with a JSON body.
    pub fn respond_json(&self, url: &str, value: &serde_json::Value) {
        self.respond(url, MockResponse::json(value));
    }

    /// Always fail with `error`.
    pub fn respond_error(&self, url: &str, error: NetworkError) {
        self.respond(url, MockResponse::Error(error));
    }

    /// Always answer requests whose URL contains `url` and body contains `body`.
    pub fn respond_when_body(&self, url: &str, body: &str, response: MockResponse) {
        self.route_mut(url, Some(body), |r| r.fallback = Some(response));
    }

    /// Queue a one-shot response; queued responses are used before the fallback.
    pub fn enqueue(&self, url: &str, response: MockResponse) {
        self.route_mut(url, None, |r| r.queue.push_back(response));
    }

    /// Delay every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    /// Get all requests that were executed, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Get requests whose URL contains `fragment`.
    pub fn requests_to(&self, fragment: &str) -> Vec<HttpRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.url.contains(fragment))
            .cloned()
            .collect()
    }

    /// Number of executed requests.
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// Clear all state (routes, captured requests, delay).
    pub fn reset(&self) {
        *self.lock() = MockTransportInner::default();
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, NetworkError> {
        let (response, delay) = {
            let mut inner = self.lock();
            inner.requests.push(request.clone());
            let delay = inner.delay;
            let route = inner
                .routes
                .iter_mut()
                .filter(|r| r.matches(&request))
                .fold(None::<&mut MockRoute>, |best, candidate| match best {
                    Some(b) if b.specificity() >= candidate.specificity() => Some(b),
                    _ => Some(candidate),
                });
            (route.and_then(MockRoute::next), delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match response {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Error(error)) => Err(error),
            None => Err(NetworkError::HttpStatus(404)),
        }
    }
}
