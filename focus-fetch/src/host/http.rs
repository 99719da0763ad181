//! HTTP client with tracing, diagnostics, and domain allowlist.
//!
//! This module provides the production [`HttpTransport`], which adds:
//! - Request/response tracing
//! - Structured diagnostic records with redacted headers
//! - Domain allowlist for security

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

use super::diagnostics::{self, DiagnosticSink};
use super::transport::{HttpMethod, HttpRequest, HttpTransport, USER_AGENT};
use crate::error::NetworkError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed transport with tracing and an optional domain allowlist.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| NetworkError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
            diagnostics: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Sends request/response records to `sink`.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), NetworkError> {
        let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| NetworkError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(NetworkError::DomainNotAllowed(host.to_string()))
        }
    }

    fn record(&self, entry: diagnostics::DiagnosticEntry) {
        if let Some(sink) = &self.diagnostics {
            sink.record(entry);
        }
    }

    fn build(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = match request.method {
            HttpMethod::Get => self.inner.get(&request.url),
            HttpMethod::Post => self.inner.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        builder
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("allowed_domains", &self.allowed_domains)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, NetworkError> {
        self.is_domain_allowed(&request.url)?;
        self.record(diagnostics::request_entry(&request));
        debug!("Sending request");

        let start = Instant::now();
        let response = match self.build(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = NetworkError::from(e);
                warn!(error = %error, "Request failed");
                self.record(diagnostics::failure_entry(
                    &request,
                    &error.to_string(),
                    start.elapsed(),
                ));
                return Err(error);
            }
        };

        let status = response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                warn!(error = %e, "Failed to read response body");
                self.record(diagnostics::failure_entry(
                    &request,
                    &e.to_string(),
                    start.elapsed(),
                ));
                return Err(NetworkError::InvalidResponse);
            }
        };

        let elapsed = start.elapsed();
        debug!(status = %status, bytes = body.len(), elapsed = ?elapsed, "Response received");
        self.record(diagnostics::response_entry(
            &request,
            status.as_u16(),
            &headers,
            &body,
            elapsed,
        ));

        if !status.is_success() {
            return Err(NetworkError::HttpStatus(status.as_u16()));
        }
        Ok(body)
    }
}

// ============================================================================
// Tests
// ============================================================================
