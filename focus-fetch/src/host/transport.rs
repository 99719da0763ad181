//! The pluggable HTTP transport seam.
//!
//! Every network call in Focus goes through [`HttpTransport::execute`],
//! which takes a plain request description and hands back the response
//! body. Tests swap in [`MockTransport`](super::mock::MockTransport).

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::error::NetworkError;

/// Default `Accept`/`Content-Type` for JSON endpoints.
pub const APPLICATION_JSON: &str = "application/json";

/// User agent string for Focus.
pub const USER_AGENT: &str = concat!("Focus/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Request
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
}

impl HttpMethod {
    /// Returns the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-agnostic HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Optional body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body and `Content-Type` set.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidResponse`] if the body cannot be serialized.
    pub fn post_json<T: Serialize + ?Sized>(
        url: impl Into<String>,
        body: &T,
    ) -> Result<Self, NetworkError> {
        let bytes = serde_json::to_vec(body).map_err(|_| NetworkError::InvalidResponse)?;
        Ok(Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(bytes),
        }
        .header("Content-Type", APPLICATION_JSON))
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds `Accept: application/json` and the Focus user agent.
    #[must_use]
    pub fn accept_json(self) -> Self {
        self.header("Accept", APPLICATION_JSON)
            .header("User-Agent", USER_AGENT)
    }

    /// Returns the first header value matching `name`, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body as UTF-8 text, if any.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Executes HTTP requests.
///
/// Implementations return the raw body for 2xx responses and
/// [`NetworkError::HttpStatus`] for anything else.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes a request and returns the response body.
    async fn execute(&self, request: HttpRequest) -> Result<Vec<u8>, NetworkError>;
}
