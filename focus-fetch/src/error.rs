//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Network Error
// ============================================================================

/// Error raised by an [`HttpTransport`](crate::host::transport::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The response could not be read or had no usable body.
    #[error("Invalid response")]
    InvalidResponse,

    /// The server answered with a non-2xx status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Connection, TLS, or protocol failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,
}

impl NetworkError {
    /// Returns the HTTP status if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if let Some(status) = err.status() {
            NetworkError::HttpStatus(status.as_u16())
        } else {
            NetworkError::Transport(err.to_string())
        }
    }
}

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for a single fetch strategy.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network failure.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GraphQL endpoint reported errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Invalid response from the upstream.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Strategy not available.
    #[error("Strategy not available: {0}")]
    StrategyNotAvailable(String),

    /// All strategies failed or came back empty.
    #[error("All strategies failed")]
    AllStrategiesFailed,
}
