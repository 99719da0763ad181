//! LeetCode-specific errors.

use focus_fetch::{FetchError, NetworkError};
use thiserror::Error;

// ============================================================================
// Client Error
// ============================================================================

/// Errors from the REST and GraphQL clients.
#[derive(Debug, Error)]
pub enum LeetCodeError {
    /// A URL could not be built for the request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The upstream answered without the expected data.
    #[error("No data in response")]
    NoData,

    /// The response body could not be decoded.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// The request payload could not be encoded.
    #[error("Invalid payload")]
    InvalidPayload,

    /// GraphQL endpoint reported errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Transport failure.
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl From<serde_json::Error> for LeetCodeError {
    fn from(err: serde_json::Error) -> Self {
        LeetCodeError::Decoding(err.to_string())
    }
}

impl From<LeetCodeError> for FetchError {
    fn from(err: LeetCodeError) -> Self {
        match err {
            LeetCodeError::Network(e) => FetchError::Network(e),
            LeetCodeError::GraphQl(message) => FetchError::GraphQl(message),
            other => FetchError::InvalidResponse(other.to_string()),
        }
    }
}

// ============================================================================
// Submission Error
// ============================================================================

/// Errors from the submit-and-poll flow. All reach the caller verbatim.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// No usable session; the user must sign in.
    #[error("LeetCode login required")]
    MissingAuth,

    /// The submit or check URL could not be built.
    #[error("Invalid submission URL: {0}")]
    InvalidUrl(String),

    /// The submit response carried no submission id.
    #[error("Invalid response from LeetCode")]
    InvalidResponse,

    /// LeetCode rejected the submission or sent unreadable data.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// Judging did not finish within the poll budget.
    #[error("Timed out waiting for LeetCode to judge the submission")]
    Timeout,

    /// The caller cancelled the poll loop.
    #[error("Submission polling cancelled")]
    Cancelled,

    /// Transport failure.
    #[error(transparent)]
    Network(#[from] NetworkError),
}
