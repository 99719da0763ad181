//! Core error types for Focus.

use thiserror::Error;

/// Core error type for Focus operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The study plan is malformed.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// A progress key could not be parsed.
    #[error("Invalid progress key: {0}")]
    InvalidKey(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
