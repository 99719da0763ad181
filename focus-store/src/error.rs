//! Store error types.

use focus_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A sync is already running; the request was dropped.
    #[error("Sync already in progress")]
    SyncInProgress,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The plan file is invalid.
    #[error("Invalid plan: {0}")]
    Plan(#[from] CoreError),

    /// Keychain access failed.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::SyncInProgress | StoreError::Io(_))
    }
}
