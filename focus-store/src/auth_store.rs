//! Session storage using the system keychain.
//!
//! The session cookie and CSRF token are stored together as one JSON blob:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! ## Usage
//!
//! ```ignore
//! use focus_core::AuthSession;
//! use focus_store::{AuthStore, KeychainAuthStore};
//!
//! let store = KeychainAuthStore::new();
//! store.save(&AuthSession::new("session", "csrf"))?;
//!
//! if let Some(auth) = store.load()? {
//!     println!("Signed in since {}", auth.updated_at);
//! }
//!
//! store.clear()?;
//! ```

use focus_core::AuthSession;
use keyring::Entry;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Keychain service name for Focus credentials.
pub const SERVICE: &str = "focus-leetcode";

/// Keychain account holding the session blob.
pub const ACCOUNT: &str = "session";

/// Persists the signed-in session.
pub trait AuthStore: Send + Sync {
    /// Returns the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn load(&self) -> Result<Option<AuthSession>, StoreError>;

    /// Replaces the stored session.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written.
    fn save(&self, auth: &AuthSession) -> Result<(), StoreError>;

    /// Removes the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

// ============================================================================
// Keychain Store
// ============================================================================

/// [`AuthStore`] backed by the OS keychain.
#[derive(Debug, Clone)]
pub struct KeychainAuthStore {
    service: String,
    account: String,
}

impl Default for KeychainAuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeychainAuthStore {
    /// Creates a store using the default service and account.
    pub fn new() -> Self {
        Self::with_names(SERVICE, ACCOUNT)
    }

    /// Creates a store using a custom service and account.
    pub fn with_names(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Entry::new(&self.service, &self.account)
            .map_err(|e| StoreError::Keychain(format!("Failed to create keychain entry: {e}")))
    }
}

impl AuthStore for KeychainAuthStore {
    fn load(&self) -> Result<Option<AuthSession>, StoreError> {
        let secret = match self.entry()?.get_password() {
            Ok(secret) => secret,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(StoreError::Keychain(format!("Failed to read session: {e}"))),
        };

        match serde_json::from_str::<AuthSession>(&secret) {
            Ok(auth) => {
                debug!(service = %self.service, "Session loaded from keychain");
                Ok(Some(auth))
            }
            Err(e) => {
                warn!(error = %e, "Stored session is unreadable, ignoring it");
                Ok(None)
            }
        }
    }

    fn save(&self, auth: &AuthSession) -> Result<(), StoreError> {
        let secret = serde_json::to_string(auth)?;
        self.entry()?
            .set_password(&secret)
            .map_err(|e| StoreError::Keychain(format!("Failed to store session: {e}")))?;
        debug!(service = %self.service, "Session stored in keychain");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) => {
                debug!(service = %self.service, "Session deleted from keychain");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted, that's fine
            Err(e) => Err(StoreError::Keychain(format!("Failed to delete session: {e}"))),
        }
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// [`AuthStore`] held in memory, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryAuthStore {
    session: Mutex<Option<AuthSession>>,
}

impl MemoryAuthStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthStore for MemoryAuthStore {
    fn load(&self) -> Result<Option<AuthSession>, StoreError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, auth: &AuthSession) -> Result<(), StoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(auth.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let store = KeychainAuthStore::new();
        assert_eq!(store.service, "focus-leetcode");
        assert_eq!(store.account, "session");
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryAuthStore::new();
        assert!(store.load().unwrap().is_none());

        let auth = AuthSession::new("abc", "xyz");
        store.save(&auth).unwrap();
        assert_eq!(store.load().unwrap(), Some(auth));

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    // Keychain operations need platform access and are not exercised here.
}
