//! Authenticated platform session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The session cookie and CSRF token pair used to act as the user.
///
/// Created and destroyed by a login flow elsewhere; submission only reads it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Value of the `LEETCODE_SESSION` cookie.
    pub session: String,
    /// Value of the `csrftoken` cookie.
    pub csrf_token: String,
    /// When the pair was captured.
    pub updated_at: DateTime<Utc>,
}

impl AuthSession {
    /// Creates a session stamped with the current time.
    pub fn new(session: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            csrf_token: csrf_token.into(),
            updated_at: Utc::now(),
        }
    }

    /// Returns true if both halves are present.
    pub fn is_complete(&self) -> bool {
        !self.session.trim().is_empty() && !self.csrf_token.trim().is_empty()
    }

    /// Returns true if the pair is older than `max_age` at `now`.
    pub fn is_expired_at(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.updated_at) > max_age
    }

    /// Returns true if the pair can be used for a request right now.
    pub fn is_usable(&self, max_age: Duration) -> bool {
        self.is_complete() && !self.is_expired_at(max_age, Utc::now())
    }

    /// Builds the `Cookie` header value.
    pub fn cookie_header(&self) -> String {
        format!(
            "LEETCODE_SESSION={}; csrftoken={}",
            self.session, self.csrf_token
        )
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("session", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_header() {
        let auth = AuthSession::new("abc", "xyz");
        assert_eq!(auth.cookie_header(), "LEETCODE_SESSION=abc; csrftoken=xyz");
    }

    #[test]
    fn test_incomplete_session_not_usable() {
        let auth = AuthSession::new("  ", "xyz");
        assert!(!auth.is_complete());
        assert!(!auth.is_usable(Duration::days(14)));
    }

    #[test]
    fn test_expiry() {
        let mut auth = AuthSession::new("abc", "xyz");
        auth.updated_at = Utc::now() - Duration::days(30);
        assert!(auth.is_expired_at(Duration::days(14), Utc::now()));
        assert!(!auth.is_usable(Duration::days(14)));
    }

    #[test]
    fn test_debug_redacts() {
        let auth = AuthSession::new("secret-session", "secret-csrf");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret"));
    }
}
