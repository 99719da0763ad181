//! Progress keys, sync results, and sync triggers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A deduplicated, unordered set of platform problem slugs.
pub type SolvedSlugSet = HashSet<String>;

// ============================================================================
// Problem Key
// ============================================================================

/// Composite progress key: `"<dayId>-<problemIndexWithinDay>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemKey {
    /// Day identifier.
    pub day_id: u32,
    /// Index of the problem within its day.
    pub index: usize,
}

impl ProblemKey {
    /// Creates a key.
    pub fn new(day_id: u32, index: usize) -> Self {
        Self { day_id, index }
    }
}

impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day_id, self.index)
    }
}

impl FromStr for ProblemKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, index) = s
            .split_once('-')
            .ok_or_else(|| CoreError::InvalidKey(s.to_string()))?;
        let day_id = day
            .parse()
            .map_err(|_| CoreError::InvalidKey(s.to_string()))?;
        let index = index
            .parse()
            .map_err(|_| CoreError::InvalidKey(s.to_string()))?;
        Ok(Self { day_id, index })
    }
}

// ============================================================================
// Sync Result
// ============================================================================

/// Outcome of one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Keys newly flipped to completed by this call.
    pub synced_count: usize,
    /// Plan entries whose slug was found solved, including already-completed ones.
    pub total_matched: usize,
}

impl SyncResult {
    /// Creates a result.
    pub fn new(synced_count: usize, total_matched: usize) -> Self {
        Self {
            synced_count,
            total_matched,
        }
    }

    /// Returns true if the pass recorded anything new.
    pub fn has_changes(&self) -> bool {
        self.synced_count > 0
    }
}

// ============================================================================
// Sync Trigger
// ============================================================================

/// Why a sync was requested. Affects the fetch limit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    /// Periodic hourly timer.
    Hourly,
    /// First moment of a new local day.
    DayStart,
    /// The configured username changed.
    UsernameChanged,
    /// Explicit user request for a recent-history sync.
    OnDemand,
    /// Explicit user request for a full sync.
    Manual,
}

impl SyncTrigger {
    /// Returns true if this trigger asks for the large, full-history limit.
    pub fn wants_full_history(&self) -> bool {
        matches!(self, Self::Manual)
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::DayStart => "day start",
            Self::UsernameChanged => "username changed",
            Self::OnDemand => "on demand",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for SyncTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_key_format_and_parse() {
        let key = ProblemKey::new(12, 3);
        assert_eq!(key.to_string(), "12-3");
        assert_eq!("12-3".parse::<ProblemKey>().unwrap(), key);
    }

    #[test]
    fn test_problem_key_parse_errors() {
        assert!("12".parse::<ProblemKey>().is_err());
        assert!("a-1".parse::<ProblemKey>().is_err());
        assert!("1-".parse::<ProblemKey>().is_err());
    }

    #[test]
    fn test_trigger_limits() {
        assert!(SyncTrigger::Manual.wants_full_history());
        assert!(!SyncTrigger::Hourly.wants_full_history());
        assert!(!SyncTrigger::DayStart.wants_full_history());
        assert!(!SyncTrigger::UsernameChanged.wants_full_history());
        assert!(!SyncTrigger::OnDemand.wants_full_history());
    }
}
