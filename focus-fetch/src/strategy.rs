//! Fetch strategy trait and types.
//!
//! A strategy is one tier of the solved-problem cascade. Tiers are tried in
//! priority order; the first one that yields a non-empty set wins.

use async_trait::async_trait;
use focus_core::SolvedSlugSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::FetchContext;
use crate::error::FetchError;

// ============================================================================
// Fetch Kind
// ============================================================================

/// The upstream a strategy talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Community REST mirror.
    Rest,
    /// Official GraphQL endpoint.
    GraphQl,
}

impl FetchKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Rest => "REST",
            Self::GraphQl => "GraphQL",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Slug Query
// ============================================================================

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugQuery {
    /// Platform username.
    pub username: String,
    /// Requested upper bound on submissions to scan.
    pub limit: usize,
}

impl SlugQuery {
    /// Creates a query.
    pub fn new(username: impl Into<String>, limit: usize) -> Self {
        Self {
            username: username.into(),
            limit,
        }
    }
}

// ============================================================================
// Fetch Result
// ============================================================================

/// The result of a fetch strategy.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Solved slugs found by this strategy.
    pub slugs: SolvedSlugSet,
    /// The strategy that produced the result.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
}

impl FetchResult {
    /// Creates a new fetch result.
    pub fn new(slugs: SolvedSlugSet, strategy_id: impl Into<String>, kind: FetchKind) -> Self {
        Self {
            slugs,
            strategy_id: strategy_id.into(),
            kind,
        }
    }

    /// Returns true if no slugs were found.
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

// ============================================================================
// Fetch Strategy Trait
// ============================================================================

/// One tier of the solved-problem cascade.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct RestAcceptedStrategy;
///
/// #[async_trait]
/// impl FetchStrategy for RestAcceptedStrategy {
///     fn id(&self) -> &str {
///         "leetcode.rest.accepted"
///     }
///
///     fn kind(&self) -> FetchKind {
///         FetchKind::Rest
///     }
///
///     async fn is_available(&self, _ctx: &FetchContext, _query: &SlugQuery) -> bool {
///         true
///     }
///
///     async fn fetch(&self, ctx: &FetchContext, query: &SlugQuery) -> Result<FetchResult, FetchError> {
///         // Call the upstream and collect slugs
///     }
/// }
/// ```
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Unique identifier, formatted `{platform}.{upstream}.{variant}`.
    fn id(&self) -> &str;

    /// The upstream this strategy uses.
    fn kind(&self) -> FetchKind;

    /// Whether this strategy should run for `query`.
    ///
    /// Must not touch the network.
    async fn is_available(&self, ctx: &FetchContext, query: &SlugQuery) -> bool;

    /// Fetches solved slugs.
    async fn fetch(&self, ctx: &FetchContext, query: &SlugQuery)
    -> Result<FetchResult, FetchError>;

    /// Priority of this strategy (higher = try first).
    fn priority(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_kind_display() {
        assert_eq!(FetchKind::Rest.to_string(), "REST");
        assert_eq!(FetchKind::GraphQl.display_name(), "GraphQL");
    }

    #[test]
    fn test_fetch_result_empty() {
        let result = FetchResult::new(SolvedSlugSet::new(), "x", FetchKind::Rest);
        assert!(result.is_empty());
    }
}
