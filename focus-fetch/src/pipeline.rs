//! Fetch pipeline for executing strategies in order.
//!
//! The pipeline runs strategies strictly one after another, in priority
//! order, until one yields a non-empty slug set. Errors and empty results
//! both fall through to the next tier.

use focus_core::SolvedSlugSet;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::strategy::{FetchKind, FetchResult, FetchStrategy, SlugQuery};

// ============================================================================
// Fetch Attempt
// ============================================================================

/// Record of a single fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
    /// Whether the attempt completed without error.
    pub success: bool,
    /// Number of slugs found.
    pub found: usize,
    /// Error if the attempt failed or was skipped.
    pub error: Option<String>,
    /// How long the attempt took.
    pub duration: Duration,
}

impl FetchAttempt {
    /// Creates a successful attempt record.
    pub fn success(
        strategy_id: impl Into<String>,
        kind: FetchKind,
        found: usize,
        duration: Duration,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: true,
            found,
            error: None,
            duration,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(
        strategy_id: impl Into<String>,
        kind: FetchKind,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            kind,
            success: false,
            found: 0,
            error: Some(error.into()),
            duration,
        }
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of a fetch pipeline execution.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The winning result, or the final error.
    pub result: Result<FetchResult, FetchError>,
    /// All attempts made.
    pub attempts: Vec<FetchAttempt>,
    /// Total duration of all attempts.
    pub duration: Duration,
}

impl FetchOutcome {
    /// Returns true if some tier produced slugs.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Returns the number of strategies that were tried or skipped.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }

    /// Returns the successful strategy ID, if any.
    pub fn successful_strategy(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|r| r.strategy_id.as_str())
    }

    /// Returns all errors that occurred.
    pub fn errors(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref())
            .collect()
    }

    /// Consumes the outcome, yielding the slugs or an empty set.
    pub fn into_slugs(self) -> SolvedSlugSet {
        self.result.map(|r| r.slugs).unwrap_or_default()
    }
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

/// An ordered chain of fetch strategies.
pub struct FetchPipeline {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl FetchPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates a pipeline with the given strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        let mut pipeline = Self { strategies };
        pipeline.sort_by_priority();
        pipeline
    }

    /// Sorts strategies by priority (highest first). Ties keep insertion order.
    fn sort_by_priority(&mut self) {
        self.strategies.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Returns strategy IDs in execution order.
    pub fn strategy_ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    /// Execute the pipeline, trying strategies in order until one finds slugs.
    #[instrument(skip(self, ctx), fields(strategies = self.strategies.len(), username = %query.username, limit = query.limit))]
    pub async fn execute(&self, ctx: &FetchContext, query: &SlugQuery) -> FetchOutcome {
        let start = Instant::now();
        let mut attempts = Vec::new();

        if self.strategies.is_empty() {
            return FetchOutcome {
                result: Err(FetchError::StrategyNotAvailable(
                    "No strategies configured".to_string(),
                )),
                attempts,
                duration: start.elapsed(),
            };
        }

        info!(count = self.strategies.len(), "Executing fetch pipeline");

        for strategy in &self.strategies {
            let strategy_id = strategy.id();
            let kind = strategy.kind();

            if !ctx.allows(kind) {
                debug!(strategy = %strategy_id, mode = ?ctx.settings.source_mode, "Source mode excludes strategy");
                attempts.push(FetchAttempt::failure(
                    strategy_id,
                    kind,
                    "Excluded by source mode",
                    Duration::ZERO,
                ));
                continue;
            }

            if !strategy.is_available(ctx, query).await {
                debug!(strategy = %strategy_id, "Strategy not available, skipping");
                attempts.push(FetchAttempt::failure(
                    strategy_id,
                    kind,
                    "Not available",
                    Duration::ZERO,
                ));
                continue;
            }

            let attempt_start = Instant::now();
            debug!(strategy = %strategy_id, "Executing strategy");

            match strategy.fetch(ctx, query).await {
                Ok(result) if !result.is_empty() => {
                    let duration = attempt_start.elapsed();
                    info!(
                        strategy = %strategy_id,
                        found = result.slugs.len(),
                        duration = ?duration,
                        "Strategy succeeded"
                    );

                    attempts.push(FetchAttempt::success(
                        strategy_id,
                        kind,
                        result.slugs.len(),
                        duration,
                    ));

                    return FetchOutcome {
                        result: Ok(result),
                        attempts,
                        duration: start.elapsed(),
                    };
                }
                Ok(_) => {
                    let duration = attempt_start.elapsed();
                    debug!(strategy = %strategy_id, "Strategy returned no slugs");
                    attempts.push(FetchAttempt::success(strategy_id, kind, 0, duration));
                }
                Err(error) => {
                    let duration = attempt_start.elapsed();
                    warn!(
                        strategy = %strategy_id,
                        error = %error,
                        duration = ?duration,
                        "Strategy failed"
                    );

                    attempts.push(FetchAttempt::failure(
                        strategy_id,
                        kind,
                        error.to_string(),
                        duration,
                    ));
                }
            }
        }

        debug!("No strategy produced slugs");
        FetchOutcome {
            result: Err(FetchError::AllStrategiesFailed),
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl Default for FetchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
