//! The solved-problem cascade.

use std::sync::Arc;

use focus_core::{SolvedSlugSet, SolvedSlugSource};
use focus_fetch::{FetchContext, FetchOutcome, FetchPipeline, SlugQuery};
use tracing::{info, instrument, warn};

use crate::strategies::{
    GraphQlPaginatedStrategy, GraphQlRecentStrategy, RestAcceptedStrategy,
    RestSubmissionsStrategy,
};

/// Builds the four-tier pipeline in priority order.
pub fn build_pipeline() -> FetchPipeline {
    FetchPipeline::with_strategies(vec![
        Box::new(RestAcceptedStrategy::new()),
        Box::new(RestSubmissionsStrategy::new()),
        Box::new(GraphQlPaginatedStrategy::new()),
        Box::new(GraphQlRecentStrategy::new()),
    ])
}

/// Answers "which problems has this user solved" through the tier cascade.
pub struct SolvedSlugFetcher {
    ctx: Arc<FetchContext>,
    pipeline: FetchPipeline,
}

impl SolvedSlugFetcher {
    /// Creates a fetcher with the default pipeline.
    pub fn new(ctx: Arc<FetchContext>) -> Self {
        Self {
            ctx,
            pipeline: build_pipeline(),
        }
    }

    /// Creates a fetcher with a custom pipeline.
    pub fn with_pipeline(ctx: Arc<FetchContext>, pipeline: FetchPipeline) -> Self {
        Self { ctx, pipeline }
    }

    /// Returns the shared context.
    pub fn context(&self) -> &Arc<FetchContext> {
        &self.ctx
    }

    /// Runs the cascade and reports every tier's attempt.
    #[instrument(skip(self))]
    pub async fn fetch_outcome(&self, username: &str, limit: usize) -> FetchOutcome {
        let query = SlugQuery::new(username.trim(), limit);
        self.pipeline.execute(&self.ctx, &query).await
    }

    /// Runs the cascade and returns the first non-empty set.
    ///
    /// Never fails. A blank username or total exhaustion yields an empty set.
    pub async fn fetch_solved_slugs(&self, username: &str, limit: usize) -> SolvedSlugSet {
        if username.trim().is_empty() {
            return SolvedSlugSet::new();
        }

        let outcome = self.fetch_outcome(username, limit).await;
        match outcome.successful_strategy() {
            Some(strategy) => info!(strategy, "Solved slugs fetched"),
            None => warn!(errors = ?outcome.errors(), "All solved-slug tiers came back empty"),
        }
        outcome.into_slugs()
    }
}

impl SolvedSlugSource for SolvedSlugFetcher {
    async fn fetch_solved_slugs(&self, username: &str, limit: usize) -> SolvedSlugSet {
        SolvedSlugFetcher::fetch_solved_slugs(self, username, limit).await
    }
}

impl std::fmt::Debug for SolvedSlugFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolvedSlugFetcher")
            .field("strategies", &self.pipeline.strategy_ids())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_fetch::MockTransport;

    #[test]
    fn test_pipeline_order() {
        assert_eq!(
            build_pipeline().strategy_ids(),
            vec![
                "leetcode.rest.accepted",
                "leetcode.rest.submissions",
                "leetcode.graphql.paginated",
                "leetcode.graphql.recent",
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_username_skips_network() {
        let mock = MockTransport::new();
        let fetcher = SolvedSlugFetcher::new(Arc::new(FetchContext::with_transport(Arc::new(
            mock.clone(),
        ))));

        assert!(fetcher.fetch_solved_slugs("  ", 20).await.is_empty());
        assert_eq!(mock.request_count(), 0);
    }
}
