//! Problem content with REST-first, GraphQL-fallback merging.

use std::sync::Arc;

use focus_core::QuestionContent;
use focus_fetch::FetchContext;
use tracing::{debug, instrument, warn};

use crate::error::LeetCodeError;
use crate::graphql::GraphQlClient;
use crate::models::{UNKNOWN_DIFFICULTY, apply_display_fallbacks};
use crate::rest::RestClient;

/// Fetches description, snippets, and metadata for a problem.
#[derive(Debug, Clone)]
pub struct ProblemContentFetcher {
    ctx: Arc<FetchContext>,
}

impl ProblemContentFetcher {
    /// Creates a fetcher over `ctx`.
    pub fn new(ctx: Arc<FetchContext>) -> Self {
        Self { ctx }
    }

    /// Fetches content for `slug`.
    ///
    /// REST is tried first. When it lacks metadata or snippets, GraphQL fills
    /// the gaps field by field; when it fails outright, GraphQL answers alone.
    /// Returns `None` only if neither upstream knows the slug.
    ///
    /// # Errors
    ///
    /// Returns the GraphQL error when REST failed and GraphQL failed too.
    #[instrument(skip(self))]
    pub async fn fetch_problem_content(
        &self,
        slug: &str,
    ) -> Result<Option<QuestionContent>, LeetCodeError> {
        let graphql = GraphQlClient::new(&self.ctx);

        let primary = match RestClient::new(&self.ctx).problem(slug).await {
            Ok(problem) => problem.into_content(),
            Err(e) => {
                debug!(error = %e, "REST problem failed, using GraphQL");
                return Ok(graphql
                    .question(slug)
                    .await?
                    .map(|c| apply_display_fallbacks(c, slug)));
            }
        };

        if !primary.is_incomplete() {
            return Ok(Some(apply_display_fallbacks(primary, slug)));
        }

        let merged = match graphql.question(slug).await {
            Ok(Some(fallback)) => merge_content(primary, fallback),
            Ok(None) => primary,
            Err(e) => {
                warn!(error = %e, "GraphQL problem fallback failed, keeping REST content");
                primary
            }
        };
        Ok(Some(apply_display_fallbacks(merged, slug)))
    }
}

fn pick(primary: String, fallback: String) -> String {
    if primary.trim().is_empty() {
        fallback
    } else {
        primary
    }
}

/// Merges two content records, preferring `primary` field by field.
///
/// Empty strings and an `"Unknown"` difficulty count as missing.
pub fn merge_content(primary: QuestionContent, fallback: QuestionContent) -> QuestionContent {
    let difficulty = if primary.difficulty.trim().is_empty()
        || primary.difficulty == UNKNOWN_DIFFICULTY
    {
        fallback.difficulty
    } else {
        primary.difficulty
    };

    QuestionContent {
        title: pick(primary.title, fallback.title),
        content: pick(primary.content, fallback.content),
        example_testcases: pick(primary.example_testcases, fallback.example_testcases),
        sample_test_case: pick(primary.sample_test_case, fallback.sample_test_case),
        difficulty,
        code_snippets: if primary.code_snippets.is_empty() {
            fallback.code_snippets
        } else {
            primary.code_snippets
        },
        meta_data: primary.meta_data.or(fallback.meta_data),
        question_id: primary.question_id.or(fallback.question_id),
    }
}
