//! Solved-slug fetch strategies.
//!
//! The cascade runs in priority order and stops at the first non-empty set:
//!
//! 1. **REST accepted** - the mirror's accepted-submission listing
//! 2. **REST all** - the mirror's full listing, filtered to Accepted
//! 3. **GraphQL paginated** - full-history scan, only for large limits
//! 4. **GraphQL recent** - one page of recent accepted submissions

use async_trait::async_trait;
use focus_core::SolvedSlugSet;
use focus_fetch::{FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy, SlugQuery};
use tracing::{debug, instrument};

use crate::graphql::{GRAPHQL_PAGE_SIZE, GraphQlClient};
use crate::rest::RestClient;

/// Limit at or above which the paginated GraphQL scan is enabled.
pub const FULL_SCAN_THRESHOLD: usize = 5000;

// ============================================================================
// REST Accepted Strategy (Highest Priority)
// ============================================================================

/// Reads the mirror's accepted-submission listing.
#[derive(Debug, Default)]
pub struct RestAcceptedStrategy;

impl RestAcceptedStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for RestAcceptedStrategy {
    fn id(&self) -> &str {
        "leetcode.rest.accepted"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::Rest
    }

    async fn is_available(&self, _ctx: &FetchContext, _query: &SlugQuery) -> bool {
        true
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext, query: &SlugQuery) -> Result<FetchResult, FetchError> {
        let rows = RestClient::new(ctx)
            .accepted_submissions(&query.username, query.limit)
            .await?;
        let slugs: SolvedSlugSet = rows.into_iter().map(|r| r.title_slug).collect();
        Ok(FetchResult::new(slugs, self.id(), self.kind()))
    }

    fn priority(&self) -> u32 {
        400
    }
}

// ============================================================================
// REST All-Submissions Strategy
// ============================================================================

/// Reads the mirror's full listing and keeps Accepted rows.
#[derive(Debug, Default)]
pub struct RestSubmissionsStrategy;

impl RestSubmissionsStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for RestSubmissionsStrategy {
    fn id(&self) -> &str {
        "leetcode.rest.submissions"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::Rest
    }

    async fn is_available(&self, _ctx: &FetchContext, _query: &SlugQuery) -> bool {
        true
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext, query: &SlugQuery) -> Result<FetchResult, FetchError> {
        let rows = RestClient::new(ctx)
            .all_submissions(&query.username, query.limit)
            .await?;
        let slugs: SolvedSlugSet = rows
            .into_iter()
            .filter(|r| r.is_accepted())
            .map(|r| r.title_slug)
            .collect();
        Ok(FetchResult::new(slugs, self.id(), self.kind()))
    }

    fn priority(&self) -> u32 {
        300
    }
}

// ============================================================================
// GraphQL Paginated Strategy
// ============================================================================

/// Walks accepted submissions page by page.
///
/// Only runs for full-history queries. Stops on an empty page, a page that
/// adds nothing new, or a short page. An error on any page fails the tier.
/// A server that keeps repeating a full page of known slugs looks exhausted.
#[derive(Debug, Default)]
pub struct GraphQlPaginatedStrategy;

impl GraphQlPaginatedStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for GraphQlPaginatedStrategy {
    fn id(&self) -> &str {
        "leetcode.graphql.paginated"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::GraphQl
    }

    async fn is_available(&self, _ctx: &FetchContext, query: &SlugQuery) -> bool {
        query.limit >= FULL_SCAN_THRESHOLD
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext, query: &SlugQuery) -> Result<FetchResult, FetchError> {
        let client = GraphQlClient::new(ctx);
        let target = query.limit.min(FULL_SCAN_THRESHOLD);
        let page_size = GRAPHQL_PAGE_SIZE.min(target);
        let mut slugs = SolvedSlugSet::new();
        let mut offset = 0;

        while page_size > 0 && offset < target {
            let page = client
                .recent_ac_submissions(&query.username, page_size, Some(offset))
                .await?;
            if page.is_empty() {
                break;
            }

            let page_len = page.len();
            let before = slugs.len();
            slugs.extend(page);
            debug!(offset, page_len, total = slugs.len(), "GraphQL page");

            if slugs.len() == before || page_len < page_size {
                break;
            }
            offset += page_size;
        }

        Ok(FetchResult::new(slugs, self.id(), self.kind()))
    }

    fn priority(&self) -> u32 {
        200
    }
}

// ============================================================================
// GraphQL Recent Strategy (Last Resort)
// ============================================================================

/// One page of recent accepted submissions.
#[derive(Debug, Default)]
pub struct GraphQlRecentStrategy;

impl GraphQlRecentStrategy {
    /// Creates a new strategy.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FetchStrategy for GraphQlRecentStrategy {
    fn id(&self) -> &str {
        "leetcode.graphql.recent"
    }

    fn kind(&self) -> FetchKind {
        FetchKind::GraphQl
    }

    async fn is_available(&self, _ctx: &FetchContext, _query: &SlugQuery) -> bool {
        true
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(&self, ctx: &FetchContext, query: &SlugQuery) -> Result<FetchResult, FetchError> {
        let slugs = GraphQlClient::new(ctx)
            .recent_ac_submissions(&query.username, query.limit.min(GRAPHQL_PAGE_SIZE), None)
            .await?;
        Ok(FetchResult::new(
            slugs.into_iter().collect(),
            self.id(),
            self.kind(),
        ))
    }

    fn priority(&self) -> u32 {
        100
    }
}
