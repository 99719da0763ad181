// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Focus LeetCode
//!
//! Platform clients for LeetCode.
//!
//! This crate talks to two upstreams: a community REST mirror and the
//! official GraphQL endpoint. On top of them it provides:
//!
//! - **Solved slugs**: a four-tier cascade that stops at the first tier
//!   with a non-empty answer
//! - **Problem content**: REST first, with GraphQL filling missing fields
//! - **Submission**: submit as the signed-in user and poll for the verdict
//!
//! ## Tiers
//!
//! | Tier | Upstream | Runs when | Priority |
//! |------|----------|-----------|----------|
//! | Accepted listing | REST | always | 400 |
//! | All submissions | REST | always | 300 |
//! | Paginated scan | GraphQL | limit >= 5000 | 200 |
//! | Recent accepted | GraphQL | always | 100 |
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use focus_fetch::FetchContext;
//! use focus_leetcode::SolvedSlugFetcher;
//!
//! let ctx = Arc::new(FetchContext::builder().build()?);
//! let fetcher = SolvedSlugFetcher::new(ctx);
//! let solved = fetcher.fetch_solved_slugs("alice", 20).await;
//! ```

pub mod content;
pub mod error;
pub mod graphql;
pub mod lenient;
pub mod models;
pub mod rest;
pub mod solved;
pub mod strategies;
pub mod submission;

mod urls;

// Re-export error types
pub use error::{LeetCodeError, SubmissionError};

// Re-export clients
pub use graphql::{GRAPHQL_PAGE_SIZE, GraphQlClient};
pub use rest::{REST_LIMIT_CAP, RestClient};

// Re-export the high-level operations
pub use content::{ProblemContentFetcher, merge_content};
pub use solved::{SolvedSlugFetcher, build_pipeline};
pub use submission::{CheckDecode, SubmissionCheck, SubmissionSubmitter, decode_check};

// Re-export strategies
pub use strategies::{
    FULL_SCAN_THRESHOLD, GraphQlPaginatedStrategy, GraphQlRecentStrategy, RestAcceptedStrategy,
    RestSubmissionsStrategy,
};
