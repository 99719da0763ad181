//! Client for the community REST mirror.

use focus_fetch::{FetchContext, HttpRequest};
use tracing::{debug, instrument};

use crate::error::LeetCodeError;
use crate::models::{
    RestProblem, RestSubmission, parse_problem, parse_profile_username, parse_submission_list,
};
use crate::urls::build_url;

/// Largest `limit` the mirror honors.
pub const REST_LIMIT_CAP: usize = 5000;

/// REST mirror client bound to a fetch context.
#[derive(Debug, Clone, Copy)]
pub struct RestClient<'a> {
    ctx: &'a FetchContext,
}

impl<'a> RestClient<'a> {
    /// Creates a client over `ctx`.
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<String, LeetCodeError> {
        build_url(&self.ctx.endpoints.rest_base, segments, query).map_err(LeetCodeError::InvalidUrl)
    }

    async fn get(&self, url: String) -> Result<Vec<u8>, LeetCodeError> {
        let request = HttpRequest::get(url).accept_json();
        Ok(self.ctx.transport.execute(request).await?)
    }

    /// Accepted submissions, newest first, capped at [`REST_LIMIT_CAP`].
    #[instrument(skip(self), level = "debug")]
    pub async fn accepted_submissions(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RestSubmission>, LeetCodeError> {
        let limit = limit.min(REST_LIMIT_CAP).to_string();
        let url = self.url(&[username, "acSubmission"], &[("limit", &limit)])?;
        let rows = parse_submission_list(&self.get(url).await?)?;
        debug!(count = rows.len(), "REST accepted submissions");
        Ok(rows)
    }

    /// Recent submissions of any verdict, capped at [`REST_LIMIT_CAP`].
    #[instrument(skip(self), level = "debug")]
    pub async fn all_submissions(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RestSubmission>, LeetCodeError> {
        let limit = limit.min(REST_LIMIT_CAP).to_string();
        let url = self.url(&[username, "submission"], &[("limit", &limit)])?;
        let rows = parse_submission_list(&self.get(url).await?)?;
        debug!(count = rows.len(), "REST submissions");
        Ok(rows)
    }

    /// Problem content for `slug`, before any fallbacks.
    #[instrument(skip(self), level = "debug")]
    pub async fn problem(&self, slug: &str) -> Result<RestProblem, LeetCodeError> {
        let url = self.url(&["select"], &[("titleSlug", slug)])?;
        parse_problem(&self.get(url).await?)
    }

    /// Canonical username from the profile endpoint.
    pub async fn profile_username(&self, username: &str) -> Result<Option<String>, LeetCodeError> {
        let url = self.url(&[username], &[])?;
        parse_profile_username(&self.get(url).await?)
    }

    /// Returns true if the mirror knows `username`.
    ///
    /// Never fails: any transport or decode error reads as "not valid".
    #[instrument(skip(self), level = "debug")]
    pub async fn validate_username(&self, username: &str) -> bool {
        let username = username.trim();
        if username.is_empty() {
            return false;
        }

        match self.profile_username(username).await {
            Ok(found) => found.is_some(),
            Err(e) => {
                debug!(error = %e, "Username validation failed");
                false
            }
        }
    }
}
