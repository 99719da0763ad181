//! Client for the official GraphQL endpoint.

use focus_core::QuestionContent;
use focus_fetch::{FetchContext, HttpRequest};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::error::LeetCodeError;
use crate::models::{QuestionData, RecentAcSubmissions, parse_graphql};

/// Largest page the recent-submissions query returns.
pub const GRAPHQL_PAGE_SIZE: usize = 200;

const RECENT_AC_QUERY: &str = "query recentAcSubmissions($username: String!, $limit: Int!) { \
    recentAcSubmissionList(username: $username, limit: $limit) { titleSlug } }";

const RECENT_AC_PAGED_QUERY: &str =
    "query recentAcSubmissions($username: String!, $limit: Int!, $offset: Int!) { \
    recentAcSubmissionList(username: $username, limit: $limit, offset: $offset) { titleSlug } }";

const QUESTION_QUERY: &str = "query questionData($titleSlug: String!) { \
    question(titleSlug: $titleSlug) { questionId title content exampleTestcases \
    sampleTestCase difficulty codeSnippets { langSlug code } metaData } }";

/// GraphQL client bound to a fetch context.
#[derive(Debug, Clone, Copy)]
pub struct GraphQlClient<'a> {
    ctx: &'a FetchContext,
}

impl<'a> GraphQlClient<'a> {
    /// Creates a client over `ctx`.
    pub fn new(ctx: &'a FetchContext) -> Self {
        Self { ctx }
    }

    /// Posts `query` with `variables` and unwraps the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`LeetCodeError::GraphQl`] when the response carries errors.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<Option<T>, LeetCodeError> {
        let body = json!({ "query": query, "variables": variables });
        let request = HttpRequest::post_json(&self.ctx.endpoints.graphql_url, &body)
            .map_err(|_| LeetCodeError::InvalidPayload)?
            .accept_json();
        let response = self.ctx.transport.execute(request).await?;
        parse_graphql(&response)
    }

    /// Slugs of recent accepted submissions.
    ///
    /// With an `offset` the paged form of the query is sent.
    #[instrument(skip(self), level = "debug")]
    pub async fn recent_ac_submissions(
        &self,
        username: &str,
        limit: usize,
        offset: Option<usize>,
    ) -> Result<Vec<String>, LeetCodeError> {
        let data: Option<RecentAcSubmissions> = match offset {
            Some(offset) => {
                self.query(
                    RECENT_AC_PAGED_QUERY,
                    json!({ "username": username, "limit": limit, "offset": offset }),
                )
                .await?
            }
            None => {
                self.query(
                    RECENT_AC_QUERY,
                    json!({ "username": username, "limit": limit }),
                )
                .await?
            }
        };

        let slugs: Vec<String> = data
            .and_then(|d| d.list)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.title_slug)
            .collect();
        debug!(count = slugs.len(), "GraphQL recent accepted");
        Ok(slugs)
    }

    /// Question content for `slug`, before any fallbacks.
    ///
    /// Returns `None` for an unknown slug.
    #[instrument(skip(self), level = "debug")]
    pub async fn question(&self, slug: &str) -> Result<Option<QuestionContent>, LeetCodeError> {
        let data: Option<QuestionData> = self
            .query(QUESTION_QUERY, json!({ "titleSlug": slug }))
            .await?;
        Ok(data
            .and_then(|d| d.question)
            .map(crate::models::GraphQlQuestion::into_content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_fetch::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_offset_selects_paged_query() {
        let mock = MockTransport::new();
        mock.respond_json(
            "/graphql",
            &json!({"data": {"recentAcSubmissionList": [{"titleSlug": "two-sum"}]}}),
        );
        let ctx = FetchContext::with_transport(Arc::new(mock.clone()));
        let client = GraphQlClient::new(&ctx);

        client.recent_ac_submissions("alice", 20, None).await.unwrap();
        client
            .recent_ac_submissions("alice", 200, Some(400))
            .await
            .unwrap();

        let bodies: Vec<Value> = mock
            .requests()
            .iter()
            .map(|r| serde_json::from_str(&r.body_text().unwrap()).unwrap())
            .collect();
        assert!(bodies[0]["variables"].get("offset").is_none());
        assert!(!bodies[0]["query"].as_str().unwrap().contains("$offset"));
        assert_eq!(bodies[1]["variables"]["offset"], 400);
        assert_eq!(bodies[1]["variables"]["limit"], 200);
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let mock = MockTransport::new();
        mock.respond_json("/graphql", &json!({"data": {"recentAcSubmissionList": null}}));
        let ctx = FetchContext::with_transport(Arc::new(mock));

        let slugs = GraphQlClient::new(&ctx)
            .recent_ac_submissions("alice", 20, None)
            .await
            .unwrap();
        assert!(slugs.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_question() {
        let mock = MockTransport::new();
        mock.respond_json("/graphql", &json!({"data": {"question": null}}));
        let ctx = FetchContext::with_transport(Arc::new(mock));

        let question = GraphQlClient::new(&ctx).question("nope").await.unwrap();
        assert!(question.is_none());
    }
}
