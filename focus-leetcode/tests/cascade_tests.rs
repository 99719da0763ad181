//! Tests for the solved-slug tier cascade against a scripted transport.

use std::sync::Arc;

use focus_fetch::{FetchContext, MockResponse, MockTransport, NetworkError, SourceMode};
use focus_leetcode::SolvedSlugFetcher;
use serde_json::{Value, json};

fn fetcher(mock: &MockTransport) -> SolvedSlugFetcher {
    fetcher_with_mode(mock, SourceMode::Auto)
}

fn fetcher_with_mode(mock: &MockTransport, mode: SourceMode) -> SolvedSlugFetcher {
    let ctx = FetchContext::builder()
        .transport(Arc::new(mock.clone()))
        .source_mode(mode)
        .build()
        .unwrap();
    SolvedSlugFetcher::new(Arc::new(ctx))
}

fn graphql_page(start: usize, len: usize) -> Value {
    let list: Vec<Value> = (start..start + len)
        .map(|i| json!({"titleSlug": format!("problem-{i}")}))
        .collect();
    json!({"data": {"recentAcSubmissionList": list}})
}

fn graphql_bodies(mock: &MockTransport) -> Vec<Value> {
    mock.requests_to("/graphql")
        .iter()
        .map(|r| serde_json::from_str(&r.body_text().unwrap()).unwrap())
        .collect()
}

// ============================================================================
// REST Tiers
// ============================================================================

#[tokio::test]
async fn test_first_tier_short_circuits() {
    let mock = MockTransport::new();
    mock.respond_json(
        "/alice/acSubmission",
        &json!({"count": 1, "submission": [{"titleSlug": "two-sum", "statusDisplay": "Accepted"}]}),
    );

    let slugs = fetcher(&mock).fetch_solved_slugs("alice", 20).await;

    assert_eq!(slugs.len(), 1);
    assert!(slugs.contains("two-sum"));
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_second_tier_filters_accepted() {
    let mock = MockTransport::new();
    mock.respond_json("/alice/acSubmission", &json!({"submission": []}));
    mock.respond_json(
        "/alice/submission",
        &json!({"submission": [
            {"titleSlug": "reverse-linked-list", "statusDisplay": "Accepted"},
            {"titleSlug": "two-sum", "statusDisplay": "Wrong Answer"},
            {"titleSlug": "reverse-linked-list", "statusDisplay": "accepted"}
        ]}),
    );

    let slugs = fetcher(&mock).fetch_solved_slugs("alice", 20).await;

    assert_eq!(slugs.len(), 1);
    assert!(slugs.contains("reverse-linked-list"));
    assert!(mock.requests_to("/graphql").is_empty());
}

#[tokio::test]
async fn test_rest_limit_passed_through() {
    let mock = MockTransport::new();
    mock.respond_json(
        "/alice/acSubmission",
        &json!({"submission": [{"titleSlug": "two-sum"}]}),
    );

    fetcher(&mock).fetch_solved_slugs("alice", 20).await;

    assert!(mock.requests()[0].url.ends_with("acSubmission?limit=20"));
}

#[tokio::test]
async fn test_rest_limit_capped_at_full_scan() {
    let mock = MockTransport::new();
    mock.respond_json("/acSubmission", &json!({"submission": []}));
    mock.respond_json(
        "/alice/submission",
        &json!({"submission": [{"titleSlug": "two-sum", "statusDisplay": "Accepted"}]}),
    );

    let slugs = fetcher(&mock).fetch_solved_slugs("alice", 10_000).await;

    assert!(slugs.contains("two-sum"));
    let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].ends_with("/alice/acSubmission?limit=5000"));
    assert!(urls[1].ends_with("/alice/submission?limit=5000"));
}

// ============================================================================
// GraphQL Tiers
// ============================================================================

#[tokio::test]
async fn test_full_history_pages_until_short_page() {
    let mock = MockTransport::new();
    mock.respond_error("/acSubmission", NetworkError::HttpStatus(503));
    mock.respond_error("/submission?", NetworkError::HttpStatus(503));
    mock.enqueue("/graphql", MockResponse::json(&graphql_page(0, 200)));
    mock.enqueue("/graphql", MockResponse::json(&graphql_page(200, 200)));
    mock.enqueue("/graphql", MockResponse::json(&graphql_page(400, 50)));

    let outcome = fetcher(&mock).fetch_outcome("alice", 5000).await;

    assert_eq!(outcome.successful_strategy(), Some("leetcode.graphql.paginated"));
    let bodies = graphql_bodies(&mock);
    let offsets: Vec<i64> = bodies
        .iter()
        .map(|b| b["variables"]["offset"].as_i64().unwrap())
        .collect();
    assert_eq!(offsets, vec![0, 200, 400]);
    assert!(bodies.iter().all(|b| b["variables"]["limit"] == 200));
    assert_eq!(outcome.into_slugs().len(), 450);
}

#[tokio::test]
async fn test_pagination_capped_at_full_scan() {
    let mock = MockTransport::new();
    mock.respond_json("/acSubmission", &json!({"submission": []}));
    mock.respond_json("/submission?", &json!({"submission": []}));
    for page in 0..30 {
        mock.enqueue("/graphql", MockResponse::json(&graphql_page(page * 200, 200)));
    }

    let outcome = fetcher(&mock).fetch_outcome("alice", 10_000).await;

    assert_eq!(outcome.successful_strategy(), Some("leetcode.graphql.paginated"));
    let offsets: Vec<i64> = graphql_bodies(&mock)
        .iter()
        .map(|b| b["variables"]["offset"].as_i64().unwrap())
        .collect();
    assert_eq!(offsets.len(), 25);
    assert_eq!(offsets.last(), Some(&4800));
    assert_eq!(outcome.into_slugs().len(), 5000);
}

#[tokio::test]
async fn test_pagination_stops_when_nothing_new() {
    let mock = MockTransport::new();
    mock.respond_json("/acSubmission", &json!({"submission": []}));
    mock.respond_json("/submission?", &json!({"submission": []}));
    mock.respond("/graphql", MockResponse::json(&graphql_page(0, 200)));

    let slugs = fetcher(&mock).fetch_solved_slugs("alice", 5000).await;

    assert_eq!(slugs.len(), 200);
    assert_eq!(graphql_bodies(&mock).len(), 2);
}

#[tokio::test]
async fn test_pagination_error_falls_to_recent() {
    let mock = MockTransport::new();
    mock.respond_json("/acSubmission", &json!({"submission": []}));
    mock.respond_json("/submission?", &json!({"submission": []}));
    mock.enqueue("/graphql", MockResponse::json(&graphql_page(0, 200)));
    mock.enqueue("/graphql", MockResponse::Error(NetworkError::Timeout));
    mock.enqueue("/graphql", MockResponse::json(&graphql_page(0, 3)));

    let outcome = fetcher(&mock).fetch_outcome("alice", 5000).await;

    assert_eq!(outcome.successful_strategy(), Some("leetcode.graphql.recent"));
    let bodies = graphql_bodies(&mock);
    assert_eq!(bodies.len(), 3);
    assert!(bodies[2]["variables"].get("offset").is_none());
    assert_eq!(bodies[2]["variables"]["limit"], 200);
    assert_eq!(outcome.into_slugs().len(), 3);
}

#[tokio::test]
async fn test_small_limit_skips_pagination() {
    let mock = MockTransport::new();
    mock.respond_json("/acSubmission", &json!({"submission": []}));
    mock.respond_json("/submission?", &json!({"submission": []}));
    mock.respond("/graphql", MockResponse::json(&graphql_page(0, 5)));

    let slugs = fetcher(&mock).fetch_solved_slugs("alice", 20).await;

    assert_eq!(slugs.len(), 5);
    let bodies = graphql_bodies(&mock);
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["variables"]["limit"], 20);
    assert!(bodies[0]["variables"].get("offset").is_none());
}

// ============================================================================
// Exhaustion and Source Mode
// ============================================================================

#[tokio::test]
async fn test_total_failure_is_empty_set() {
    let mock = MockTransport::new();
    mock.respond_error("/acSubmission", NetworkError::Timeout);
    mock.respond("/submission?", MockResponse::text("<html>rate limited</html>"));
    mock.respond_json("/graphql", &json!({"errors": [{"message": "That user does not exist."}]}));

    let fetcher = fetcher(&mock);
    let outcome = fetcher.fetch_outcome("ghost", 20).await;
    assert!(!outcome.is_success());
    assert_eq!(outcome.attempts_count(), 4);
    assert_eq!(outcome.errors().len(), 4);

    assert!(fetcher.fetch_solved_slugs("ghost", 20).await.is_empty());
}

#[tokio::test]
async fn test_rest_mode_never_calls_graphql() {
    let mock = MockTransport::new();
    mock.respond_json("/acSubmission", &json!({"submission": []}));
    mock.respond_json("/submission?", &json!({"submission": []}));
    mock.respond("/graphql", MockResponse::json(&graphql_page(0, 5)));

    let slugs = fetcher_with_mode(&mock, SourceMode::Rest)
        .fetch_solved_slugs("alice", 5000)
        .await;

    assert!(slugs.is_empty());
    assert!(mock.requests_to("/graphql").is_empty());
}

#[tokio::test]
async fn test_graphql_mode_skips_rest() {
    let mock = MockTransport::new();
    mock.respond("/graphql", MockResponse::json(&graphql_page(0, 2)));

    let slugs = fetcher_with_mode(&mock, SourceMode::GraphQl)
        .fetch_solved_slugs("alice", 20)
        .await;

    assert_eq!(slugs.len(), 2);
    assert_eq!(mock.request_count(), 1);
}
