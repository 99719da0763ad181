//! Tests for the submit-and-poll flow against a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use focus_core::AuthSession;
use focus_fetch::{
    DiagnosticLog, FetchContext, HttpMethod, MockResponse, MockTransport, NetworkError,
    PollSettings,
};
use focus_leetcode::{SubmissionError, SubmissionSubmitter};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

const CODE: &str = "impl Solution { pub fn two_sum() {} }";

fn poll_settings() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(1),
        ..PollSettings::default()
    }
}

fn submitter_with(mock: &MockTransport, poll: PollSettings) -> SubmissionSubmitter {
    let ctx = FetchContext::builder()
        .transport(Arc::new(mock.clone()))
        .poll(poll)
        .build()
        .unwrap();
    SubmissionSubmitter::new(Arc::new(ctx))
}

fn submitter(mock: &MockTransport) -> SubmissionSubmitter {
    submitter_with(mock, poll_settings())
}

fn auth() -> AuthSession {
    AuthSession::new("session-cookie", "csrf-token")
}

async fn submit(
    submitter: &SubmissionSubmitter,
    auth: Option<&AuthSession>,
) -> Result<focus_leetcode::SubmissionCheck, SubmissionError> {
    submitter
        .submit(CODE, "rust", "two-sum", "1", auth, &CancellationToken::new())
        .await
}

fn accept_submit(mock: &MockTransport) {
    mock.respond_json("/submit/", &json!({"submission_id": 123}));
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_missing_auth() {
    let mock = MockTransport::new();
    let err = submit(&submitter(&mock), None).await.unwrap_err();

    assert!(matches!(err, SubmissionError::MissingAuth));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_incomplete_auth() {
    let mock = MockTransport::new();
    let auth = AuthSession::new("session-cookie", "");
    let err = submit(&submitter(&mock), Some(&auth)).await.unwrap_err();

    assert!(matches!(err, SubmissionError::MissingAuth));
}

#[tokio::test]
async fn test_expired_auth() {
    let mock = MockTransport::new();
    let mut auth = auth();
    auth.updated_at = Utc::now() - chrono::Duration::days(15);
    let err = submit(&submitter(&mock), Some(&auth)).await.unwrap_err();

    assert!(matches!(err, SubmissionError::MissingAuth));
    assert_eq!(mock.request_count(), 0);
}

// ============================================================================
// Submit Request
// ============================================================================

#[tokio::test]
async fn test_submit_request_shape() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond_json("/check/", &json!({"state": "SUCCESS", "status_msg": "Accepted"}));

    submit(&submitter(&mock), Some(&auth())).await.unwrap();

    let posts = mock.requests_to("/submit/");
    let post = &posts[0];
    assert_eq!(post.method, HttpMethod::Post);
    assert_eq!(post.url, "https://leetcode.com/problems/two-sum/submit/");
    assert_eq!(post.header_value("Origin"), Some("https://leetcode.com"));
    assert_eq!(
        post.header_value("Referer"),
        Some("https://leetcode.com/problems/two-sum/")
    );
    assert_eq!(post.header_value("x-csrftoken"), Some("csrf-token"));
    assert_eq!(
        post.header_value("Cookie"),
        Some("LEETCODE_SESSION=session-cookie; csrftoken=csrf-token")
    );
    assert_eq!(post.header_value("Content-Type"), Some("application/json"));
    assert!(post.header_value("User-Agent").is_some());

    let body: Value = serde_json::from_str(&post.body_text().unwrap()).unwrap();
    assert_eq!(body, json!({"lang": "rust", "question_id": "1", "typed_code": CODE}));

    let checks = mock.requests_to("/check/");
    assert_eq!(
        checks[0].url,
        "https://leetcode.com/submissions/detail/123/check/"
    );
    assert_eq!(checks[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn test_submit_error_field() {
    let mock = MockTransport::new();
    mock.respond_json("/submit/", &json!({"error": "You have submitted too fast."}));

    let err = submit(&submitter(&mock), Some(&auth())).await.unwrap_err();

    assert!(
        matches!(err, SubmissionError::SubmissionFailed(ref m) if m == "You have submitted too fast.")
    );
    assert!(mock.requests_to("/check/").is_empty());
}

#[tokio::test]
async fn test_submit_without_id() {
    let mock = MockTransport::new();
    mock.respond_json("/submit/", &json!({"status_code": 0}));

    let err = submit(&submitter(&mock), Some(&auth())).await.unwrap_err();
    assert!(matches!(err, SubmissionError::InvalidResponse));
}

#[tokio::test]
async fn test_submit_undecodable_quotes_preview() {
    let mock = MockTransport::new();
    mock.respond("/submit/", MockResponse::text("<html>Forbidden</html>"));

    let err = submit(&submitter(&mock), Some(&auth())).await.unwrap_err();
    let SubmissionError::SubmissionFailed(message) = err else {
        panic!("expected SubmissionFailed");
    };
    assert!(message.starts_with("Unexpected response from LeetCode (decode error)"));
    assert!(message.contains("<html>Forbidden</html>"));
}

#[tokio::test]
async fn test_stringly_submission_id() {
    let mock = MockTransport::new();
    mock.respond_json("/submit/", &json!({"submission_id": "987"}));
    mock.respond_json("/check/", &json!({"state": "SUCCESS"}));

    submit(&submitter(&mock), Some(&auth())).await.unwrap();
    assert!(mock.requests()[1].url.contains("/detail/987/check/"));
}

// ============================================================================
// Poll Loop
// ============================================================================

#[tokio::test]
async fn test_polls_until_finished() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.enqueue("/check/", MockResponse::json(&json!({"state": "PENDING"})));
    mock.enqueue("/check/", MockResponse::json(&json!({"state": "STARTED"})));
    mock.enqueue(
        "/check/",
        MockResponse::json(&json!({
            "finished": "true",
            "status_code": 10,
            "status_msg": "Accepted",
            "total_correct": "63",
            "total_testcases": 63,
            "status_runtime": "0 ms",
            "runtime_percentile": 100
        })),
    );

    let check = submit(&submitter(&mock), Some(&auth())).await.unwrap();

    assert!(check.is_accepted());
    assert_eq!(check.total_correct, Some(63));
    assert_eq!(check.runtime_percentile, Some(100.0));
    assert_eq!(mock.requests_to("/check/").len(), 3);
}

#[tokio::test]
async fn test_wrapped_response_recovered() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond(
        "/check/",
        MockResponse::text("while(1);{\"state\":\"SUCCESS\",\"status_msg\":\"Wrong Answer\"}"),
    );

    let check = submit(&submitter(&mock), Some(&auth())).await.unwrap();
    assert_eq!(check.status_msg.as_deref(), Some("Wrong Answer"));
    assert!(!check.is_accepted());
}

#[tokio::test]
async fn test_unreadable_responses_fail_with_preview() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond("/check/", MockResponse::text("<html>Bad Gateway</html>"));

    let err = submit(&submitter(&mock), Some(&auth())).await.unwrap_err();

    let SubmissionError::SubmissionFailed(message) = err else {
        panic!("expected SubmissionFailed");
    };
    assert!(message.contains("(5 times)"));
    assert!(message.contains("<html>Bad Gateway</html>"));
    assert_eq!(mock.requests_to("/check/").len(), 5);
}

#[tokio::test]
async fn test_preview_is_truncated() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond("/check/", MockResponse::text(&"x".repeat(2000)));

    let err = submit(&submitter(&mock), Some(&auth())).await.unwrap_err();
    let SubmissionError::SubmissionFailed(message) = err else {
        panic!("expected SubmissionFailed");
    };
    assert_eq!(message.matches('x').count(), 500);
}

#[tokio::test]
async fn test_readable_response_resets_decode_failures() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    for _ in 0..4 {
        mock.enqueue("/check/", MockResponse::text("garbage"));
    }
    mock.enqueue("/check/", MockResponse::json(&json!({"state": "PENDING"})));
    for _ in 0..4 {
        mock.enqueue("/check/", MockResponse::text("garbage"));
    }
    mock.enqueue("/check/", MockResponse::json(&json!({"state": "SUCCESS"})));

    let check = submit(&submitter(&mock), Some(&auth())).await.unwrap();
    assert!(check.is_complete());
    assert_eq!(mock.requests_to("/check/").len(), 10);
}

#[tokio::test]
async fn test_timeout_after_attempt_budget() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond_json("/check/", &json!({"state": "PENDING"}));

    let poll = PollSettings {
        max_attempts: 3,
        ..poll_settings()
    };
    let err = submit(&submitter_with(&mock, poll), Some(&auth()))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Timeout));
    assert_eq!(mock.requests_to("/check/").len(), 3);
}

#[tokio::test]
async fn test_check_network_error_propagates() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond_error("/check/", NetworkError::HttpStatus(403));

    let err = submit(&submitter(&mock), Some(&auth())).await.unwrap_err();
    assert!(matches!(
        err,
        SubmissionError::Network(NetworkError::HttpStatus(403))
    ));
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_before_submit() {
    let mock = MockTransport::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = submitter(&mock)
        .submit(CODE, "rust", "two-sum", "1", Some(&auth()), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Cancelled));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_cancel_during_poll() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond_json("/check/", &json!({"state": "PENDING"}));

    let poll = PollSettings {
        interval: Duration::from_millis(10),
        max_attempts: 10_000,
        ..PollSettings::default()
    };
    let submitter = submitter_with(&mock, poll);
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let auth = auth();
    let err = submitter
        .submit(CODE, "rust", "two-sum", "1", Some(&auth), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Cancelled));
    let checks = mock.requests_to("/check/").len();
    assert!(checks >= 1 && checks < 10_000);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[tokio::test]
async fn test_records_milestones() {
    let mock = MockTransport::new();
    accept_submit(&mock);
    mock.respond_json("/check/", &json!({"state": "SUCCESS", "status_msg": "Accepted"}));
    let log = Arc::new(DiagnosticLog::new());

    submitter(&mock)
        .with_diagnostics(log.clone())
        .submit(CODE, "rust", "two-sum", "1", Some(&auth()), &CancellationToken::new())
        .await
        .unwrap();

    let titles: Vec<String> = log.entries().into_iter().map(|e| e.title).collect();
    assert_eq!(titles, vec!["Submission judged", "Submission queued"]);
}
