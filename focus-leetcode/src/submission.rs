//! Code submission and judge polling.
//!
//! A submission is a POST to the problem's submit endpoint followed by a
//! poll loop against the check endpoint. The check payload is notoriously
//! loose, so each response goes through three decode stages: strict serde,
//! a brace-sliced retry, and finally a counted failure.

use std::sync::Arc;

use focus_core::AuthSession;
use focus_fetch::{
    DiagnosticCategory, DiagnosticEntry, DiagnosticLevel, DiagnosticSink, FetchContext,
    HttpRequest,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::SubmissionError;
use crate::lenient::{self, brace_slice, preview};
use crate::urls::build_url;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    lang: &'a str,
    question_id: &'a str,
    typed_code: &'a str,
}

/// Response to the submit POST.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    /// Id to poll.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub submission_id: Option<i64>,
    /// Numeric status.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub status_code: Option<i64>,
    /// Status text.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub status_msg: Option<String>,
    /// Rejection reason.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub error: Option<String>,
}

/// A judge verdict, possibly still pending.
///
/// Every field is optional and decoded across types: the judge sends
/// `"finished": "true"`, `"total_correct": "3"`, and similar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionCheck {
    /// Judge state, `"SUCCESS"` once done.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub state: Option<String>,
    /// Explicit completion flag.
    #[serde(default, deserialize_with = "lenient::de::boolean")]
    pub finished: Option<bool>,
    /// Numeric verdict, 10 for Accepted.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub status_code: Option<i64>,
    /// Verdict text such as `"Accepted"` or `"Wrong Answer"`.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub status_msg: Option<String>,
    /// Whether the code ran without crashing.
    #[serde(default, deserialize_with = "lenient::de::boolean")]
    pub run_success: Option<bool>,
    /// Number of test cases.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub total_testcases: Option<i64>,
    /// Number of passing test cases.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub total_correct: Option<i64>,
    /// Runtime error text.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub runtime_error: Option<String>,
    /// Compiler output.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub compile_error: Option<String>,
    /// Input of the first failing case.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub last_testcase: Option<String>,
    /// Expected output of the first failing case.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub expected_output: Option<String>,
    /// Actual output of the first failing case.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub code_output: Option<String>,
    /// Captured stdout.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub stdout: Option<String>,
    /// Memory in bytes.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub memory: Option<i64>,
    /// Memory for display, e.g. `"17.2 MB"`.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub status_memory: Option<String>,
    /// Runtime in milliseconds.
    #[serde(default, deserialize_with = "lenient::de::int")]
    pub runtime: Option<i64>,
    /// Runtime for display, e.g. `"4 ms"`.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub status_runtime: Option<String>,
    /// Percentile beaten on runtime.
    #[serde(default, deserialize_with = "lenient::de::float")]
    pub runtime_percentile: Option<f64>,
    /// Percentile beaten on memory.
    #[serde(default, deserialize_with = "lenient::de::float")]
    pub memory_percentile: Option<f64>,
}

/// Numeric status the judge uses for Accepted.
pub const ACCEPTED_STATUS_CODE: i64 = 10;

impl SubmissionCheck {
    /// Returns true once judging is done.
    pub fn is_complete(&self) -> bool {
        self.finished == Some(true)
            || self
                .state
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("SUCCESS"))
    }

    /// Returns true if the verdict is Accepted.
    pub fn is_accepted(&self) -> bool {
        self.status_code == Some(ACCEPTED_STATUS_CODE)
            || self
                .status_msg
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("accepted"))
    }

    /// One-line verdict, e.g. `"Accepted (63/63)"`.
    pub fn summary(&self) -> String {
        let verdict = self.status_msg.as_deref().unwrap_or("Unknown");
        match (self.total_correct, self.total_testcases) {
            (Some(correct), Some(total)) => format!("{verdict} ({correct}/{total})"),
            _ => verdict.to_string(),
        }
    }
}

/// How a check body decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckDecode {
    /// Decoded as-is.
    Strict(SubmissionCheck),
    /// Decoded after slicing out the outermost braces.
    Recovered(SubmissionCheck),
    /// Neither attempt worked.
    Unreadable,
}

/// Decodes a check body, salvaging a wrapped JSON object if needed.
pub fn decode_check(body: &[u8]) -> CheckDecode {
    if let Ok(check) = serde_json::from_slice::<SubmissionCheck>(body) {
        return CheckDecode::Strict(check);
    }
    brace_slice(body)
        .and_then(|slice| serde_json::from_slice::<SubmissionCheck>(slice).ok())
        .map_or(CheckDecode::Unreadable, CheckDecode::Recovered)
}

// ============================================================================
// Submitter
// ============================================================================

/// Submits code as the signed-in user and polls for the verdict.
#[derive(Clone)]
pub struct SubmissionSubmitter {
    ctx: Arc<FetchContext>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl SubmissionSubmitter {
    /// Creates a submitter over `ctx`.
    pub fn new(ctx: Arc<FetchContext>) -> Self {
        Self {
            ctx,
            diagnostics: None,
        }
    }

    /// Records submission milestones to `sink`.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    fn record(&self, entry: DiagnosticEntry) {
        if let Some(sink) = &self.diagnostics {
            sink.record(entry);
        }
    }

    fn site_url(&self, segments: &[&str]) -> Result<String, SubmissionError> {
        build_url(&self.ctx.endpoints.site_base, segments, &[]).map_err(SubmissionError::InvalidUrl)
    }

    fn authed(
        &self,
        request: HttpRequest,
        slug: &str,
        auth: &AuthSession,
    ) -> Result<HttpRequest, SubmissionError> {
        let referer = self.site_url(&["problems", slug, ""])?;
        Ok(request
            .accept_json()
            .header("Origin", self.ctx.endpoints.site_base.trim_end_matches('/'))
            .header("Referer", referer)
            .header("X-CSRFToken", auth.csrf_token.as_str())
            .header("Cookie", auth.cookie_header()))
    }

    /// Submits `code` and waits for the verdict.
    ///
    /// # Errors
    ///
    /// - [`SubmissionError::MissingAuth`] if `auth` is absent, incomplete, or expired
    /// - [`SubmissionError::SubmissionFailed`] if LeetCode rejects the code or
    ///   keeps sending unreadable data
    /// - [`SubmissionError::Timeout`] if judging outlasts the poll budget
    /// - [`SubmissionError::Cancelled`] if `cancel` fires
    #[instrument(skip(self, code, auth, cancel))]
    pub async fn submit(
        &self,
        code: &str,
        lang: &str,
        slug: &str,
        question_id: &str,
        auth: Option<&AuthSession>,
        cancel: &CancellationToken,
    ) -> Result<SubmissionCheck, SubmissionError> {
        let max_age = chrono::Duration::from_std(self.ctx.settings.poll.auth_max_age)
            .unwrap_or(chrono::Duration::MAX);
        let auth = auth
            .filter(|a| a.is_usable(max_age))
            .ok_or(SubmissionError::MissingAuth)?;

        if cancel.is_cancelled() {
            return Err(SubmissionError::Cancelled);
        }

        let submission_id = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SubmissionError::Cancelled),
            id = self.submit_code(code, lang, slug, question_id, auth) => id?,
        };

        info!(submission_id, "Submission accepted for judging");
        self.record(
            DiagnosticEntry::new(
                DiagnosticLevel::Info,
                DiagnosticCategory::Submission,
                "Submission queued",
                format!("Submitted {slug} in {lang}"),
            )
            .with("submission_id", submission_id),
        );

        let result = self.poll(submission_id, slug, auth, cancel).await;
        match &result {
            Ok(check) => self.record(
                DiagnosticEntry::new(
                    DiagnosticLevel::Info,
                    DiagnosticCategory::Submission,
                    "Submission judged",
                    check.summary(),
                )
                .with("submission_id", submission_id),
            ),
            Err(e) => self.record(
                DiagnosticEntry::new(
                    DiagnosticLevel::Error,
                    DiagnosticCategory::Submission,
                    "Submission failed",
                    e.to_string(),
                )
                .with("submission_id", submission_id),
            ),
        }
        result
    }

    /// POSTs the code and returns the submission id.
    async fn submit_code(
        &self,
        code: &str,
        lang: &str,
        slug: &str,
        question_id: &str,
        auth: &AuthSession,
    ) -> Result<i64, SubmissionError> {
        let url = self.site_url(&["problems", slug, "submit", ""])?;
        let body = SubmitRequest {
            lang,
            question_id,
            typed_code: code,
        };
        let request = self.authed(HttpRequest::post_json(url, &body)?, slug, auth)?;
        let response = self.ctx.transport.execute(request).await?;

        let parsed: SubmitResponse = serde_json::from_slice(&response).map_err(|_| {
            SubmissionError::SubmissionFailed(format!(
                "Unexpected response from LeetCode (decode error). Preview: {}",
                preview(&response, self.ctx.settings.poll.preview_bytes)
            ))
        })?;

        if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
            return Err(SubmissionError::SubmissionFailed(error));
        }
        parsed.submission_id.ok_or(SubmissionError::InvalidResponse)
    }

    /// Polls the check endpoint until judging completes.
    ///
    /// Unreadable responses draw on the decode-failure budget, not on
    /// `max_attempts`, so total latency can exceed the nominal poll budget.
    /// The failure count is consecutive: any readable response resets it,
    /// so intermittent garbage between pending checks never aborts a poll.
    async fn poll(
        &self,
        submission_id: i64,
        slug: &str,
        auth: &AuthSession,
        cancel: &CancellationToken,
    ) -> Result<SubmissionCheck, SubmissionError> {
        let poll = &self.ctx.settings.poll;
        let id = submission_id.to_string();
        let request = self.authed(
            HttpRequest::get(self.site_url(&["submissions", "detail", &id, "check", ""])?),
            slug,
            auth,
        )?;

        let mut attempts = 0;
        let mut decode_failures = 0;

        while attempts < poll.max_attempts {
            if cancel.is_cancelled() {
                return Err(SubmissionError::Cancelled);
            }

            let body = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SubmissionError::Cancelled),
                body = self.ctx.transport.execute(request.clone()) => body?,
            };

            match decode_check(&body) {
                CheckDecode::Strict(check) => {
                    decode_failures = 0;
                    if check.is_complete() {
                        return Ok(check);
                    }
                    attempts += 1;
                    debug!(attempts, state = ?check.state, "Still judging");
                }
                CheckDecode::Recovered(check) => {
                    decode_failures = 0;
                    if check.is_complete() {
                        return Ok(check);
                    }
                    attempts += 1;
                    debug!(attempts, "Recovered a wrapped check response");
                }
                CheckDecode::Unreadable => {
                    decode_failures += 1;
                    warn!(decode_failures, "Unreadable check response");
                    if decode_failures >= poll.max_decode_failures {
                        return Err(SubmissionError::SubmissionFailed(format!(
                            "LeetCode returned unreadable responses ({decode_failures} times). Preview: {}",
                            preview(&body, poll.preview_bytes)
                        )));
                    }
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(SubmissionError::Cancelled),
                () = tokio::time::sleep(poll.interval) => {}
            }
        }

        Err(SubmissionError::Timeout)
    }
}

impl std::fmt::Debug for SubmissionSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionSubmitter")
            .field("ctx", &self.ctx)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringly_finished() {
        let CheckDecode::Strict(check) =
            decode_check(br#"{"finished":"true","status_msg":"Accepted","total_correct":"63","total_testcases":63}"#)
        else {
            panic!("expected strict decode");
        };
        assert!(check.is_complete());
        assert!(check.is_accepted());
        assert_eq!(check.summary(), "Accepted (63/63)");
    }

    #[test]
    fn test_state_success_completes() {
        let CheckDecode::Strict(check) = decode_check(br#"{"state":"success","status_code":"11"}"#)
        else {
            panic!("expected strict decode");
        };
        assert!(check.is_complete());
        assert!(!check.is_accepted());
    }

    #[test]
    fn test_pending_is_not_complete() {
        let CheckDecode::Strict(check) = decode_check(br#"{"state":"PENDING"}"#) else {
            panic!("expected strict decode");
        };
        assert!(!check.is_complete());
    }

    #[test]
    fn test_wrapped_body_recovers() {
        let body = b"<!-- cache -->{\"state\":\"SUCCESS\",\"runtime_percentile\":\"91.5\"}\n";
        let CheckDecode::Recovered(check) = decode_check(body) else {
            panic!("expected recovery");
        };
        assert!(check.is_complete());
        assert_eq!(check.runtime_percentile, Some(91.5));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        assert_eq!(decode_check(b"<html>502</html>"), CheckDecode::Unreadable);
        assert_eq!(decode_check(b"\"queued\""), CheckDecode::Unreadable);
    }
}
