//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use focus_core::{Problem, ProblemKey, QuestionContent};
use focus_fetch::FetchAttempt;
use focus_leetcode::SubmissionCheck;
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// One plan entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOutput {
    pub key: String,
    pub name: String,
    pub difficulty: String,
    pub url: String,
    pub completed: bool,
}

impl EntryOutput {
    pub fn new(key: ProblemKey, problem: &Problem, completed: bool) -> Self {
        Self {
            key: key.to_string(),
            name: problem.name.clone(),
            difficulty: problem.difficulty.to_string(),
            url: problem.url.clone(),
            completed,
        }
    }
}

/// Result of `sync`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub username: String,
    pub trigger: String,
    pub dry_run: bool,
    pub matched: usize,
    pub new: usize,
    pub newly_completed: Vec<EntryOutput>,
}

/// One cascade tier attempt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutput {
    pub strategy: String,
    pub kind: String,
    pub success: bool,
    pub found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u128,
}

impl From<&FetchAttempt> for AttemptOutput {
    fn from(attempt: &FetchAttempt) -> Self {
        Self {
            strategy: attempt.strategy_id.clone(),
            kind: attempt.kind.to_string(),
            success: attempt.success,
            found: attempt.found,
            error: attempt.error.clone(),
            duration_ms: attempt.duration.as_millis(),
        }
    }
}

/// Result of `solved`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedOutput {
    pub username: String,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub count: usize,
    pub slugs: Vec<String>,
    pub attempts: Vec<AttemptOutput>,
}

/// Completion of one plan day.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOutput {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub completed: usize,
    pub total: usize,
    pub problems: Vec<EntryOutput>,
}

/// Result of `progress`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOutput {
    pub completed: usize,
    pub total: usize,
    pub days: Vec<DayOutput>,
}

/// Result of `problem`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemOutput<'a> {
    pub slug: &'a str,
    #[serde(flatten)]
    pub content: &'a QuestionContent,
}

/// Result of `submit`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutput<'a> {
    pub slug: &'a str,
    pub lang: &'a str,
    pub question_id: &'a str,
    pub accepted: bool,
    pub summary: String,
    pub check: &'a SubmissionCheck,
}

/// Result of `validate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOutput {
    pub username: String,
    pub valid: bool,
}

/// Result of `auth show`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthOutput {
    pub stored: bool,
    pub complete: bool,
    pub usable: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_datetime_opt"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use focus_core::Difficulty;
    use std::time::Duration;

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_entry_output_uses_key_format() {
        let problem = Problem::new(
            "Two Sum",
            Difficulty::Easy,
            "https://leetcode.com/problems/two-sum/",
        );
        let entry = EntryOutput::new(ProblemKey::new(3, 1), &problem, true);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["key"], "3-1");
        assert_eq!(value["difficulty"], "Easy");
        assert_eq!(value["completed"], true);
    }

    #[test]
    fn test_attempt_output() {
        let attempt = FetchAttempt::failure(
            "leetcode.rest.accepted",
            focus_fetch::FetchKind::Rest,
            "HTTP 503",
            Duration::from_millis(42),
        );
        let value = serde_json::to_value(AttemptOutput::from(&attempt)).unwrap();
        assert_eq!(value["strategy"], "leetcode.rest.accepted");
        assert_eq!(value["kind"], "REST");
        assert_eq!(value["durationMs"], 42);
        assert_eq!(value["error"], "HTTP 503");
    }

    #[test]
    fn test_problem_output_flattens_content() {
        let content = QuestionContent {
            title: "Two Sum".to_string(),
            difficulty: "Easy".to_string(),
            question_id: Some("1".to_string()),
            ..QuestionContent::default()
        };
        let output = ProblemOutput {
            slug: "two-sum",
            content: &content,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["slug"], "two-sum");
        assert_eq!(value["title"], "Two Sum");
        assert_eq!(value["question_id"], "1");
    }

    #[test]
    fn test_auth_output_skips_missing_timestamp() {
        let output = AuthOutput {
            stored: false,
            complete: false,
            usable: false,
            updated_at: None,
        };
        let json = JsonFormatter::new(false).format(&output).unwrap();
        assert!(!json.contains("updatedAt"));
    }
}
