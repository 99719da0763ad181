//! Wire types for the REST mirror and the GraphQL endpoint.
//!
//! Every upstream payload is decoded leniently: one malformed field should
//! not cost the rest of the response.

use std::collections::HashMap;

use focus_core::{QuestionContent, humanize_slug};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::LeetCodeError;
use crate::lenient::{self, lossy_string};

/// Difficulty label used when neither upstream has one.
pub const UNKNOWN_DIFFICULTY: &str = "Unknown";

// ============================================================================
// REST Submission List
// ============================================================================

/// One row of a REST submission listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RestSubmission {
    /// Problem slug.
    #[serde(rename = "titleSlug")]
    pub title_slug: String,
    /// Verdict text such as `"Accepted"`.
    #[serde(
        rename = "statusDisplay",
        default,
        deserialize_with = "lenient::de::string"
    )]
    pub status_display: Option<String>,
    /// Submission time, seconds since epoch as sent.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub timestamp: Option<String>,
    /// Language name.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub lang: Option<String>,
}

impl RestSubmission {
    /// Returns true if the verdict is Accepted, ignoring case.
    pub fn is_accepted(&self) -> bool {
        self.status_display
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("accepted"))
    }
}

/// Parses a REST submission listing.
///
/// The list lives under `submission` or, on some mirror versions,
/// `submissions`. A missing or malformed list decodes as empty; only a body
/// that is not JSON at all is an error.
pub fn parse_submission_list(body: &[u8]) -> Result<Vec<RestSubmission>, LeetCodeError> {
    let value: Value = serde_json::from_slice(body)?;

    for key in ["submission", "submissions"] {
        let rows = value
            .get(key)
            .and_then(|list| serde_json::from_value::<Vec<RestSubmission>>(list.clone()).ok());
        if let Some(rows) = rows {
            return Ok(rows);
        }
    }

    Ok(Vec::new())
}

// ============================================================================
// REST Problem
// ============================================================================

/// Problem content as returned by the REST mirror, before fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestProblem {
    /// Title, `""` when absent.
    pub title: String,
    /// HTML description, `""` when absent.
    pub content: String,
    /// Example inputs.
    pub example_testcases: String,
    /// Sample input.
    pub sample_test_case: String,
    /// Difficulty label, `""` when absent.
    pub difficulty: String,
    /// Starter code keyed by language slug.
    pub code_snippets: HashMap<String, String>,
    /// Function signature metadata.
    pub meta_data: Option<String>,
    /// Platform question id.
    pub question_id: Option<String>,
}

impl RestProblem {
    /// Converts to [`QuestionContent`] without applying fallbacks.
    pub fn into_content(self) -> QuestionContent {
        QuestionContent {
            title: self.title,
            content: self.content,
            example_testcases: self.example_testcases,
            sample_test_case: self.sample_test_case,
            difficulty: self.difficulty,
            code_snippets: self.code_snippets,
            meta_data: self.meta_data,
            question_id: self.question_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestSnippet {
    #[serde(rename = "langSlug")]
    lang_slug: String,
    #[serde(default)]
    code: String,
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(lossy_string)
}

/// Parses the REST `/select` problem payload field by field.
pub fn parse_problem(body: &[u8]) -> Result<RestProblem, LeetCodeError> {
    let value: Value = serde_json::from_slice(body)?;
    if !value.is_object() {
        return Err(LeetCodeError::Decoding(
            "problem payload is not an object".to_string(),
        ));
    }

    let code_snippets = value
        .get("codeSnippets")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<RestSnippet>(item.clone()).ok())
                .map(|s| (s.lang_slug, s.code))
                .collect()
        })
        .unwrap_or_default();

    Ok(RestProblem {
        title: text_field(&value, &["title", "questionTitle"]).unwrap_or_default(),
        content: text_field(&value, &["content", "question"]).unwrap_or_default(),
        example_testcases: text_field(&value, &["exampleTestcases"]).unwrap_or_default(),
        sample_test_case: text_field(&value, &["sampleTestCase"]).unwrap_or_default(),
        difficulty: text_field(&value, &["difficulty"]).unwrap_or_default(),
        code_snippets,
        meta_data: text_field(&value, &["metaData"]),
        question_id: text_field(&value, &["questionId", "questionFrontendId"]),
    })
}

// ============================================================================
// REST Profile
// ============================================================================

/// Extracts the canonical username from a REST profile payload.
///
/// Looks at `username`, then `profile.username`, then
/// `userProfile.username`. Returns `None` when none is a non-empty string.
pub fn parse_profile_username(body: &[u8]) -> Result<Option<String>, LeetCodeError> {
    let value: Value = serde_json::from_slice(body)?;

    let candidates = [
        value.get("username"),
        value.get("profile").and_then(|p| p.get("username")),
        value.get("userProfile").and_then(|p| p.get("username")),
    ];

    Ok(candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string))
}

// ============================================================================
// GraphQL
// ============================================================================

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    /// Payload, absent on hard errors.
    pub data: Option<T>,
    /// Error list.
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorMessage>>,
}

/// One GraphQL error.
#[derive(Debug, Deserialize)]
pub struct GraphQlErrorMessage {
    /// Error text.
    #[serde(default)]
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Returns the data, or the joined error messages when any were sent.
    pub fn into_result(self) -> Result<Option<T>, LeetCodeError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(LeetCodeError::GraphQl(
                errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
            _ => Ok(self.data),
        }
    }
}

/// Decodes a GraphQL envelope and unwraps it.
pub fn parse_graphql<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, LeetCodeError> {
    serde_json::from_slice::<GraphQlResponse<T>>(body)?.into_result()
}

/// `recentAcSubmissionList` payload.
#[derive(Debug, Default, Deserialize)]
pub struct RecentAcSubmissions {
    /// Accepted submissions, newest first.
    #[serde(rename = "recentAcSubmissionList", default)]
    pub list: Option<Vec<GraphQlSubmission>>,
}

/// One accepted submission from GraphQL.
#[derive(Debug, Deserialize)]
pub struct GraphQlSubmission {
    /// Problem slug.
    #[serde(rename = "titleSlug")]
    pub title_slug: String,
}

/// `questionData` payload.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionData {
    /// The question, absent for unknown slugs.
    #[serde(default)]
    pub question: Option<GraphQlQuestion>,
}

/// A code snippet from GraphQL.
#[derive(Debug, Deserialize)]
pub struct GraphQlSnippet {
    /// Language slug.
    #[serde(rename = "langSlug")]
    pub lang_slug: String,
    /// Starter code.
    #[serde(default)]
    pub code: String,
}

/// Question fields requested by `questionData`.
///
/// Premium questions come back with `null` content, so every text field is
/// optional here.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlQuestion {
    /// Platform question id.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub question_id: Option<String>,
    /// Title.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub title: Option<String>,
    /// HTML description.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub content: Option<String>,
    /// Example inputs.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub example_testcases: Option<String>,
    /// Sample input.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub sample_test_case: Option<String>,
    /// Difficulty label.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub difficulty: Option<String>,
    /// Starter code per language.
    #[serde(default)]
    pub code_snippets: Option<Vec<GraphQlSnippet>>,
    /// Function signature metadata.
    #[serde(default, deserialize_with = "lenient::de::string")]
    pub meta_data: Option<String>,
}

impl GraphQlQuestion {
    /// Converts to [`QuestionContent`] without applying fallbacks.
    pub fn into_content(self) -> QuestionContent {
        QuestionContent {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            example_testcases: self.example_testcases.unwrap_or_default(),
            sample_test_case: self.sample_test_case.unwrap_or_default(),
            difficulty: self.difficulty.unwrap_or_default(),
            code_snippets: self
                .code_snippets
                .unwrap_or_default()
                .into_iter()
                .map(|s| (s.lang_slug, s.code))
                .collect(),
            meta_data: self.meta_data,
            question_id: self.question_id,
        }
    }
}

// ============================================================================
// Fallbacks
// ============================================================================

/// Fills an empty title from the slug and an empty difficulty with
/// [`UNKNOWN_DIFFICULTY`].
pub fn apply_display_fallbacks(mut content: QuestionContent, slug: &str) -> QuestionContent {
    if content.title.trim().is_empty() {
        content.title = humanize_slug(slug);
    }
    if content.difficulty.trim().is_empty() {
        content.difficulty = UNKNOWN_DIFFICULTY.to_string();
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_list_under_either_key() {
        let a = br#"{"submission":[{"titleSlug":"two-sum","statusDisplay":"Accepted"}]}"#;
        let b = br#"{"count":1,"submissions":[{"titleSlug":"two-sum"}]}"#;
        assert_eq!(parse_submission_list(a).unwrap().len(), 1);
        assert_eq!(parse_submission_list(b).unwrap()[0].title_slug, "two-sum");
    }

    #[test]
    fn test_submission_list_malformed_is_empty() {
        let body = br#"{"submission":"rate limited"}"#;
        assert!(parse_submission_list(body).unwrap().is_empty());
        assert!(parse_submission_list(b"{}").unwrap().is_empty());
        assert!(parse_submission_list(b"<html>").is_err());
    }

    #[test]
    fn test_accepted_case_insensitive() {
        let rows = parse_submission_list(
            br#"{"submission":[
                {"titleSlug":"a","statusDisplay":"ACCEPTED","timestamp":1700000000},
                {"titleSlug":"b","statusDisplay":"Wrong Answer"},
                {"titleSlug":"c"}
            ]}"#,
        )
        .unwrap();
        let accepted: Vec<_> = rows.iter().filter(|r| r.is_accepted()).collect();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].timestamp.as_deref(), Some("1700000000"));
    }

    #[test]
    fn test_problem_alias_fields() {
        let body = br#"{
            "questionTitle": "Two Sum",
            "question": "<p>Find</p>",
            "difficulty": "Easy",
            "questionId": 1,
            "codeSnippets": [
                {"lang": "Python3", "langSlug": "python3", "code": "class Solution:"},
                {"lang": "Broken"}
            ]
        }"#;
        let problem = parse_problem(body).unwrap();
        assert_eq!(problem.title, "Two Sum");
        assert_eq!(problem.content, "<p>Find</p>");
        assert_eq!(problem.question_id.as_deref(), Some("1"));
        assert_eq!(problem.code_snippets.len(), 1);
        assert!(problem.meta_data.is_none());
    }

    #[test]
    fn test_profile_username_paths() {
        assert_eq!(
            parse_profile_username(br#"{"username":"alice"}"#).unwrap(),
            Some("alice".to_string())
        );
        assert_eq!(
            parse_profile_username(br#"{"profile":{"username":"bob"}}"#).unwrap(),
            Some("bob".to_string())
        );
        assert_eq!(
            parse_profile_username(br#"{"username":"","userProfile":{"username":"carol"}}"#)
                .unwrap(),
            Some("carol".to_string())
        );
        assert_eq!(
            parse_profile_username(br#"{"errors":"User not found"}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_graphql_errors_joined() {
        let body = br#"{"data":null,"errors":[{"message":"a"},{"message":"b"}]}"#;
        let err = parse_graphql::<QuestionData>(body).unwrap_err();
        assert!(matches!(err, LeetCodeError::GraphQl(ref m) if m == "a; b"));
    }

    #[test]
    fn test_graphql_question_null_fields() {
        let body = br#"{"data":{"question":{"title":"Two Sum","content":null,"questionId":"1"}}}"#;
        let data = parse_graphql::<QuestionData>(body).unwrap().unwrap();
        let content = data.question.unwrap().into_content();
        assert_eq!(content.title, "Two Sum");
        assert_eq!(content.content, "");
        assert!(content.code_snippets.is_empty());
    }

    #[test]
    fn test_display_fallbacks() {
        let content = apply_display_fallbacks(QuestionContent::default(), "two-sum");
        assert_eq!(content.title, "Two Sum");
        assert_eq!(content.difficulty, UNKNOWN_DIFFICULTY);
    }
}
