//! Problem content as shown in the coding environment.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Description, snippets, and metadata for one problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionContent {
    /// Problem title.
    pub title: String,
    /// HTML description.
    pub content: String,
    /// Newline-separated example inputs.
    pub example_testcases: String,
    /// Single sample input.
    pub sample_test_case: String,
    /// Difficulty label, `"Unknown"` when the platform gave none.
    pub difficulty: String,
    /// Starter code keyed by language slug.
    pub code_snippets: HashMap<String, String>,
    /// Raw JSON metadata describing the function signature.
    pub meta_data: Option<String>,
    /// Platform question id, needed for submission.
    pub question_id: Option<String>,
}

impl QuestionContent {
    /// Returns the starter code for a language slug.
    pub fn snippet(&self, lang_slug: &str) -> Option<&str> {
        self.code_snippets.get(lang_slug).map(String::as_str)
    }

    /// Returns true if structured metadata or snippets are missing.
    pub fn is_incomplete(&self) -> bool {
        self.meta_data.is_none() || self.code_snippets.is_empty()
    }
}
