//! Study plan models.
//!
//! The plan is supplied from outside and never changes while the process
//! runs. Sync only reads it to look up slugs and to fix iteration order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::progress::ProblemKey;
use crate::error::CoreError;
use crate::slug::extract_slug;

// ============================================================================
// Difficulty
// ============================================================================

/// Problem difficulty as labelled by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Easy.
    #[serde(alias = "easy", alias = "EASY")]
    Easy,
    /// Medium.
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    /// Hard.
    #[serde(alias = "hard", alias = "HARD")]
    Hard,
}

impl Difficulty {
    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Problem & Day
// ============================================================================

/// A single problem entry in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Display name.
    pub name: String,
    /// Difficulty label.
    pub difficulty: Difficulty,
    /// Problem URL on the platform.
    pub url: String,
}

impl Problem {
    /// Creates a problem entry.
    pub fn new(name: impl Into<String>, difficulty: Difficulty, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            difficulty,
            url: url.into(),
        }
    }

    /// Returns the platform slug for this problem, if the URL carries one.
    pub fn slug(&self) -> Option<String> {
        extract_slug(&self.url)
    }
}

/// One day of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDay {
    /// Day identifier, unique within the plan.
    pub id: u32,
    /// Optional topic label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Problems in fixed order.
    pub problems: Vec<Problem>,
}

impl StudyDay {
    /// Creates a day with the given problems.
    pub fn new(id: u32, problems: Vec<Problem>) -> Self {
        Self {
            id,
            topic: None,
            problems,
        }
    }
}

// ============================================================================
// Plan
// ============================================================================

/// The ordered study schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Days in fixed order.
    pub days: Vec<StudyDay>,
}

impl Plan {
    /// Creates a plan, rejecting duplicate day ids.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPlan`] if two days share an id.
    pub fn new(days: Vec<StudyDay>) -> Result<Self, CoreError> {
        let plan = Self { days };
        plan.validate()?;
        Ok(plan)
    }

    /// Parses a plan from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the plan is invalid.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let plan: Self = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Checks plan invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPlan`] if two days share an id.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for day in &self.days {
            if !seen.insert(day.id) {
                return Err(CoreError::InvalidPlan(format!("duplicate day id {}", day.id)));
            }
        }
        Ok(())
    }

    /// Iterates every problem with its progress key, in day then index order.
    pub fn entries(&self) -> impl Iterator<Item = (ProblemKey, &Problem)> + '_ {
        self.days.iter().flat_map(|day| {
            day.problems
                .iter()
                .enumerate()
                .map(move |(index, problem)| (ProblemKey::new(day.id, index), problem))
        })
    }

    /// Looks up a problem by its progress key.
    pub fn problem(&self, key: ProblemKey) -> Option<&Problem> {
        self.days
            .iter()
            .find(|day| day.id == key.day_id)
            .and_then(|day| day.problems.get(key.index))
    }

    /// Finds the first plan entry whose URL carries `slug`.
    pub fn find_slug(&self, slug: &str) -> Option<(ProblemKey, &Problem)> {
        self.entries()
            .find(|(_, problem)| problem.slug().as_deref() == Some(slug))
    }

    /// Total number of problems across all days.
    pub fn len(&self) -> usize {
        self.days.iter().map(|day| day.problems.len()).sum()
    }

    /// Returns true if the plan has no problems.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        Plan::new(vec![
            StudyDay::new(
                1,
                vec![
                    Problem::new("Two Sum", Difficulty::Easy, "https://leetcode.com/problems/two-sum/"),
                    Problem::new(
                        "Valid Anagram",
                        Difficulty::Easy,
                        "https://leetcode.com/problems/valid-anagram/",
                    ),
                ],
            ),
            StudyDay::new(
                2,
                vec![Problem::new(
                    "LRU Cache",
                    Difficulty::Medium,
                    "https://leetcode.com/problems/lru-cache/",
                )],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_entries_in_order() {
        let plan = sample_plan();
        let keys: Vec<String> = plan.entries().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["1-0", "1-1", "2-0"]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_find_slug() {
        let plan = sample_plan();
        let (key, problem) = plan.find_slug("lru-cache").unwrap();
        assert_eq!(key, ProblemKey::new(2, 0));
        assert_eq!(problem.name, "LRU Cache");
        assert!(plan.find_slug("missing").is_none());
    }

    #[test]
    fn test_duplicate_day_rejected() {
        let result = Plan::new(vec![StudyDay::new(1, vec![]), StudyDay::new(1, vec![])]);
        assert!(matches!(result, Err(CoreError::InvalidPlan(_))));
    }

    #[test]
    fn test_difficulty_aliases() {
        let d: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(d, Difficulty::Medium);
        let d: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(d, Difficulty::Hard);
    }
}
