//! Integration tests for plan loading and slug lookup.

use focus_core::{Plan, ProblemKey, SyncTrigger};

const PLAN_JSON: &str = r#"{
    "days": [
        {
            "id": 1,
            "topic": "Arrays",
            "problems": [
                {"name": "Two Sum", "difficulty": "Easy", "url": "https://leetcode.com/problems/two-sum/"},
                {"name": "Group Anagrams", "difficulty": "medium", "url": "https://leetcode.com/problems/group-anagrams/"}
            ]
        },
        {
            "id": 2,
            "problems": [
                {"name": "Custom", "difficulty": "Hard", "url": "https://example.com/not-a-problem"}
            ]
        }
    ]
}"#;

#[test]
fn test_plan_from_json() {
    let plan = Plan::from_json(PLAN_JSON).unwrap();
    assert_eq!(plan.days.len(), 2);
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.days[0].topic.as_deref(), Some("Arrays"));
}

#[test]
fn test_problem_without_slug() {
    let plan = Plan::from_json(PLAN_JSON).unwrap();
    let problem = plan.problem(ProblemKey::new(2, 0)).unwrap();
    assert!(problem.slug().is_none());
}

#[test]
fn test_plan_rejects_bad_json() {
    assert!(Plan::from_json("{\"days\": [{\"id\": \"x\"}]}").is_err());
}

#[test]
fn test_trigger_serialization() {
    let json = serde_json::to_string(&SyncTrigger::DayStart).unwrap();
    assert_eq!(json, "\"day_start\"");
}
