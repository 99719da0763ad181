//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::json::{
        AttemptOutput, AuthOutput, DayOutput, EntryOutput, ProgressOutput, SolvedOutput,
        SyncOutput,
    };
    use super::super::text::TextFormatter;
    use chrono::Utc;
    use focus_core::QuestionContent;
    use focus_fetch::{DiagnosticCategory, DiagnosticEntry, DiagnosticLevel};
    use focus_leetcode::SubmissionCheck;

    fn entry(key: &str, name: &str, completed: bool) -> EntryOutput {
        EntryOutput {
            key: key.to_string(),
            name: name.to_string(),
            difficulty: "Easy".to_string(),
            url: String::new(),
            completed,
        }
    }

    #[test]
    fn test_progress_bar_boundary_values() {
        let formatter = TextFormatter::new(false);

        let test_cases = vec![
            (0.0, "░░░░░░░░░░"),
            (10.0, "█░░░░░░░░░"),
            (25.0, "███░░░░░░░"), // 2.5 rounds to 3 blocks
            (50.0, "█████░░░░░"),
            (100.0, "██████████"),
        ];

        for (percent, expected) in test_cases {
            let bar = formatter.progress_bar(percent);
            assert_eq!(bar, expected, "Failed for {percent}%");
        }
    }

    #[test]
    fn test_custom_bar_width() {
        let formatter = TextFormatter::new(false).with_bar_width(4);
        assert_eq!(formatter.progress_bar(50.0), "██░░");
    }

    #[test]
    fn test_progress_bar_with_colors() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.progress_bar(10.0).contains("\x1b[31m"));
        assert!(formatter.progress_bar(90.0).contains("\x1b[32m"));
    }

    #[test]
    fn test_sync_lists_new_entries() {
        let formatter = TextFormatter::new(false);
        let sync = SyncOutput {
            username: "alice".to_string(),
            trigger: "manual".to_string(),
            dry_run: false,
            matched: 3,
            new: 1,
            newly_completed: vec![entry("1-0", "Two Sum", true)],
        };

        let output = formatter.format_sync(&sync);
        assert!(output.contains("Synced alice (manual)"));
        assert!(output.contains("1 newly completed, 3 matched"));
        assert!(output.contains("1-0"));
        assert!(output.contains("Two Sum"));
    }

    #[test]
    fn test_sync_nothing_new() {
        let formatter = TextFormatter::new(false);
        let sync = SyncOutput {
            username: "alice".to_string(),
            trigger: "on demand".to_string(),
            dry_run: true,
            matched: 2,
            new: 0,
            newly_completed: Vec::new(),
        };

        let output = formatter.format_sync(&sync);
        assert!(output.contains("Sync preview"));
        assert!(output.contains("Nothing new (2 plan entries already done)"));
    }

    #[test]
    fn test_solved_hides_attempts_unless_verbose() {
        let formatter = TextFormatter::new(false);
        let solved = SolvedOutput {
            username: "alice".to_string(),
            limit: 20,
            strategy: Some("leetcode.graphql.recent".to_string()),
            count: 1,
            slugs: vec!["two-sum".to_string()],
            attempts: vec![AttemptOutput {
                strategy: "leetcode.rest.accepted".to_string(),
                kind: "REST".to_string(),
                success: false,
                found: 0,
                error: Some("HTTP 503".to_string()),
                duration_ms: 12,
            }],
        };

        let quiet = formatter.format_solved(&solved, false);
        assert!(quiet.contains("via leetcode.graphql.recent"));
        assert!(!quiet.contains("HTTP 503"));

        let verbose = formatter.format_solved(&solved, true);
        assert!(verbose.contains("✗ HTTP 503"));
    }

    #[test]
    fn test_progress_totals() {
        let formatter = TextFormatter::new(false);
        let progress = ProgressOutput {
            completed: 1,
            total: 2,
            days: vec![DayOutput {
                id: 1,
                topic: Some("Arrays".to_string()),
                completed: 1,
                total: 2,
                problems: vec![entry("1-0", "Two Sum", true), entry("1-1", "3Sum", false)],
            }],
        };

        let output = formatter.format_progress(&progress, true);
        assert!(output.contains("1/2  Day 1 Arrays"));
        assert!(output.contains("Total: 1/2 (50%)"));
        assert!(output.contains("✓ 1-0"));
        assert!(output.contains("· 1-1"));
    }

    #[test]
    fn test_problem_lists_languages() {
        let formatter = TextFormatter::new(false);
        let mut content = QuestionContent {
            title: "Two Sum".to_string(),
            difficulty: "Easy".to_string(),
            content: "<p>Find two numbers.</p>".to_string(),
            question_id: Some("1".to_string()),
            ..QuestionContent::default()
        };
        content
            .code_snippets
            .insert("rust".to_string(), "impl Solution {}".to_string());
        content
            .code_snippets
            .insert("python3".to_string(), "class Solution:".to_string());

        let output = formatter.format_problem(&content, None);
        assert!(output.contains("Two Sum #1"));
        assert!(output.contains("Languages: python3, rust"));

        let output = formatter.format_problem(&content, Some("rust"));
        assert!(output.contains("Starter code (rust)"));
        assert!(output.contains("impl Solution {}"));

        let output = formatter.format_problem(&content, Some("go"));
        assert!(output.contains("No starter code for go"));
    }

    #[test]
    fn test_check_verdicts() {
        let formatter = TextFormatter::new(false);

        let accepted = SubmissionCheck {
            status_code: Some(10),
            status_msg: Some("Accepted".to_string()),
            total_correct: Some(63),
            total_testcases: Some(63),
            status_runtime: Some("4 ms".to_string()),
            status_memory: Some("17.2 MB".to_string()),
            ..SubmissionCheck::default()
        };
        let output = formatter.format_check(&accepted);
        assert!(output.contains("✓ Accepted (63/63)"));
        assert!(output.contains("Runtime 4 ms, memory 17.2 MB"));

        let wrong = SubmissionCheck {
            status_code: Some(11),
            status_msg: Some("Wrong Answer".to_string()),
            expected_output: Some("[0,1]".to_string()),
            code_output: Some("[1,0]".to_string()),
            ..SubmissionCheck::default()
        };
        let output = formatter.format_check(&wrong);
        assert!(output.contains("✗ Wrong Answer"));
        assert!(output.contains("Expected: [0,1]"));
        assert!(output.contains("Output: [1,0]"));
    }

    #[test]
    fn test_auth_never_prints_secrets() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_auth(&AuthOutput {
            stored: true,
            complete: true,
            usable: false,
            updated_at: Some(Utc::now()),
        });
        assert!(output.contains("Session: expired"));

        let none = formatter.format_auth(&AuthOutput {
            stored: false,
            complete: false,
            usable: false,
            updated_at: None,
        });
        assert_eq!(none, "No LeetCode session stored");
    }

    #[test]
    fn test_diagnostics_include_metadata() {
        let formatter = TextFormatter::new(false);
        let entry = DiagnosticEntry::new(
            DiagnosticLevel::Error,
            DiagnosticCategory::Sync,
            "Sync failed",
            "disk full",
        )
        .with("username", "alice");

        let output = formatter.format_diagnostics(&[entry]);
        assert!(output.contains("ERROR [sync] Sync failed: disk full"));
        assert!(output.contains("username=alice"));

        assert_eq!(formatter.format_diagnostics(&[]), "No diagnostics recorded");
    }

    #[test]
    fn test_format_error() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_error("sync", "timed out"),
            "sync: Error - timed out"
        );
    }
}
