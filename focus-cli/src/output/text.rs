//! Text output formatting with progress bars and colors.

use chrono::{DateTime, Local, Utc};
use focus_fetch::{DiagnosticEntry, DiagnosticLevel};

use super::json::{
    AttemptOutput, AuthOutput, EntryOutput, ProgressOutput, SolvedOutput, SyncOutput,
};
use focus_core::QuestionContent;
use focus_leetcode::SubmissionCheck;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

const RULE_WIDTH: usize = 50;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Set the progress bar width.
    #[must_use]
    #[allow(dead_code)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Formats a completion bar.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress_bar(&self, percent_done: f64) -> String {
        let clamped = percent_done.clamp(0.0, 100.0);
        let filled = ((clamped / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(percent_done, &bar)
    }

    // ========================================================================
    // Sync
    // ========================================================================

    /// Formats a sync result.
    pub fn format_sync(&self, sync: &SyncOutput) -> String {
        let mut lines = Vec::new();

        let header = if sync.dry_run {
            format!("Sync preview for {} ({})", self.bold(&sync.username), sync.trigger)
        } else {
            format!("Synced {} ({})", self.bold(&sync.username), sync.trigger)
        };
        lines.push(header);

        let verb = if sync.dry_run { "would complete" } else { "newly completed" };
        if sync.new == 0 {
            lines.push(self.dim(&format!(
                "Nothing new ({} plan entries already done)",
                sync.matched
            )));
        } else {
            lines.push(format!(
                "{} {verb}, {} matched",
                self.green(&sync.new.to_string()),
                sync.matched
            ));
        }

        for entry in &sync.newly_completed {
            lines.push(format!("  {} {}", self.green("✓"), self.format_entry(entry)));
        }

        lines.join("\n")
    }

    fn format_entry(&self, entry: &EntryOutput) -> String {
        format!(
            "{:<6} {} {}",
            entry.key,
            entry.name,
            self.dim(&format!("({})", entry.difficulty))
        )
    }

    // ========================================================================
    // Solved
    // ========================================================================

    /// Formats the solved slug list, with the tier report when `verbose`.
    pub fn format_solved(&self, solved: &SolvedOutput, verbose: bool) -> String {
        let mut lines = Vec::new();

        let source = solved
            .strategy
            .as_deref()
            .map_or_else(|| self.red("no source"), |s| self.cyan(s));
        lines.push(format!(
            "{} solved by {} (limit {}, via {})",
            self.bold(&solved.count.to_string()),
            solved.username,
            solved.limit,
            source
        ));

        for slug in &solved.slugs {
            lines.push(format!("  {slug}"));
        }

        if verbose {
            lines.push(String::new());
            lines.push(self.bold("Attempts"));
            for attempt in &solved.attempts {
                lines.push(self.format_attempt(attempt));
            }
        }

        lines.join("\n")
    }

    fn format_attempt(&self, attempt: &AttemptOutput) -> String {
        let status = if attempt.success {
            self.green(&format!("✓ {} found", attempt.found))
        } else {
            self.red(&format!(
                "✗ {}",
                attempt.error.as_deref().unwrap_or("failed")
            ))
        };
        format!(
            "  {:<28} {:<8} {:>6}ms  {}",
            attempt.strategy, attempt.kind, attempt.duration_ms, status
        )
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Formats plan completion per day.
    pub fn format_progress(&self, progress: &ProgressOutput, verbose: bool) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold("Study Plan Progress"));
        lines.push("─".repeat(RULE_WIDTH));

        for day in &progress.days {
            let pct = percent(day.completed, day.total);
            let label = match &day.topic {
                Some(topic) => format!("Day {} {}", day.id, self.dim(topic)),
                None => format!("Day {}", day.id),
            };
            lines.push(format!(
                "{} {}/{}  {}",
                self.progress_bar(pct),
                day.completed,
                day.total,
                label
            ));

            if verbose {
                for entry in &day.problems {
                    let mark = if entry.completed {
                        self.green("✓")
                    } else {
                        self.dim("·")
                    };
                    lines.push(format!("    {mark} {}", self.format_entry(entry)));
                }
            }
        }

        lines.push("─".repeat(RULE_WIDTH));
        let pct = percent(progress.completed, progress.total);
        lines.push(format!(
            "Total: {}/{} ({})",
            progress.completed,
            progress.total,
            self.color_for_percent(pct, &format!("{pct:.0}%"))
        ));

        lines.join("\n")
    }

    // ========================================================================
    // Problem & Submission
    // ========================================================================

    /// Formats problem content, with the starter code for `lang` if given.
    pub fn format_problem(&self, content: &QuestionContent, lang: Option<&str>) -> String {
        let mut lines = Vec::new();

        let id = content.question_id.as_deref().unwrap_or("?");
        lines.push(format!("{} {}", self.bold(&content.title), self.dim(&format!("#{id}"))));
        lines.push(format!("Difficulty: {}", self.color_difficulty(&content.difficulty)));
        lines.push("─".repeat(RULE_WIDTH));
        lines.push(content.content.trim().to_string());

        if !content.example_testcases.trim().is_empty() {
            lines.push(String::new());
            lines.push(self.bold("Example testcases"));
            lines.push(content.example_testcases.trim().to_string());
        }

        lines.push(String::new());
        match lang {
            Some(lang) => match content.snippet(lang) {
                Some(code) => {
                    lines.push(self.bold(&format!("Starter code ({lang})")));
                    lines.push(code.to_string());
                }
                None => lines.push(self.yellow(&format!("No starter code for {lang}"))),
            },
            None => {
                let mut langs: Vec<&str> =
                    content.code_snippets.keys().map(String::as_str).collect();
                langs.sort_unstable();
                lines.push(format!("Languages: {}", langs.join(", ")));
            }
        }

        lines.join("\n")
    }

    /// Formats a judge verdict.
    pub fn format_check(&self, check: &SubmissionCheck) -> String {
        let mut lines = Vec::new();

        let summary = check.summary();
        if check.is_accepted() {
            lines.push(self.green(&format!("✓ {summary}")));
        } else {
            lines.push(self.red(&format!("✗ {summary}")));
        }

        if let (Some(runtime), Some(memory)) = (&check.status_runtime, &check.status_memory) {
            let beats = match (check.runtime_percentile, check.memory_percentile) {
                (Some(rt), Some(mem)) => format!(" (beats {rt:.1}% / {mem:.1}%)"),
                _ => String::new(),
            };
            lines.push(format!("Runtime {runtime}, memory {memory}{beats}"));
        }

        let details = [
            ("Compile error", &check.compile_error),
            ("Runtime error", &check.runtime_error),
            ("Last input", &check.last_testcase),
            ("Expected", &check.expected_output),
            ("Output", &check.code_output),
            ("Stdout", &check.stdout),
        ];
        for (label, value) in details {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                lines.push(format!("{}: {}", self.bold(label), value.trim_end()));
            }
        }

        lines.join("\n")
    }

    // ========================================================================
    // Auth & Diagnostics
    // ========================================================================

    /// Formats the stored session status. Never prints secrets.
    pub fn format_auth(&self, auth: &AuthOutput) -> String {
        if !auth.stored {
            return self.yellow("No LeetCode session stored");
        }

        let status = if auth.usable {
            self.green("usable")
        } else if auth.complete {
            self.red("expired")
        } else {
            self.red("incomplete")
        };

        match auth.updated_at {
            Some(at) => format!(
                "Session: {status}\nSaved:   {}",
                at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
            ),
            None => format!("Session: {status}"),
        }
    }

    /// Formats diagnostic entries, newest first.
    pub fn format_diagnostics(&self, entries: &[DiagnosticEntry]) -> String {
        if entries.is_empty() {
            return self.dim("No diagnostics recorded");
        }

        let mut lines = vec![self.bold("Diagnostics"), "─".repeat(RULE_WIDTH)];
        for entry in entries {
            let level = match entry.level {
                DiagnosticLevel::Info => self.dim("INFO "),
                DiagnosticLevel::Warning => self.yellow("WARN "),
                DiagnosticLevel::Error => self.red("ERROR"),
            };
            lines.push(format!(
                "{} {level} [{}] {}: {}",
                format_time(entry.timestamp),
                entry.category,
                self.bold(&entry.title),
                entry.message
            ));
            for (key, value) in &entry.metadata {
                lines.push(format!("    {}", self.dim(&format!("{key}={value}"))));
            }
        }

        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(context), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < 20.0 {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn color_difficulty(&self, difficulty: &str) -> String {
        match difficulty.to_ascii_lowercase().as_str() {
            "easy" => self.green(difficulty),
            "medium" => self.yellow(difficulty),
            "hard" => self.red(difficulty),
            _ => self.dim(difficulty),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert!((percent(1, 4) - 25.0).abs() < f64::EPSILON);
        assert!(percent(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_bar_clamps() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(150.0), "██████████");
        assert_eq!(formatter.progress_bar(-5.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_color_for_percent() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.color_for_percent(15.0, "x").contains(RED));
        assert!(formatter.color_for_percent(35.0, "x").contains(YELLOW));
        assert!(formatter.color_for_percent(75.0, "x").contains(GREEN));
    }

    #[test]
    fn test_difficulty_colors() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.color_difficulty("Hard").contains(RED));
        assert!(formatter.color_difficulty("Unknown").contains(DIM));
    }
}
