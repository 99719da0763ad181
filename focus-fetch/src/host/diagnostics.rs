//! Structured diagnostic log for network and sync activity.
//!
//! Every request executed by [`HttpClient`](super::http::HttpClient) produces
//! a request record and either a response or a failure record. Sensitive
//! headers are redacted and bodies truncated before anything is stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::transport::HttpRequest;

/// Maximum entries kept by [`DiagnosticLog`].
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Maximum body characters kept in a record.
pub const MAX_BODY_CHARS: usize = 4000;

/// Headers that never reach a log.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

const REDACTED: &str = "<redacted>";

// ============================================================================
// Entry Types
// ============================================================================

/// Severity of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational.
    Info,
    /// Something unexpected but recoverable.
    Warning,
    /// A failure.
    Error,
}

/// Area a diagnostic entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    /// HTTP traffic.
    Network,
    /// Solved-problem sync.
    Sync,
    /// Code submission.
    Submission,
    /// Everything else.
    App,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Network => "network",
            Self::Sync => "sync",
            Self::Submission => "submission",
            Self::App => "app",
        })
    }
}

/// A single structured diagnostic record.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEntry {
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: DiagnosticLevel,
    /// Area.
    pub category: DiagnosticCategory,
    /// Short title, e.g. `"Request"`.
    pub title: String,
    /// One-line message.
    pub message: String,
    /// Structured key/value details.
    pub metadata: BTreeMap<String, String>,
}

impl DiagnosticEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        level: DiagnosticLevel,
        category: DiagnosticCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            category,
            title: title.into(),
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }
}

// ============================================================================
// Sink
// ============================================================================

/// Receives diagnostic entries.
pub trait DiagnosticSink: Send + Sync {
    /// Records one entry.
    fn record(&self, entry: DiagnosticEntry);
}

/// In-memory ring buffer of recent entries, newest first.
#[derive(Debug)]
pub struct DiagnosticLog {
    entries: Mutex<VecDeque<DiagnosticEntry>>,
    max_entries: usize,
}

impl DiagnosticLog {
    /// Creates a log holding [`DEFAULT_MAX_ENTRIES`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a log holding at most `max_entries` entries.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_entries.min(64))),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns a copy of all entries, newest first.
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn record(&self, entry: DiagnosticEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push_front(entry);
        entries.truncate(self.max_entries);
    }
}

// ============================================================================
// Sanitizing Helpers
// ============================================================================

/// Replaces sensitive header values with `<redacted>`.
pub fn sanitize_headers(headers: &[(String, String)]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let lowered = name.to_ascii_lowercase();
            if SENSITIVE_HEADERS.contains(&lowered.as_str()) {
                (name.clone(), REDACTED.to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

/// Renders a body as text capped at [`MAX_BODY_CHARS`] characters.
pub fn truncate_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= MAX_BODY_CHARS {
        return text.into_owned();
    }
    let mut truncated: String = text.chars().take(MAX_BODY_CHARS).collect();
    truncated.push_str("\n... (truncated)");
    truncated
}

/// Builds a `curl` command that reproduces the request with redacted headers.
pub fn curl_command(request: &HttpRequest) -> String {
    let mut parts = vec![
        "curl".to_string(),
        "-X".to_string(),
        request.method.as_str().to_string(),
        shell_quote(&request.url),
    ];
    for (name, value) in sanitize_headers(&request.headers) {
        parts.push("-H".to_string());
        parts.push(shell_quote(&format!("{name}: {value}")));
    }
    if let Some(body) = &request.body {
        parts.push("--data-raw".to_string());
        parts.push(shell_quote(&truncate_body(body)));
    }
    parts.join(" ")
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

fn format_headers(headers: &[(String, String)]) -> String {
    sanitize_headers(headers)
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Network Records
// ============================================================================

/// Record written before a request is sent.
pub fn request_entry(request: &HttpRequest) -> DiagnosticEntry {
    let mut entry = DiagnosticEntry::new(
        DiagnosticLevel::Info,
        DiagnosticCategory::Network,
        "Request",
        format!("{} {}", request.method, request.url),
    )
    .with("method", request.method)
    .with("url", &request.url)
    .with("headers", format_headers(&request.headers))
    .with("curl", curl_command(request));
    if let Some(body) = &request.body {
        entry = entry.with("body", truncate_body(body));
    }
    entry
}

/// Record written when a response arrives, whatever its status.
pub fn response_entry(
    request: &HttpRequest,
    status: u16,
    headers: &[(String, String)],
    body: &[u8],
    elapsed: Duration,
) -> DiagnosticEntry {
    let level = if (200..300).contains(&status) {
        DiagnosticLevel::Info
    } else {
        DiagnosticLevel::Warning
    };
    DiagnosticEntry::new(
        level,
        DiagnosticCategory::Network,
        "Response",
        format!("{} {} -> {status}", request.method, request.url),
    )
    .with("method", request.method)
    .with("url", &request.url)
    .with("status", status)
    .with("duration_ms", elapsed.as_millis())
    .with("bytes", body.len())
    .with("headers", format_headers(headers))
    .with("body", truncate_body(body))
}

/// Record written when a request fails before a response arrives.
pub fn failure_entry(request: &HttpRequest, error: &str, elapsed: Duration) -> DiagnosticEntry {
    DiagnosticEntry::new(
        DiagnosticLevel::Error,
        DiagnosticCategory::Network,
        "Request failed",
        format!("{} {}", request.method, request.url),
    )
    .with("method", request.method)
    .with("url", &request.url)
    .with("duration_ms", elapsed.as_millis())
    .with("error", error)
}
