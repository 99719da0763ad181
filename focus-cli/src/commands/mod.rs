//! CLI command implementations.

pub mod auth;
pub mod config;
pub mod problem;
pub mod progress;
pub mod solved;
pub mod submit;
pub mod sync;
pub mod validate;
pub mod watch;

use focus_core::extract_slug;

/// Accepts either a bare slug or a problem URL.
pub fn resolve_slug(input: &str) -> String {
    extract_slug(input).unwrap_or_else(|| input.trim().trim_matches('/').to_string())
}
