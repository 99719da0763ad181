// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Focus Core
//!
//! Core types, models, and traits for the Focus study tracker.
//!
//! This crate provides the foundational abstractions used across all other
//! Focus crates, including:
//!
//! - Domain models (plan, progress keys, sync results, auth sessions)
//! - Error types
//! - Slug extraction from problem URLs
//! - The [`SolvedSlugSource`] seam used by the sync scheduler
//!
//! ## Key Types
//!
//! ### Plan Types
//! - [`Plan`] - Ordered schedule of study days
//! - [`StudyDay`] - One day of the plan with its ordered problems
//! - [`Problem`] - A single problem entry `{name, difficulty, url}`
//!
//! ### Sync Types
//! - [`ProblemKey`] - Composite `"<dayId>-<index>"` progress key
//! - [`SolvedSlugSet`] - Deduplicated set of solved slugs
//! - [`SyncResult`] - Outcome of one merge pass
//! - [`SyncTrigger`] - Why a sync was requested
//!
//! ### Platform Types
//! - [`AuthSession`] - Session cookie and CSRF token pair
//! - [`QuestionContent`] - Problem description, snippets, and metadata

pub mod error;
pub mod models;
pub mod slug;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Plan types
    Difficulty,
    Plan,
    Problem,
    StudyDay,
    // Sync types
    ProblemKey,
    SolvedSlugSet,
    SyncResult,
    SyncTrigger,
    // Platform types
    AuthSession,
    QuestionContent,
};

// Re-export slug helpers
pub use slug::{extract_slug, humanize_slug};

// Re-export traits
pub use traits::SolvedSlugSource;
