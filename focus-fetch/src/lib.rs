// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Focus Fetch
//!
//! HTTP transport and fetch pipeline for the Focus study tracker.
//!
//! This crate provides the infrastructure every platform client builds on:
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for network access:
//!
//! - [`host::transport`] - The `execute(request) -> bytes` seam
//! - [`host::http`] - reqwest client with tracing and domain allowlist
//! - [`host::diagnostics`] - Redacted request/response records
//! - [`host::mock`] - Scripted transport for tests
//!
//! ## Fetch Pipeline
//!
//! The fetch pipeline executes tiers strictly in sequence:
//!
//! - [`strategy::FetchStrategy`] - Trait for one tier of the cascade
//! - [`pipeline::FetchPipeline`] - Runs tiers until one finds slugs
//! - [`context::FetchContext`] - Transport, endpoints, and settings
//!
//! ## Example
//!
//! ```ignore
//! use focus_fetch::{FetchContext, FetchPipeline, SlugQuery};
//!
//! let ctx = FetchContext::builder().build()?;
//! let pipeline = FetchPipeline::with_strategies(vec![
//!     Box::new(RestAcceptedStrategy::new()),
//!     Box::new(GraphQlRecentStrategy::new()),
//! ]);
//!
//! let outcome = pipeline.execute(&ctx, &SlugQuery::new("alice", 20)).await;
//! let solved = outcome.into_slugs();
//! ```

// Core modules
pub mod context;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod strategy;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, NetworkError};

// Host APIs
pub use host::{
    diagnostics::{
        DiagnosticCategory, DiagnosticEntry, DiagnosticLevel, DiagnosticLog, DiagnosticSink,
    },
    http::HttpClient,
    mock::{MockResponse, MockTransport},
    transport::{HttpMethod, HttpRequest, HttpTransport},
};

// Strategy & Pipeline
pub use context::{
    Endpoints, FetchContext, FetchContextBuilder, FetchSettings, PollSettings, SourceMode,
};
pub use pipeline::{FetchAttempt, FetchOutcome, FetchPipeline};
pub use strategy::{FetchKind, FetchResult, FetchStrategy, SlugQuery};
