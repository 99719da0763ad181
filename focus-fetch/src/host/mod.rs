//! Host APIs for Focus fetch strategies.
//!
//! - [`transport`] - The pluggable request/response seam
//! - [`http`] - reqwest-backed transport with tracing and domain allowlist
//! - [`diagnostics`] - Structured request/response log with redaction
//! - [`mock`] - Scripted transport that records every request

pub mod diagnostics;
pub mod http;
pub mod mock;
pub mod transport;

// Re-export key types
pub use diagnostics::{
    DiagnosticCategory, DiagnosticEntry, DiagnosticLevel, DiagnosticLog, DiagnosticSink,
};
pub use http::HttpClient;
pub use mock::{MockResponse, MockTransport};
pub use transport::{HttpMethod, HttpRequest, HttpTransport};
