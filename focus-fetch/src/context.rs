//! Fetch context providing access to the transport and endpoints.
//!
//! The fetch context is passed to all strategies and clients. It bundles the
//! HTTP transport, the upstream base URLs, and fetch settings so nothing
//! reaches for a global client.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::NetworkError;
use crate::host::{diagnostics::DiagnosticSink, http::HttpClient, transport::HttpTransport};
use crate::strategy::FetchKind;

// ============================================================================
// Source Mode
// ============================================================================

/// Which upstreams the solved-problem cascade may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Use every tier in order.
    #[default]
    Auto,
    /// Only the community REST mirror.
    Rest,
    /// Only the official GraphQL endpoint.
    #[serde(alias = "graphql")]
    GraphQl,
}

impl SourceMode {
    /// Returns true if this mode allows REST strategies.
    pub fn allows_rest(&self) -> bool {
        matches!(self, Self::Auto | Self::Rest)
    }

    /// Returns true if this mode allows GraphQL strategies.
    pub fn allows_graphql(&self) -> bool {
        matches!(self, Self::Auto | Self::GraphQl)
    }

    /// Returns true if a strategy of `kind` may run.
    pub fn allows(&self, kind: FetchKind) -> bool {
        match kind {
            FetchKind::Rest => self.allows_rest(),
            FetchKind::GraphQl => self.allows_graphql(),
        }
    }
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Rest => "rest",
            Self::GraphQl => "graphql",
        })
    }
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "rest" => Ok(Self::Rest),
            "graphql" => Ok(Self::GraphQl),
            other => Err(format!("unknown source mode: {other}")),
        }
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Upstream base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Community REST mirror.
    pub rest_base: String,
    /// Official GraphQL endpoint.
    pub graphql_url: String,
    /// Platform web origin used for submission.
    pub site_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            rest_base: "https://alfa-leetcode-api.onrender.com".to_string(),
            graphql_url: "https://leetcode.com/graphql".to_string(),
            site_base: "https://leetcode.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Host names these endpoints talk to.
    pub fn hosts(&self) -> Vec<String> {
        [&self.rest_base, &self.graphql_url, &self.site_base]
            .iter()
            .filter_map(|u| url::Url::parse(u).ok())
            .filter_map(|u| u.host_str().map(str::to_string))
            .collect()
    }
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for the submission poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between check requests.
    pub interval: Duration,
    /// Poll attempts before giving up with a timeout.
    pub max_attempts: u32,
    /// Consecutive undecodable responses tolerated.
    pub max_decode_failures: u32,
    /// Bytes of raw body quoted in diagnostics.
    pub preview_bytes: usize,
    /// Age after which a stored session is treated as expired.
    pub auth_max_age: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 40,
            max_decode_failures: 5,
            preview_bytes: 500,
            auth_max_age: Duration::from_secs(14 * 24 * 60 * 60),
        }
    }
}

/// Settings for fetch operations.
#[derive(Debug, Clone, Default)]
pub struct FetchSettings {
    /// Which upstreams to allow.
    pub source_mode: SourceMode,
    /// Timeout for ordinary HTTP calls.
    pub timeout: Option<Duration>,
    /// Submission poll loop settings.
    pub poll: PollSettings,
}

impl FetchSettings {
    /// Default HTTP timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Returns the effective HTTP timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(Self::DEFAULT_TIMEOUT)
    }

    /// Creates settings with custom timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Creates settings with custom poll settings.
    #[must_use]
    pub fn with_poll(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to fetch strategies and platform clients.
pub struct FetchContext {
    /// HTTP transport.
    pub transport: Arc<dyn HttpTransport>,
    /// Upstream base URLs.
    pub endpoints: Endpoints,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context around an existing transport with default settings.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            endpoints: Endpoints::default(),
            settings: FetchSettings::default(),
        }
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the effective timeout for HTTP calls.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    /// Returns true if strategies of `kind` may run.
    pub fn allows(&self, kind: FetchKind) -> bool {
        self.settings.source_mode.allows(kind)
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("endpoints", &self.endpoints)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    transport: Option<Arc<dyn HttpTransport>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    endpoints: Endpoints,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the transport. When unset, an [`HttpClient`] is built.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Attaches a diagnostic sink to the default [`HttpClient`].
    #[must_use]
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Sets the endpoints.
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the source mode.
    #[must_use]
    pub fn source_mode(mut self, mode: SourceMode) -> Self {
        self.settings.source_mode = mode;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = Some(timeout);
        self
    }

    /// Sets the submission poll settings.
    #[must_use]
    pub fn poll(mut self, poll: PollSettings) -> Self {
        self.settings.poll = poll;
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport was given and the default
    /// [`HttpClient`] cannot be created.
    pub fn build(self) -> Result<FetchContext, NetworkError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let mut client = HttpClient::with_timeout(self.settings.timeout())?
                    .with_allowed_domains(self.endpoints.hosts());
                if let Some(sink) = self.diagnostics {
                    client = client.with_diagnostics(sink);
                }
                Arc::new(client)
            }
        };

        Ok(FetchContext {
            transport,
            endpoints: self.endpoints,
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
