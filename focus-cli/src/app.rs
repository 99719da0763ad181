//! Shared state for one CLI invocation.

use anyhow::{Context, Result, anyhow};
use focus_core::Plan;
use focus_fetch::{DiagnosticLog, DiagnosticSink, FetchContext};
use focus_store::{
    KeychainAuthStore, LogLevel, ProgressStore, SettingsStore, default_plan_path, load_plan,
};
use std::sync::Arc;

use crate::Cli;

/// Settings and diagnostics shared by every command.
pub struct App {
    /// Persisted user settings.
    pub settings: Arc<SettingsStore>,
    /// Everything recorded during this invocation.
    pub diagnostics: Arc<DiagnosticLog>,
    /// Keychain-backed session store.
    pub auth: KeychainAuthStore,
}

impl App {
    /// Loads settings from the default location.
    pub async fn load() -> Result<Self> {
        let settings = SettingsStore::load_default()
            .await
            .context("Failed to load settings")?;
        Ok(Self {
            settings: Arc::new(settings),
            diagnostics: Arc::new(DiagnosticLog::new()),
            auth: KeychainAuthStore::new(),
        })
    }

    /// Configured log level.
    pub async fn log_level(&self) -> LogLevel {
        self.settings.get().await.log_level
    }

    /// The diagnostic log as a sink.
    pub fn sink(&self) -> Arc<dyn DiagnosticSink> {
        Arc::clone(&self.diagnostics) as Arc<dyn DiagnosticSink>
    }

    /// Builds a fetch context from the current settings.
    pub async fn fetch_context(&self) -> Result<Arc<FetchContext>> {
        let ctx = FetchContext::builder()
            .endpoints(self.settings.endpoints().await)
            .settings(self.settings.fetch_settings().await)
            .diagnostics(self.sink())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Arc::new(ctx))
    }

    /// Loads the study plan from `--plan` or the default path.
    pub async fn plan(&self, cli: &Cli) -> Result<Arc<Plan>> {
        let path = cli.plan.clone().unwrap_or_else(default_plan_path);
        let plan = load_plan(&path)
            .await
            .with_context(|| format!("Failed to load plan from {}", path.display()))?;
        Ok(Arc::new(plan))
    }

    /// Loads progress from the default location.
    pub async fn progress(&self) -> Result<Arc<ProgressStore>> {
        let store = ProgressStore::load_default()
            .await
            .context("Failed to load progress")?;
        Ok(Arc::new(store))
    }

    /// Returns the configured username or explains how to set one.
    pub async fn require_username(&self) -> Result<String> {
        self.settings.username().await.ok_or_else(|| {
            anyhow!("No LeetCode username configured. Run `focus config username <name>`.")
        })
    }
}
