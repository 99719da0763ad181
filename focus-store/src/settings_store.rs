//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use focus_core::SyncTrigger;
use focus_fetch::{Endpoints, FetchSettings, SourceMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Platform username to sync. Empty disables syncing.
    pub leetcode_username: String,

    /// Background sync settings.
    pub sync: SyncSettings,

    /// Which upstreams the solved-problem cascade may use.
    pub source_mode: SourceMode,

    /// Log level.
    pub log_level: LogLevel,

    /// Upstream URL override; `None` uses the public endpoints.
    pub endpoints: Option<Endpoints>,
}

impl Settings {
    /// Returns the trimmed username, or `None` when blank.
    pub fn username(&self) -> Option<&str> {
        let trimmed = self.leetcode_username.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Background sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Whether timers run at all.
    pub enabled: bool,
    /// Submissions scanned by routine syncs.
    pub recent_limit: usize,
    /// Submissions scanned by a manual full sync.
    pub full_limit: usize,
    /// Seconds between periodic syncs.
    pub interval_secs: u64,
    /// Also sync at each local midnight.
    pub day_start: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            recent_limit: 20,
            full_limit: 5000,
            interval_secs: 3600,
            day_start: true,
        }
    }
}

impl SyncSettings {
    /// Returns the periodic interval, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// Returns the fetch limit for `trigger`.
    pub fn limit_for(&self, trigger: SyncTrigger) -> usize {
        if trigger.wants_full_history() {
            self.full_limit
        } else {
            self.recent_limit
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a store with default settings.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    /// Creates a store holding `settings`.
    pub fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    ///
    /// The value is a version counter; read the settings after each change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Notifies subscribers of a change.
    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the trimmed username, or `None` when blank.
    pub async fn username(&self) -> Option<String> {
        self.settings.read().await.username().map(str::to_string)
    }

    /// Sets the username. Surrounding whitespace is dropped.
    pub async fn set_username(&self, username: &str) {
        let username = username.trim().to_string();
        self.update(|s| s.leetcode_username = username).await;
    }

    /// Gets the source mode.
    pub async fn source_mode(&self) -> SourceMode {
        self.settings.read().await.source_mode
    }

    /// Sets the source mode.
    pub async fn set_source_mode(&self, mode: SourceMode) {
        self.update(|s| s.source_mode = mode).await;
    }

    /// Gets the sync settings.
    pub async fn sync_settings(&self) -> SyncSettings {
        self.settings.read().await.sync.clone()
    }

    /// Gets the effective endpoints.
    pub async fn endpoints(&self) -> Endpoints {
        self.settings
            .read()
            .await
            .endpoints
            .clone()
            .unwrap_or_default()
    }

    /// Builds fetch settings from the stored preferences.
    pub async fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            source_mode: self.source_mode().await,
            ..FetchSettings::default()
        }
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
