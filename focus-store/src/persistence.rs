//! JSON files under the config dir: settings, progress, and the plan.

use focus_core::Plan;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/Focus`
/// - Linux: `~/.config/focus`
/// - Windows: `%APPDATA%\focus`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("Focus"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("focus"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join("settings.json")
}

/// Returns the default progress file path.
pub fn default_progress_path() -> PathBuf {
    default_config_dir().join("progress.json")
}

/// Returns the default plan file path.
pub fn default_plan_path() -> PathBuf {
    default_config_dir().join("plan.json")
}

// ============================================================================
// Permissions
// ============================================================================

/// Restricts `path` to the owner: `0o600` for files, `0o700` for directories.
#[cfg(unix)]
async fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    debug!(path = %path.display(), mode = %format!("{mode:o}"), "Restricted permissions");
    Ok(())
}

#[cfg(not(unix))]
async fn restrict(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Creates the parent of `path` if needed. Directories created inside the
/// config dir are owner-only.
async fn create_parent(path: &Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }

    debug!(path = %parent.display(), "Creating directory");
    tokio::fs::create_dir_all(parent).await?;

    let config_dir = default_config_dir();
    for dir in parent.ancestors().take_while(|d| d.starts_with(&config_dir)) {
        restrict(dir, 0o700).await?;
    }
    Ok(())
}

/// Writes `data` as pretty JSON.
///
/// The file is written to a `.json.tmp` sibling and renamed into place, so
/// readers never observe a partial document. The result is owner-only.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    create_parent(path).await?;

    let json = serde_json::to_string_pretty(data)?;
    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, &json).await?;
    tokio::fs::rename(&staging, path).await?;
    restrict(path, 0o600).await?;

    debug!(path = %path.display(), bytes = json.len(), "Saved");
    Ok(())
}

/// Reads and decodes a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    debug!(path = %path.display(), bytes = content.len(), "Loaded");
    Ok(serde_json::from_str(&content)?)
}

/// Loads and validates a study plan.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the plan is invalid.
pub async fn load_plan(path: &Path) -> Result<Plan, StoreError> {
    debug!(path = %path.display(), "Loading plan");
    let content = tokio::fs::read_to_string(path).await?;
    Ok(Plan::from_json(&content)?)
}

// ============================================================================
// Tests
// ============================================================================
