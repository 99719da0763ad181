//! Completion progress store.
//!
//! Keys are `"<dayId>-<index>"` strings. The sync path only ever sets keys
//! to true; un-completing is a user action made elsewhere.

use focus_core::ProblemKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_progress_path, load_json, save_json};

/// On-disk progress document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Completion flag per progress key.
    #[serde(default)]
    pub progress: BTreeMap<String, bool>,
}

impl Progress {
    /// Returns true if `key` is marked completed.
    pub fn is_completed(&self, key: ProblemKey) -> bool {
        self.progress
            .get(&key.to_string())
            .copied()
            .unwrap_or(false)
    }

    /// Number of completed keys.
    pub fn completed_count(&self) -> usize {
        self.progress.values().filter(|done| **done).count()
    }
}

/// Shared, optionally persisted progress with change notification.
pub struct ProgressStore {
    inner: Arc<RwLock<Progress>>,
    path: Option<PathBuf>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl ProgressStore {
    fn from_parts(path: Option<PathBuf>, progress: Progress) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(progress)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Creates a store that never touches disk.
    pub fn in_memory() -> Self {
        Self::from_parts(None, Progress::default())
    }

    /// Creates an empty store persisted at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::from_parts(Some(path), Progress::default())
    }

    /// Loads progress from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be created.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_progress_path()).await
    }

    /// Loads progress from `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be parsed.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let progress = if path.exists() {
            info!(path = %path.display(), "Loading progress");
            load_json(&path).await?
        } else {
            debug!(path = %path.display(), "Progress file not found, starting empty");
            Progress::default()
        };
        Ok(Self::from_parts(Some(path), progress))
    }

    /// Returns the backing file path, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a copy of the current progress.
    pub async fn snapshot(&self) -> Progress {
        self.inner.read().await.clone()
    }

    /// Returns true if `key` is marked completed.
    pub async fn is_completed(&self, key: ProblemKey) -> bool {
        self.inner.read().await.is_completed(key)
    }

    /// Sets one key. This is the user toggle and may clear a key.
    pub async fn set_completed(&self, key: ProblemKey, completed: bool) {
        self.inner
            .write()
            .await
            .progress
            .insert(key.to_string(), completed);
        self.notify_change().await;
    }

    /// Marks every key in `keys` completed and returns how many flipped.
    ///
    /// Already-completed keys are left alone; nothing is ever cleared.
    pub async fn mark_completed(&self, keys: &[ProblemKey]) -> usize {
        let flipped = {
            let mut inner = self.inner.write().await;
            keys.iter()
                .filter(|key| {
                    let entry = inner.progress.entry(key.to_string()).or_insert(false);
                    !std::mem::replace(entry, true)
                })
                .count()
        };
        if flipped > 0 {
            self.notify_change().await;
        }
        flipped
    }

    /// Saves progress to disk. In-memory stores do nothing.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let progress = self.inner.read().await;
        save_json(path, &*progress).await?;
        debug!(path = %path.display(), "Progress saved");
        Ok(())
    }

    /// Subscribes to progress changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_file_shape() {
        let progress: Progress =
            serde_json::from_str(r#"{"progress": {"1-0": true, "1-1": false}}"#).unwrap();
        assert!(progress.is_completed(ProblemKey::new(1, 0)));
        assert!(!progress.is_completed(ProblemKey::new(1, 1)));
        assert!(!progress.is_completed(ProblemKey::new(2, 0)));
        assert_eq!(progress.completed_count(), 1);
    }

    #[tokio::test]
    async fn test_mark_completed_counts_flips() {
        let store = ProgressStore::in_memory();
        store.set_completed(ProblemKey::new(1, 0), true).await;

        let flipped = store
            .mark_completed(&[ProblemKey::new(1, 0), ProblemKey::new(1, 1)])
            .await;

        assert_eq!(flipped, 1);
        assert!(store.is_completed(ProblemKey::new(1, 1)).await);
    }

    #[tokio::test]
    async fn test_in_memory_save_is_noop() {
        let store = ProgressStore::in_memory();
        store.mark_completed(&[ProblemKey::new(3, 2)]).await;
        store.save().await.unwrap();
        assert!(store.path().is_none());
    }
}
