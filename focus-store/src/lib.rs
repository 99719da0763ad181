// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Focus Store
//!
//! State, persistence, and sync scheduling for the Focus study tracker.
//!
//! This crate provides:
//!
//! - **ProgressStore**: Completion flags keyed by `"<dayId>-<index>"`
//! - **SettingsStore**: User preferences with persistence and change notification
//! - **ProgressMerger**: Folds solved slugs into progress, only ever adding
//! - **SyncScheduler**: Periodic, day-start, and username-change syncs with a
//!   single-flight guard
//! - **AuthStore**: Session cookie storage in the system keychain
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use focus_store::{ProgressStore, SettingsStore, SyncScheduler, load_plan};
//!
//! let settings = Arc::new(SettingsStore::load_default().await?);
//! let progress = Arc::new(ProgressStore::load_default().await?);
//! let plan = Arc::new(load_plan(&default_plan_path()).await?);
//!
//! let scheduler = SyncScheduler::new(fetcher, plan, progress, settings);
//! scheduler.start().await;
//! let result = scheduler.sync_now(SyncTrigger::Manual).await?;
//! ```

pub mod auth_store;
pub mod error;
pub mod merger;
pub mod persistence;
pub mod progress_store;
pub mod scheduler;
pub mod settings_store;

pub use auth_store::{AuthStore, KeychainAuthStore, MemoryAuthStore};
pub use error::StoreError;
pub use merger::{MergeDiff, ProgressMerger};
pub use persistence::{
    default_config_dir, default_plan_path, default_progress_path, default_settings_path,
    load_json, load_plan, save_json,
};
pub use progress_store::{Progress, ProgressStore};
pub use scheduler::{SyncScheduler, until_next_midnight};
pub use settings_store::{LogLevel, Settings, SettingsStore, SyncSettings};
