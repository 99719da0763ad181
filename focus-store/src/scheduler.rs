//! Background sync scheduling with a single-flight guard.
//!
//! Three trigger sources feed [`SyncScheduler::sync_now`]: a periodic timer,
//! a local-midnight timer, and username changes in the settings store. At
//! most one sync runs at a time; requests that arrive while one is in flight
//! are dropped, not queued.

use chrono::{DateTime, Local, TimeZone};
use focus_core::{Plan, SolvedSlugSource, SyncResult, SyncTrigger};
use focus_fetch::{DiagnosticCategory, DiagnosticEntry, DiagnosticLevel, DiagnosticSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::merger::ProgressMerger;
use crate::progress_store::ProgressStore;
use crate::settings_store::SettingsStore;

/// Wait used when the next local midnight cannot be resolved.
const MIDNIGHT_FALLBACK: Duration = Duration::from_secs(3600);

// ============================================================================
// Single-Flight Guard
// ============================================================================

/// Holds the syncing flag; clears it on drop, including on panic or abort.
struct SyncGuard<'a>(&'a AtomicBool);

impl<'a> SyncGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// Scheduler
// ============================================================================

struct SchedulerInner<S> {
    source: S,
    plan: Arc<Plan>,
    progress: Arc<ProgressStore>,
    settings: Arc<SettingsStore>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    syncing: AtomicBool,
    running: Mutex<Option<CancellationToken>>,
}

/// Runs syncs on timers and username changes. Cheap to clone.
pub struct SyncScheduler<S> {
    inner: Arc<SchedulerInner<S>>,
}

impl<S> Clone for SyncScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SolvedSlugSource + 'static> SyncScheduler<S> {
    /// Creates an idle scheduler.
    pub fn new(
        source: S,
        plan: Arc<Plan>,
        progress: Arc<ProgressStore>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self::build(source, plan, progress, settings, None)
    }

    /// Creates an idle scheduler that records sync milestones to `sink`.
    pub fn with_diagnostics(
        source: S,
        plan: Arc<Plan>,
        progress: Arc<ProgressStore>,
        settings: Arc<SettingsStore>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self::build(source, plan, progress, settings, Some(sink))
    }

    fn build(
        source: S,
        plan: Arc<Plan>,
        progress: Arc<ProgressStore>,
        settings: Arc<SettingsStore>,
        diagnostics: Option<Arc<dyn DiagnosticSink>>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                source,
                plan,
                progress,
                settings,
                diagnostics,
                syncing: AtomicBool::new(false),
                running: Mutex::new(None),
            }),
        }
    }

    /// Returns true while a sync is in flight.
    pub fn is_syncing(&self) -> bool {
        self.inner.syncing.load(Ordering::Acquire)
    }

    /// Returns true between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.lock_running().is_some()
    }

    fn lock_running(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.inner
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, entry: DiagnosticEntry) {
        if let Some(sink) = &self.inner.diagnostics {
            sink.record(entry);
        }
    }

    // ========================================================================
    // Sync
    // ========================================================================

    /// Runs one sync unless one is already running.
    ///
    /// Returns `Ok(None)` when no username is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SyncInProgress`] if the request was dropped, or
    /// the persistence error if progress could not be saved.
    #[instrument(skip(self))]
    pub async fn sync_now(&self, trigger: SyncTrigger) -> Result<Option<SyncResult>, StoreError> {
        let Some(_guard) = SyncGuard::try_acquire(&self.inner.syncing) else {
            debug!("Sync already in progress, dropping request");
            return Err(StoreError::SyncInProgress);
        };

        let settings = self.inner.settings.get().await;
        let Some(username) = settings.username() else {
            debug!("No username configured, skipping sync");
            return Ok(None);
        };
        let limit = settings.sync.limit_for(trigger);

        info!(username, limit, "Sync started");
        self.record(
            DiagnosticEntry::new(
                DiagnosticLevel::Info,
                DiagnosticCategory::Sync,
                "Sync started",
                format!("Trigger: {trigger}"),
            )
            .with("username", username)
            .with("limit", limit),
        );

        let solved = self.inner.source.fetch_solved_slugs(username, limit).await;

        match ProgressMerger::apply(&solved, &self.inner.plan, &self.inner.progress).await {
            Ok(result) => {
                info!(
                    new = result.synced_count,
                    matched = result.total_matched,
                    "Sync complete"
                );
                self.record(
                    DiagnosticEntry::new(
                        DiagnosticLevel::Info,
                        DiagnosticCategory::Sync,
                        "Sync complete",
                        format!(
                            "{} new, {} matched",
                            result.synced_count, result.total_matched
                        ),
                    )
                    .with("username", username)
                    .with("solved", solved.len())
                    .with("matched", result.total_matched)
                    .with("new", result.synced_count),
                );
                Ok(Some(result))
            }
            Err(e) => {
                warn!(error = %e, "Sync failed");
                self.record(
                    DiagnosticEntry::new(
                        DiagnosticLevel::Error,
                        DiagnosticCategory::Sync,
                        "Sync failed",
                        e.to_string(),
                    )
                    .with("username", username),
                );
                Err(e)
            }
        }
    }

    /// Schedules a sync for a new username. Blank names are ignored.
    pub fn handle_username_change(
        &self,
        username: &str,
    ) -> Option<JoinHandle<Result<Option<SyncResult>, StoreError>>> {
        if username.trim().is_empty() {
            debug!("Blank username, not syncing");
            return None;
        }
        let this = self.clone();
        Some(tokio::spawn(async move {
            this.sync_now(SyncTrigger::UsernameChanged).await
        }))
    }

    async fn fire(&self, trigger: SyncTrigger) {
        match self.sync_now(trigger).await {
            Ok(_) => {}
            Err(StoreError::SyncInProgress) => debug!(%trigger, "Timer fired during a sync"),
            Err(e) => warn!(%trigger, error = %e, "Scheduled sync failed"),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Starts the timers and the username watcher. Calling twice is a no-op.
    pub async fn start(&self) {
        let sync = self.inner.settings.sync_settings().await;
        let username_rx = self.inner.settings.subscribe();
        let initial = self.inner.settings.username().await.unwrap_or_default();

        let mut running = self.lock_running();
        if running.is_some() {
            debug!("Scheduler already running");
            return;
        }

        let cancel = CancellationToken::new();
        self.spawn_username_watcher(username_rx, initial, cancel.clone());
        if sync.enabled {
            self.spawn_interval(sync.interval(), cancel.clone());
            if sync.day_start {
                self.spawn_day_start(cancel.clone());
            }
        }

        info!(
            interval_secs = sync.interval().as_secs(),
            timers = sync.enabled,
            "Sync scheduler started"
        );
        *running = Some(cancel);
    }

    /// Stops all scheduler tasks. Calling twice is a no-op.
    ///
    /// Each task exits at its next wait. A sync that is already running
    /// finishes and persists its result.
    pub fn stop(&self) {
        let Some(cancel) = self.lock_running().take() else {
            return;
        };
        cancel.cancel();
        info!("Sync scheduler stopped");
    }

    fn spawn_interval(&self, period: Duration, cancel: CancellationToken) {
        let this = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => this.fire(SyncTrigger::Hourly).await,
                }
            }
        });
    }

    fn spawn_day_start(&self, cancel: CancellationToken) {
        let this = self.clone();
        tokio::spawn(async move {
            loop {
                let wait = until_next_midnight(&Local::now());
                debug!(secs = wait.as_secs(), "Next day-start sync");
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(wait) => this.fire(SyncTrigger::DayStart).await,
                }
            }
        });
    }

    fn spawn_username_watcher(
        &self,
        mut rx: tokio::sync::watch::Receiver<u64>,
        initial: String,
        cancel: CancellationToken,
    ) {
        let this = self.clone();
        tokio::spawn(async move {
            let mut last = initial;
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let current = this.inner.settings.username().await.unwrap_or_default();
                        if current == last {
                            continue;
                        }
                        debug!(username = %current, "Username changed");
                        last.clone_from(&current);
                        this.handle_username_change(&current);
                    }
                }
            }
        });
    }
}

impl<S> std::fmt::Debug for SyncScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("syncing", &self.inner.syncing.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Time from `now` until the next local midnight, at least one second.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let tz = now.timezone();
    let next = now
        .date_naive()
        .succ_opt()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest());

    match next {
        Some(next) => next
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(MIDNIGHT_FALLBACK)
            .max(Duration::from_secs(1)),
        None => MIDNIGHT_FALLBACK,
    }
}
