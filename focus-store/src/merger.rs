//! Merges solved slugs into plan progress.

use focus_core::{Plan, ProblemKey, SolvedSlugSet, SyncResult};
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::progress_store::{Progress, ProgressStore};

/// What a merge would change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeDiff {
    /// Keys solved upstream but not yet completed, in plan order.
    pub newly_completed: Vec<ProblemKey>,
    /// Plan entries whose slug is solved, completed or not.
    pub total_matched: usize,
}

/// Applies solved slugs to progress. Monotonic and idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressMerger;

impl ProgressMerger {
    /// Computes the merge without touching the store.
    pub fn diff(solved: &SolvedSlugSet, plan: &Plan, progress: &Progress) -> MergeDiff {
        let mut diff = MergeDiff::default();
        for (key, problem) in plan.entries() {
            let Some(slug) = problem.slug() else {
                continue;
            };
            if !solved.contains(&slug) {
                continue;
            }
            diff.total_matched += 1;
            if !progress.is_completed(key) {
                diff.newly_completed.push(key);
            }
        }
        diff
    }

    /// Marks every solved plan entry completed and persists if anything flipped.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be saved.
    #[instrument(skip_all, fields(solved = solved.len()))]
    pub async fn apply(
        solved: &SolvedSlugSet,
        plan: &Plan,
        store: &ProgressStore,
    ) -> Result<SyncResult, StoreError> {
        let diff = Self::diff(solved, plan, &store.snapshot().await);
        let synced = store.mark_completed(&diff.newly_completed).await;
        if synced > 0 {
            store.save().await?;
        }
        debug!(synced, matched = diff.total_matched, "Merged solved slugs");
        Ok(SyncResult::new(synced, diff.total_matched))
    }
}
