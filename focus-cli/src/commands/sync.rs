//! Sync command - fold solved problems into plan progress.

use anyhow::{Result, bail};
use clap::Args;
use focus_core::{Plan, SyncTrigger};
use focus_leetcode::SolvedSlugFetcher;
use focus_store::{Progress, ProgressMerger, StoreError, SyncScheduler};
use std::sync::Arc;
use tracing::info;

use crate::app::App;
use crate::output::{EntryOutput, JsonFormatter, SyncOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the sync command.
#[derive(Args, Default)]
pub struct SyncArgs {
    /// Scan the full submission history instead of recent submissions.
    #[arg(long)]
    pub full: bool,

    /// Show what would be marked without saving.
    #[arg(long)]
    pub dry_run: bool,
}

/// Runs the sync command.
pub async fn run(args: &SyncArgs, cli: &Cli, app: &App) -> Result<()> {
    let username = app.require_username().await?;
    let plan = app.plan(cli).await?;
    let progress = app.progress().await?;
    let ctx = app.fetch_context().await?;

    let trigger = if args.full {
        SyncTrigger::Manual
    } else {
        SyncTrigger::OnDemand
    };

    let output = if args.dry_run {
        let limit = app.settings.sync_settings().await.limit_for(trigger);
        let solved = SolvedSlugFetcher::new(ctx)
            .fetch_solved_slugs(&username, limit)
            .await;
        let diff = ProgressMerger::diff(&solved, &plan, &progress.snapshot().await);

        SyncOutput {
            username,
            trigger: trigger.to_string(),
            dry_run: true,
            matched: diff.total_matched,
            new: diff.newly_completed.len(),
            newly_completed: diff
                .newly_completed
                .iter()
                .filter_map(|key| plan.problem(*key).map(|p| EntryOutput::new(*key, p, true)))
                .collect(),
        }
    } else {
        let before = progress.snapshot().await;
        let scheduler = SyncScheduler::with_diagnostics(
            SolvedSlugFetcher::new(ctx),
            Arc::clone(&plan),
            Arc::clone(&progress),
            Arc::clone(&app.settings),
            app.sink(),
        );

        let result = match scheduler.sync_now(trigger).await {
            Ok(Some(result)) => result,
            Ok(None) => bail!("No LeetCode username configured"),
            Err(StoreError::SyncInProgress) => bail!("A sync is already running"),
            Err(e) => return Err(e.into()),
        };
        info!(new = result.synced_count, "Sync finished");

        SyncOutput {
            username,
            trigger: trigger.to_string(),
            dry_run: false,
            matched: result.total_matched,
            new: result.synced_count,
            newly_completed: flipped_entries(&plan, &before, &progress.snapshot().await),
        }
    };

    match cli.format {
        OutputFormat::Text => println!("{}", TextFormatter::new(!cli.no_color).format_sync(&output)),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&output)?),
    }

    Ok(())
}

/// Plan entries completed in `after` but not in `before`.
fn flipped_entries(plan: &Plan, before: &Progress, after: &Progress) -> Vec<EntryOutput> {
    plan.entries()
        .filter(|(key, _)| after.is_completed(*key) && !before.is_completed(*key))
        .map(|(key, problem)| EntryOutput::new(key, problem, true))
        .collect()
}
