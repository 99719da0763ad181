//! Watch command - run scheduled syncs until Ctrl-C.

use anyhow::Result;
use focus_core::SyncTrigger;
use focus_leetcode::SolvedSlugFetcher;
use focus_store::{StoreError, SyncScheduler};
use std::sync::Arc;
use tracing::info;

use crate::app::App;
use crate::output::TextFormatter;
use crate::Cli;

/// Runs the watch command.
pub async fn run(cli: &Cli, app: &App) -> Result<()> {
    let plan = app.plan(cli).await?;
    let progress = app.progress().await?;
    let ctx = app.fetch_context().await?;
    let sync = app.settings.sync_settings().await;
    let formatter = TextFormatter::new(!cli.no_color);

    let scheduler = SyncScheduler::with_diagnostics(
        SolvedSlugFetcher::new(ctx),
        plan,
        Arc::clone(&progress),
        Arc::clone(&app.settings),
        app.sink(),
    );

    println!(
        "Focus Watch Mode - syncing every {}s{}",
        sync.interval().as_secs(),
        if sync.day_start { " and at midnight" } else { "" }
    );
    println!("{}", "─".repeat(50));

    scheduler.start().await;
    info!("Watch mode started");

    match scheduler.sync_now(SyncTrigger::OnDemand).await {
        Ok(Some(result)) => println!("{} ({} new)", stamp(), result.synced_count),
        Ok(None) => println!("{} No username configured, waiting", stamp()),
        Err(StoreError::SyncInProgress) => {}
        Err(e) => eprintln!("{}", formatter.format_error("sync", &e.to_string())),
    }

    println!("Press Ctrl+C to exit");

    let mut changes = progress.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal?;
                break;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let done = progress.snapshot().await.completed_count();
                println!("{} Progress updated: {done} completed", stamp());
            }
        }
    }

    scheduler.stop();
    println!();
    println!("Stopped");
    Ok(())
}

fn stamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
