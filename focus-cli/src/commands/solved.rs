//! Solved command - run the solved-problem cascade and report it.

use anyhow::Result;
use clap::Args;
use focus_leetcode::SolvedSlugFetcher;

use crate::app::App;
use crate::output::{AttemptOutput, JsonFormatter, SolvedOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the solved command.
#[derive(Args)]
pub struct SolvedArgs {
    /// Username to look up (defaults to the configured one).
    #[arg(long, short)]
    pub user: Option<String>,

    /// Submissions to scan (defaults to the recent-sync limit).
    #[arg(long, short)]
    pub limit: Option<usize>,
}

/// Runs the solved command.
pub async fn run(args: &SolvedArgs, cli: &Cli, app: &App) -> Result<()> {
    let username = match args.user.as_deref().map(str::trim) {
        Some(user) if !user.is_empty() => user.to_string(),
        _ => app.require_username().await?,
    };
    let limit = match args.limit {
        Some(limit) => limit,
        None => app.settings.sync_settings().await.recent_limit,
    };

    let fetcher = SolvedSlugFetcher::new(app.fetch_context().await?);
    let outcome = fetcher.fetch_outcome(&username, limit).await;

    let attempts = outcome.attempts.iter().map(AttemptOutput::from).collect();
    let strategy = outcome.successful_strategy().map(str::to_string);
    let mut slugs: Vec<String> = outcome.into_slugs().into_iter().collect();
    slugs.sort_unstable();

    let output = SolvedOutput {
        username,
        limit,
        strategy,
        count: slugs.len(),
        slugs,
        attempts,
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_solved(&output, cli.verbose));
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&output)?),
    }

    Ok(())
}
