//! Problem command - show description and starter code.

use anyhow::{Result, anyhow};
use clap::Args;
use focus_leetcode::ProblemContentFetcher;

use super::resolve_slug;
use crate::app::App;
use crate::output::{JsonFormatter, ProblemOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the problem command.
#[derive(Args)]
pub struct ProblemArgs {
    /// Problem slug or URL.
    pub problem: String,

    /// Show starter code for this language slug (e.g. `rust`, `python3`).
    #[arg(long, short)]
    pub lang: Option<String>,
}

/// Runs the problem command.
pub async fn run(args: &ProblemArgs, cli: &Cli, app: &App) -> Result<()> {
    let slug = resolve_slug(&args.problem);
    let fetcher = ProblemContentFetcher::new(app.fetch_context().await?);

    let content = fetcher
        .fetch_problem_content(&slug)
        .await?
        .ok_or_else(|| anyhow!("Problem not found: {slug}"))?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_problem(&content, args.lang.as_deref()));
        }
        OutputFormat::Json => {
            let output = ProblemOutput {
                slug: &slug,
                content: &content,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
