//! Submit command - send a solution and wait for the verdict.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use focus_leetcode::{ProblemContentFetcher, SubmissionSubmitter};
use focus_store::AuthStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::resolve_slug;
use crate::app::App;
use crate::output::{JsonFormatter, SubmitOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the submit command.
#[derive(Args)]
pub struct SubmitArgs {
    /// Problem slug or URL.
    pub problem: String,

    /// Source file to submit.
    #[arg(long, short = 'F')]
    pub file: PathBuf,

    /// Language slug (e.g. `rust`, `python3`, `cpp`).
    #[arg(long, short)]
    pub lang: String,

    /// Question id; looked up from the problem when omitted.
    #[arg(long)]
    pub question_id: Option<String>,
}

/// Runs the submit command.
pub async fn run(args: &SubmitArgs, cli: &Cli, app: &App) -> Result<()> {
    let slug = resolve_slug(&args.problem);
    let code = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let auth = app.auth.load()?;
    let ctx = app.fetch_context().await?;

    let question_id = match &args.question_id {
        Some(id) => id.clone(),
        None => {
            debug!(slug = %slug, "Looking up question id");
            ProblemContentFetcher::new(Arc::clone(&ctx))
                .fetch_problem_content(&slug)
                .await?
                .and_then(|content| content.question_id)
                .ok_or_else(|| anyhow!("Could not find the question id for {slug}; pass --question-id"))?
        }
    };

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    info!(slug = %slug, lang = %args.lang, "Submitting");
    let submitter = SubmissionSubmitter::new(ctx).with_diagnostics(app.sink());
    let result = submitter
        .submit(&code, &args.lang, &slug, &question_id, auth.as_ref(), &cancel)
        .await;
    ctrl_c.abort();
    let check = result?;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_check(&check));
        }
        OutputFormat::Json => {
            let output = SubmitOutput {
                slug: &slug,
                lang: &args.lang,
                question_id: &question_id,
                accepted: check.is_accepted(),
                summary: check.summary(),
                check: &check,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
