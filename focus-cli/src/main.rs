// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Focus CLI - keep a LeetCode study plan in sync from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Set the account to follow
//! focus config username alice
//!
//! # Pull recent accepted submissions into the plan
//! focus sync
//!
//! # Scan the full history, but only show what would change
//! focus sync --full --dry-run
//!
//! # Keep syncing in the background until Ctrl-C
//! focus watch
//!
//! # Submit a solution
//! focus submit two-sum --file two_sum.py --lang python3
//!
//! # JSON output
//! focus progress --format json --pretty
//! ```

mod app;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::App;
use commands::{auth, config, problem, progress, solved, submit, sync, validate, watch};
use focus_store::LogLevel;

/// Exit code for any failed command.
const EXIT_ERROR: i32 = 1;

// ============================================================================
// CLI Definition
// ============================================================================

/// Focus CLI - LeetCode study plan sync.
#[derive(Parser)]
#[command(name = "focus")]
#[command(about = "LeetCode progress sync for a study plan")]
#[command(long_about = r#"
Focus marks problems in your study plan as done once LeetCode has accepted
a submission for them, and can submit solutions on your behalf.

Solved problems are looked up through, in order:
  1. the community REST mirror (accepted submissions)
  2. the community REST mirror (all submissions, filtered)
  3. LeetCode GraphQL, paginated (full syncs only)
  4. LeetCode GraphQL, recent accepted submissions

Examples:
  focus config username alice    # Account to follow
  focus sync                     # Recent submissions
  focus sync --full              # Entire history
  focus watch                    # Hourly and day-start syncs
  focus progress                 # Plan completion
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Study plan file (defaults to plan.json in the config dir).
    #[arg(long, global = true, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Print the diagnostic log when the command finishes.
    #[arg(long, global = true)]
    pub log: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Mark solved plan problems as completed.
    #[command(visible_alias = "s")]
    Sync(sync::SyncArgs),

    /// Run scheduled syncs until interrupted.
    #[command(visible_alias = "w")]
    Watch,

    /// List solved problem slugs for a user.
    Solved(solved::SolvedArgs),

    /// Show a problem's description and starter code.
    #[command(visible_alias = "p")]
    Problem(problem::ProblemArgs),

    /// Submit a solution and wait for the verdict.
    Submit(submit::SubmitArgs),

    /// Check that a username exists.
    Validate(validate::ValidateArgs),

    /// Show plan completion.
    Progress,

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Manage the stored LeetCode session.
    Auth(auth::AuthArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("focus=debug,info")
    } else {
        EnvFilter::new(format!("focus={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match App::load().await {
        Ok(app) => {
            setup_logging(cli.verbose, cli.quiet, app.log_level().await);
            run(&cli, &app).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(EXIT_ERROR);
    }

    Ok(())
}

async fn run(cli: &Cli, app: &App) -> Result<()> {
    let result = match &cli.command {
        Commands::Sync(args) => sync::run(args, cli, app).await,
        Commands::Watch => watch::run(cli, app).await,
        Commands::Solved(args) => solved::run(args, cli, app).await,
        Commands::Problem(args) => problem::run(args, cli, app).await,
        Commands::Submit(args) => submit::run(args, cli, app).await,
        Commands::Validate(args) => validate::run(args, cli, app).await,
        Commands::Progress => progress::run(cli, app).await,
        Commands::Config(args) => config::run(args, cli, app).await,
        Commands::Auth(args) => auth::run(args, cli, app).await,
    };

    if cli.log {
        output::print_diagnostics(&app.diagnostics.entries(), cli)?;
    }

    result
}
