//! Auth command - manage the stored LeetCode session.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use focus_core::AuthSession;
use focus_store::AuthStore;
use tracing::info;

use crate::app::App;
use crate::output::{AuthOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Auth subcommands.
#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a session copied from a signed-in browser.
    Set {
        /// Value of the `LEETCODE_SESSION` cookie.
        #[arg(long)]
        session: String,

        /// Value of the `csrftoken` cookie.
        #[arg(long)]
        csrf: String,
    },

    /// Show whether a usable session is stored.
    Show,

    /// Remove the stored session.
    Clear,
}

/// Runs the auth command.
pub async fn run(args: &AuthArgs, cli: &Cli, app: &App) -> Result<()> {
    match &args.action {
        AuthAction::Set { session, csrf } => set_session(session, csrf, app),
        AuthAction::Show => show_session(cli, app).await,
        AuthAction::Clear => {
            app.auth.clear()?;
            info!("Session cleared");
            println!("Session cleared");
            Ok(())
        }
    }
}

fn set_session(session: &str, csrf: &str, app: &App) -> Result<()> {
    let auth = AuthSession::new(session.trim(), csrf.trim());
    if !auth.is_complete() {
        bail!("Both --session and --csrf must be non-empty");
    }

    app.auth.save(&auth)?;
    info!("Session stored");
    println!("Session stored");
    Ok(())
}

async fn show_session(cli: &Cli, app: &App) -> Result<()> {
    let max_age = app.settings.fetch_settings().await.poll.auth_max_age;
    let max_age = chrono::Duration::from_std(max_age).unwrap_or(chrono::Duration::MAX);

    let output = match app.auth.load()? {
        Some(auth) => AuthOutput {
            stored: true,
            complete: auth.is_complete(),
            usable: auth.is_usable(max_age),
            updated_at: Some(auth.updated_at),
        },
        None => AuthOutput {
            stored: false,
            complete: false,
            usable: false,
            updated_at: None,
        },
    };

    match cli.format {
        OutputFormat::Text => println!("{}", TextFormatter::new(!cli.no_color).format_auth(&output)),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&output)?),
    }

    Ok(())
}
