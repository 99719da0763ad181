//! Validate command - check that a username exists.

use anyhow::Result;
use clap::Args;
use focus_leetcode::RestClient;

use crate::app::App;
use crate::output::{JsonFormatter, ValidateOutput};
use crate::{Cli, OutputFormat};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Username to check (defaults to the configured one).
    pub username: Option<String>,
}

/// Runs the validate command.
pub async fn run(args: &ValidateArgs, cli: &Cli, app: &App) -> Result<()> {
    let username = match &args.username {
        Some(name) => name.trim().to_string(),
        None => app.require_username().await?,
    };

    let ctx = app.fetch_context().await?;
    let valid = RestClient::new(&ctx).validate_username(&username).await;

    match cli.format {
        OutputFormat::Text => {
            if valid {
                println!("✓ {username} exists");
            } else {
                println!("✗ {username} was not found");
            }
        }
        OutputFormat::Json => {
            let output = ValidateOutput { username, valid };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}
