//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use focus_fetch::SourceMode;
use focus_store::{default_config_dir, default_plan_path, default_progress_path, default_settings_path};
use tracing::info;

use crate::app::App;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the LeetCode username to sync. An empty name disables syncing.
    Username {
        /// Username.
        name: String,
    },

    /// Restrict which upstreams the solved-problem lookup may use.
    Source {
        /// Mode: auto, rest, graphql.
        mode: SourceMode,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, app: &App) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, app).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Username { name } => set_username(name, app).await,
        ConfigAction::Source { mode } => set_source(*mode, app).await,
    }
}

async fn show_config(cli: &Cli, app: &App) -> Result<()> {
    let settings = app.settings.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Focus Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Username:      {}", settings.username().unwrap_or("(not set)"));
            println!("Source mode:   {}", settings.source_mode);
            println!("Log level:     {}", settings.log_level);
            println!();
            println!("Background sync: {}", if settings.sync.enabled { "on" } else { "off" });
            println!("  Interval:      {}s", settings.sync.interval().as_secs());
            println!("  Day start:     {}", settings.sync.day_start);
            println!("  Recent limit:  {}", settings.sync.recent_limit);
            println!("  Full limit:    {}", settings.sync.full_limit);
            if let Some(endpoints) = &settings.endpoints {
                println!();
                println!("Endpoints:");
                println!("  REST:    {}", endpoints.rest_base);
                println!("  GraphQL: {}", endpoints.graphql_url);
                println!("  Site:    {}", endpoints.site_base);
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = default_settings_path();
    let progress_path = default_progress_path();
    let plan_path = cli.plan.clone().unwrap_or_else(default_plan_path);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
            println!("Progress file: {}", progress_path.display());
            println!("Plan file:     {}", plan_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "progress_file": progress_path.display().to_string(),
                "plan_file": plan_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_username(name: &str, app: &App) -> Result<()> {
    app.settings.set_username(name).await;
    app.settings.save().await?;

    match app.settings.username().await {
        Some(username) => {
            info!(username = %username, "Username updated");
            println!("Username set to: {username}");
        }
        None => println!("Username cleared; syncing is off"),
    }

    Ok(())
}

async fn set_source(mode: SourceMode, app: &App) -> Result<()> {
    app.settings.set_source_mode(mode).await;
    app.settings.save().await?;

    info!(mode = %mode, "Source mode updated");
    println!("Source mode set to: {mode}");

    Ok(())
}
