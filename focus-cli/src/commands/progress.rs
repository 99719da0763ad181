//! Progress command - plan completion per day.

use anyhow::Result;
use focus_core::{Plan, ProblemKey};
use focus_store::Progress;

use crate::app::App;
use crate::output::{DayOutput, EntryOutput, JsonFormatter, ProgressOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the progress command.
pub async fn run(cli: &Cli, app: &App) -> Result<()> {
    let plan = app.plan(cli).await?;
    let progress = app.progress().await?.snapshot().await;
    let output = build_output(&plan, &progress);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_progress(&output, cli.verbose));
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&output)?),
    }

    Ok(())
}

/// Completion report. Keys not in the plan are ignored.
fn build_output(plan: &Plan, progress: &Progress) -> ProgressOutput {
    let days: Vec<DayOutput> = plan
        .days
        .iter()
        .map(|day| {
            let problems: Vec<EntryOutput> = day
                .problems
                .iter()
                .enumerate()
                .map(|(index, problem)| {
                    let key = ProblemKey::new(day.id, index);
                    EntryOutput::new(key, problem, progress.is_completed(key))
                })
                .collect();
            DayOutput {
                id: day.id,
                topic: day.topic.clone(),
                completed: problems.iter().filter(|p| p.completed).count(),
                total: problems.len(),
                problems,
            }
        })
        .collect();

    ProgressOutput {
        completed: days.iter().map(|d| d.completed).sum(),
        total: days.iter().map(|d| d.total).sum(),
        days,
    }
}
