//! Output formatting for CLI.

mod json;
mod text;

use anyhow::Result;
use focus_fetch::DiagnosticEntry;

use crate::{Cli, OutputFormat};

pub use json::{
    AttemptOutput, AuthOutput, DayOutput, EntryOutput, JsonFormatter, ProblemOutput,
    ProgressOutput, SolvedOutput, SubmitOutput, SyncOutput, ValidateOutput,
};
pub use text::TextFormatter;

/// Prints the diagnostic log to stderr so stdout stays parseable.
pub fn print_diagnostics(entries: &[DiagnosticEntry], cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            eprintln!("{}", TextFormatter::new(!cli.no_color).format_diagnostics(entries));
        }
        OutputFormat::Json => {
            eprintln!("{}", JsonFormatter::new(cli.pretty).format(entries)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
