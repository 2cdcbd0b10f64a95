pub mod exec;
pub mod methods;
pub mod run_all;
pub mod slots;

// Re-export command handlers
pub use exec::{CallCommand, ExecCommand};
pub use methods::MethodsCommand;
pub use run_all::RunAllCommand;
pub use slots::SlotsCommand;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};
use crate::utils::{format_duration_ms, ColoredOutput};
use rpcdeck_runtime::{ExecutionRecord, ExecutionState};

/// Print one execution outcome; a failure becomes the command's error
pub(crate) fn report_outcome(
    title: &str,
    state: &ExecutionState,
    record: Option<&ExecutionRecord>,
    format: OutputFormat,
) -> CliResult<()> {
    match state {
        ExecutionState::Succeeded(value) => {
            let timing = record
                .map(|r| format!(" {} in {}", r.method, format_duration_ms(r.duration_ms)))
                .unwrap_or_default();
            eprintln!("{} {}{}", ColoredOutput::success("✓"), title, ColoredOutput::dim(&timing));
            println!("{}", format.format_json(value)?);
            Ok(())
        }
        ExecutionState::Failed(message) => {
            Err(CliError::ExecutionFailed(format!("{}: {}", title, message)))
        }
        other => Err(CliError::General(format!("{} ended in state {}", title, other.label()))),
    }
}
