//! Concurrent execution of every configured slot

use crate::{
    context::AppContext,
    error::{CliError, CliResult},
    utils::{format_duration_ms, parse_slot_param, ColoredOutput},
};
use rpcdeck_core::SlotId;
use rpcdeck_runtime::ExecutionState;
use std::collections::HashMap;

pub struct RunAllCommand;

impl RunAllCommand {
    pub async fn run(ctx: &AppContext, params: &[String]) -> CliResult<()> {
        let mut by_slot: HashMap<SlotId, HashMap<String, String>> = HashMap::new();
        for raw in params {
            let (slot, name, value) = parse_slot_param(raw)?;
            let id = ctx.resolve_slot(&slot)?;
            by_slot.entry(id).or_default().insert(name, value);
        }

        let results = ctx.dashboard.execute_all(&by_slot).await;
        if results.is_empty() {
            println!("{}", ColoredOutput::info("No configured slots to run"));
            return Ok(());
        }

        let mut failed = 0usize;
        for (id, state) in &results {
            let name = ctx
                .dashboard
                .slot(id)
                .and_then(|s| s.method_name)
                .unwrap_or_default();
            let timing = ctx
                .dashboard
                .record(id)
                .map(|r| format_duration_ms(r.duration_ms))
                .unwrap_or_default();
            match state {
                ExecutionState::Succeeded(value) => {
                    println!(
                        "{} {:<18} {} {}",
                        ColoredOutput::success("✓"),
                        name,
                        value,
                        ColoredOutput::dim(&timing)
                    );
                }
                ExecutionState::Failed(message) => {
                    failed += 1;
                    println!("{} {:<18} {}", ColoredOutput::error("✗"), name, message);
                }
                other => println!("{} {:<18} {}", ColoredOutput::warning("?"), name, other.label()),
            }
        }

        if failed > 0 {
            return Err(CliError::ExecutionFailed(format!(
                "{} of {} slots failed",
                failed,
                results.len()
            )));
        }
        Ok(())
    }
}
