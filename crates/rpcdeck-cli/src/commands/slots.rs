//! Slot management

use crate::{
    cli::{OutputFormat, SlotsAction},
    context::AppContext,
    error::{CliError, CliResult},
    utils::{format_duration_ms, ColoredOutput},
};
use rpcdeck_core::SlotCollection;
use rpcdeck_runtime::ExecutionState;
use rpcdeck_store::PersistencePolicy;
use serde_json::{json, Value as JsonValue};
use tracing::info;

pub struct SlotsCommand;

impl SlotsCommand {
    pub fn run(ctx: &AppContext, action: SlotsAction) -> CliResult<()> {
        let dashboard = &ctx.dashboard;
        let slots = match action {
            SlotsAction::List { format } => return Self::list(ctx, format),
            SlotsAction::Add { method } => {
                if let Some(name) = method.as_deref() {
                    Self::require_method(ctx, name)?;
                }
                dashboard.try_add_slot(method.as_deref())?
            }
            SlotsAction::Remove { id } => {
                let id = ctx.resolve_slot(&id)?;
                info!(slot = %id, "Removing slot");
                dashboard.try_remove_slot(&id)?
            }
            SlotsAction::Set { id, method } => {
                let id = ctx.resolve_slot(&id)?;
                if let Some(name) = method.as_deref().filter(|n| !n.is_empty()) {
                    Self::require_method(ctx, name)?;
                }
                dashboard.try_set_slot_method(&id, method.as_deref())?
            }
            SlotsAction::Move { from, to } => {
                let from = ctx.resolve_slot(&from)?;
                let to = ctx.resolve_slot(&to)?;
                dashboard.try_reorder_slots(&from, &to)?
            }
            SlotsAction::LoadAll => dashboard.try_load_all_methods()?,
            SlotsAction::Reset => dashboard.try_reset_slots()?,
            SlotsAction::Clear => dashboard.try_clear_slots()?,
        };

        // Under Strict a failed write has already returned above
        if let Some(error) = dashboard.last_persist_error() {
            let policy = dashboard.persistence_policy();
            if policy == PersistencePolicy::DegradeToMemory {
                eprintln!(
                    "{} slots could not be saved and are kept in memory only ({} policy): {}",
                    ColoredOutput::warning("Warning:"),
                    policy,
                    error
                );
            }
        }
        Self::display_table(ctx, &slots);
        Ok(())
    }

    fn require_method(ctx: &AppContext, name: &str) -> CliResult<()> {
        if ctx.dashboard.registry().contains(name) {
            Ok(())
        } else {
            Err(CliError::InvalidArgument(format!(
                "Unknown method '{}'. Run 'rpcdeck methods' to list them",
                name
            )))
        }
    }

    fn list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
        let slots = ctx.dashboard.slots();
        match format {
            OutputFormat::Table => Self::display_table(ctx, &slots),
            _ => println!("{}", format.format_json(&Self::to_json(ctx, &slots))?),
        }
        Ok(())
    }

    pub fn to_json(ctx: &AppContext, slots: &SlotCollection) -> JsonValue {
        let entries: Vec<JsonValue> = slots
            .iter()
            .map(|slot| {
                let descriptor = ctx.dashboard.resolve(slot);
                json!({
                    "id": slot.id,
                    "methodName": slot.method_name,
                    "configured": descriptor.is_some(),
                    "params": descriptor.map(|d| d.params().to_vec()).unwrap_or_default(),
                })
            })
            .collect();
        JsonValue::Array(entries)
    }

    fn display_table(ctx: &AppContext, slots: &SlotCollection) {
        if slots.is_empty() {
            let hint = "No slots. Add one with 'rpcdeck slots add <METHOD>'";
            println!("{}", ColoredOutput::info(hint));
            return;
        }

        println!(
            "{:<4} {:<38} {:<18} {:<12} {}",
            ColoredOutput::highlight("#"),
            ColoredOutput::highlight("Slot"),
            ColoredOutput::highlight("Method"),
            ColoredOutput::highlight("State"),
            ColoredOutput::highlight("Parameters")
        );
        println!("{}", "-".repeat(96));

        for (index, slot) in slots.iter().enumerate() {
            let descriptor = ctx.dashboard.resolve(slot);
            let method = match (&slot.method_name, &descriptor) {
                (Some(name), Some(_)) => name.clone(),
                (Some(name), None) if !name.is_empty() => format!("{} (unknown)", name),
                _ => "(unconfigured)".to_string(),
            };
            let params = descriptor
                .map(|d| d.params().iter().map(|p| p.name.clone()).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            let state = ctx.dashboard.state(&slot.id);
            let state = match (&state, ctx.dashboard.record(&slot.id)) {
                (ExecutionState::Idle, _) => ColoredOutput::dim(state.label()),
                (ExecutionState::Failed(_), _) => ColoredOutput::error(state.label()),
                (_, Some(record)) => ColoredOutput::success(&format!(
                    "{} {}",
                    state.label(),
                    format_duration_ms(record.duration_ms)
                )),
                _ => ColoredOutput::info(state.label()),
            };
            println!(
                "{:<4} {:<38} {:<18} {:<12} {}",
                index + 1,
                slot.id.as_str(),
                method,
                state,
                params
            );
        }
    }
}
