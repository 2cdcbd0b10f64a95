//! Single-method execution, through a slot or directly

use crate::{
    cli::OutputFormat,
    commands::report_outcome,
    context::AppContext,
    error::CliResult,
    utils::parse_params,
};
use rpcdeck_runtime::ExecutionEngine;
use tracing::info;

pub struct ExecCommand;

impl ExecCommand {
    pub async fn run(
        ctx: &AppContext,
        slot: &str,
        params: &[String],
        format: OutputFormat,
    ) -> CliResult<()> {
        let id = ctx.resolve_slot(slot)?;
        let values = parse_params(params)?;

        info!(slot = %id, rpc_url = %ctx.config.rpc_url, "Executing slot");
        let state = ctx.dashboard.execute(&id, &values).await?;
        let title = ctx
            .dashboard
            .slot(&id)
            .and_then(|s| s.method_name)
            .unwrap_or_else(|| id.to_string());
        report_outcome(&title, &state, ctx.dashboard.record(&id).as_ref(), format)
    }
}

pub struct CallCommand;

impl CallCommand {
    pub async fn run(
        ctx: &AppContext,
        method: &str,
        params: &[String],
        format: OutputFormat,
    ) -> CliResult<()> {
        let descriptor = ctx.dashboard.registry().require(method)?;
        let values = parse_params(params)?;

        info!(method = %method, rpc_url = %ctx.config.rpc_url, "Calling method");
        let engine = ExecutionEngine::new();
        let state = engine.execute(&descriptor, &values).await;
        report_outcome(method, &state, engine.last_record().as_ref(), format)
    }
}
