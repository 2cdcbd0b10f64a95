//! rpcdeck CLI main entry point

use clap::Parser;
use rpcdeck_cli::{
    cli::{Cli, Commands},
    commands::{CallCommand, ExecCommand, MethodsCommand, RunAllCommand, SlotsCommand},
    context::AppContext,
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::debug;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    // Disable colored output if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("rpcdeck v{}", env!("CARGO_PKG_VERSION"));

    let ctx = AppContext::build(&cli)?;

    match cli.command {
        Commands::Methods { format } => MethodsCommand::run(ctx.dashboard.registry(), format),
        Commands::Slots { action } => SlotsCommand::run(&ctx, action),
        Commands::Exec { id, params, format } => {
            ExecCommand::run(&ctx, &id, &params, format).await
        }
        Commands::Call {
            method,
            params,
            format,
        } => CallCommand::run(&ctx, &method, &params, format).await,
        Commands::RunAll { params } => RunAllCommand::run(&ctx, &params).await,
    }
}
