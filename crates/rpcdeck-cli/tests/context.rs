use httpmock::prelude::*;
use rpcdeck_cli::commands::{CallCommand, ExecCommand, RunAllCommand};
use rpcdeck_cli::{AppContext, CliError};
use rpcdeck_cli::cli::OutputFormat;
use rpcdeck_config::AppConfig;
use rpcdeck_runtime::ExecutionState;
use serde_json::json;
use tempfile::TempDir;

fn config(url: String, dir: &TempDir) -> AppConfig {
    AppConfig {
        rpc_url: url,
        state_dir: dir.path().join("state"),
        ..AppConfig::default()
    }
}

#[tokio::test]
async fn slots_persist_between_contexts() {
    let dir = TempDir::new().unwrap();
    let first =
        AppContext::from_config(config("http://localhost:8545".into(), &dir), false).unwrap();
    first.dashboard.add_slot(Some("mine"));
    let expected = first.dashboard.slots();

    let second =
        AppContext::from_config(config("http://localhost:8545".into(), &dir), false).unwrap();
    assert_eq!(second.dashboard.slots(), expected);
    assert!(dir.path().join("state").join("rpcdeck.slots.json").exists());
}

#[tokio::test]
async fn ephemeral_context_leaves_no_files() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::from_config(config("http://localhost:8545".into(), &dir), true).unwrap();
    assert_eq!(ctx.dashboard.slots().len(), 3);
    assert!(!dir.path().join("state").exists());
}

#[tokio::test]
async fn slots_resolve_by_unique_prefix() {
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::from_config(config("http://localhost:8545".into(), &dir), true).unwrap();
    let id = ctx.dashboard.slots().ids()[1].clone();

    assert_eq!(ctx.resolve_slot(id.as_str()).unwrap(), id);
    assert_eq!(ctx.resolve_slot(&id.as_str()[..20]).unwrap(), id);
    assert!(matches!(ctx.resolve_slot("zzz"), Err(CliError::InvalidArgument(_))));
    assert!(matches!(ctx.resolve_slot(""), Err(CliError::InvalidArgument(_))));
}

#[tokio::test]
async fn exec_runs_a_slot_against_the_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/").json_body_partial(r#"{"method": "eth_blockNumber"}"#);
            then.status(200).json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0x2a"}));
        })
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::from_config(config(server.base_url(), &dir), true).unwrap();
    let id = ctx.dashboard.slots().ids()[2].clone();

    ExecCommand::run(&ctx, &id.as_str()[..8], &[], OutputFormat::Json).await.unwrap();

    mock.assert_async().await;
    assert_eq!(ctx.dashboard.state(&id), ExecutionState::Succeeded(json!("42")));
}

#[tokio::test]
async fn failed_calls_become_cli_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -32000, "message": "boom"}
            }));
        })
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = AppContext::from_config(config(server.base_url(), &dir), true).unwrap();

    let err = CallCommand::run(&ctx, "getAccounts", &[], OutputFormat::Json).await.unwrap_err();
    assert!(matches!(err, CliError::ExecutionFailed(ref msg) if msg.ends_with("boom")));

    let err = RunAllCommand::run(&ctx, &[]).await.unwrap_err();
    assert!(matches!(err, CliError::ExecutionFailed(_)));

    assert!(matches!(
        CallCommand::run(&ctx, "noSuchMethod", &[], OutputFormat::Json).await,
        Err(CliError::Registry(_))
    ));
}
