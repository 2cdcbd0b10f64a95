use httpmock::prelude::*;
use rpcdeck_core::SlotId;
use rpcdeck_registry::catalog;
use rpcdeck_runtime::{Dashboard, ExecutionState, RuntimeError};
use rpcdeck_store::{MemoryKeyValueStore, PersistencePolicy, SlotStore, DEFAULT_STORAGE_KEY};
use rpcdeck_transport::{HttpTransport, MockTransport, Transport, TransportError};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn dashboard(transport: Arc<dyn Transport>) -> Dashboard {
    let registry = Arc::new(catalog::anvil(transport));
    let store = SlotStore::open(
        Arc::new(MemoryKeyValueStore::new()),
        DEFAULT_STORAGE_KEY,
        PersistencePolicy::DegradeToMemory,
    );
    Dashboard::new(registry, store)
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn slot_for(dashboard: &Dashboard, method: &str) -> SlotId {
    dashboard
        .slots()
        .iter()
        .find(|slot| slot.method_name.as_deref() == Some(method))
        .map(|slot| slot.id.clone())
        .unwrap()
}

#[tokio::test]
async fn error_envelope_fails_the_slot_with_the_server_message() {
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
    let dashboard = dashboard(Arc::new(HttpTransport::new(server.base_url()).unwrap()));
    let id = slot_for(&dashboard, "getBlockNumber");

    let state = dashboard.execute(&id, &HashMap::new()).await.unwrap();

    assert_eq!(state, ExecutionState::Failed("boom".into()));
    assert_eq!(dashboard.state(&id), state);
}

#[tokio::test]
async fn balance_lookup_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            let request = r#"{"method": "eth_getBalance", "params": ["0xABC", "latest"]}"#;
            when.method(POST).path("/").json_body_partial(request);
            then.status(200)
                .json_body(json!({"jsonrpc": "2.0", "id": 1, "result": "0xDE0B6B3A7640000"}));
        })
        .await;
    let dashboard = dashboard(Arc::new(HttpTransport::new(server.base_url()).unwrap()));
    let id = slot_for(&dashboard, "getBalance");

    let state = dashboard.execute(&id, &params(&[("address", "0xABC")])).await.unwrap();

    mock.assert_async().await;
    assert_eq!(state, ExecutionState::Succeeded(json!("1.000000")));
    let record = dashboard.record(&id).unwrap();
    assert_eq!(record.method, "eth_getBalance");
}

#[tokio::test]
async fn fast_and_slow_slots_finish_independently() {
    let transport = MockTransport::new()
        .with_result("eth_blockNumber", json!("0x2a"))
        .with_result("eth_getBalance", json!("0x0"))
        .with_delay("eth_getBalance", Duration::from_millis(150))
        .with_result("anvil_setBalance", json!(null));
    let dashboard = dashboard(Arc::new(transport));
    let balance = slot_for(&dashboard, "getBalance");
    let block = slot_for(&dashboard, "getBlockNumber");

    let balance_params = params(&[("address", "0x1")]);
    let no_params = HashMap::new();
    let (slow, fast) = tokio::join!(
        dashboard.execute(&balance, &balance_params),
        async {
            let state = dashboard.execute(&block, &no_params).await;
            assert!(dashboard.state(&balance).is_pending());
            state
        }
    );

    assert_eq!(fast.unwrap(), ExecutionState::Succeeded(json!("42")));
    assert_eq!(slow.unwrap(), ExecutionState::Succeeded(json!("0.000000")));
    assert_eq!(dashboard.state(&balance), ExecutionState::Succeeded(json!("0.000000")));
}

#[tokio::test]
async fn execute_all_reports_in_slot_order() {
    let transport = MockTransport::new()
        .with_result("anvil_setBalance", json!(null))
        .with_delay("anvil_setBalance", Duration::from_millis(50))
        .with_result("eth_getBalance", json!("0xDE0B6B3A7640000"))
        .with_result("eth_blockNumber", json!("0x1"));
    let dashboard = dashboard(Arc::new(transport));
    dashboard.add_slot(None);
    let ids = dashboard.slots().ids();
    let by_slot = HashMap::from([
        (ids[0].clone(), params(&[("address", "0x1"), ("balance", "1")])),
        (ids[1].clone(), params(&[("address", "0x1")])),
    ]);

    let results = dashboard.execute_all(&by_slot).await;

    let order: Vec<SlotId> = results.iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(order, ids[..3].to_vec());
    assert_eq!(results[0].1, ExecutionState::Succeeded(json!(null)));
    assert_eq!(results[1].1, ExecutionState::Succeeded(json!("1.000000")));
    assert_eq!(results[2].1, ExecutionState::Succeeded(json!("1")));
    assert_eq!(dashboard.state(&ids[3]), ExecutionState::Idle);
}

#[tokio::test]
async fn removing_a_pending_slot_discards_its_result() {
    let transport = Arc::new(
        MockTransport::new()
            .with_result("eth_blockNumber", json!("0x2a"))
            .with_delay("eth_blockNumber", Duration::from_millis(100)),
    );
    let dashboard = dashboard(transport.clone());
    let id = slot_for(&dashboard, "getBlockNumber");

    let no_params = HashMap::new();
    let (state, _) = tokio::join!(dashboard.execute(&id, &no_params), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        dashboard.remove_slot(&id);
    });

    assert_eq!(state.unwrap(), ExecutionState::Succeeded(json!("42")));
    assert_eq!(transport.call_count(), 1);
    assert!(dashboard.board().get(&id).is_none());
    assert_eq!(dashboard.state(&id), ExecutionState::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn removed_slots_never_regain_an_engine() {
    let transport = Arc::new(MockTransport::new().with_result("eth_blockNumber", json!("0x2a")));
    let dashboard = Arc::new(dashboard(transport));

    for _ in 0..50 {
        let id = dashboard.add_slot(Some("getBlockNumber")).ids().last().cloned().unwrap();
        let runner = {
            let dashboard = Arc::clone(&dashboard);
            let id = id.clone();
            tokio::spawn(async move { dashboard.execute(&id, &HashMap::new()).await })
        };
        let remover = {
            let dashboard = Arc::clone(&dashboard);
            let id = id.clone();
            tokio::spawn(async move {
                dashboard.remove_slot(&id);
            })
        };

        let (run, removed) = tokio::join!(runner, remover);
        removed.unwrap();
        match run.unwrap() {
            Ok(state) => assert_eq!(state, ExecutionState::Succeeded(json!("42"))),
            Err(err) => assert!(matches!(err, RuntimeError::SlotNotFound(_)), "{err}"),
        }
        assert!(dashboard.board().get(&id).is_none());
    }

    let live = dashboard.slots().ids();
    for (id, _) in dashboard.board().snapshot() {
        assert!(live.contains(&id), "engine left behind for {id}");
    }
}

#[tokio::test]
async fn unconfigured_and_stale_slots_are_rejected() {
    let transport = Arc::new(MockTransport::new());
    let dashboard = dashboard(transport.clone());
    let blank = dashboard.add_slot(None).ids()[3].clone();
    let stale = dashboard.add_slot(Some("eth_sendEverything")).ids()[4].clone();

    assert!(matches!(
        dashboard.execute(&blank, &HashMap::new()).await,
        Err(RuntimeError::SlotNotConfigured(_))
    ));
    assert!(matches!(
        dashboard.execute(&stale, &HashMap::new()).await,
        Err(RuntimeError::SlotNotConfigured(_))
    ));
    assert!(matches!(
        dashboard.execute(&SlotId::new("nope"), &HashMap::new()).await,
        Err(RuntimeError::SlotNotFound(_))
    ));
    assert_eq!(transport.call_count(), 0);
    assert!(dashboard.board().is_empty());
}

#[tokio::test]
async fn load_all_methods_mirrors_the_catalog() {
    let dashboard = dashboard(Arc::new(MockTransport::new().with_error(
        "eth_accounts",
        TransportError::transport("connection refused"),
    )));

    let slots = dashboard.load_all_methods();

    let names: Vec<String> = slots.iter().filter_map(|s| s.method_name.clone()).collect();
    assert_eq!(names, dashboard.registry().method_names());
    let accounts = slot_for(&dashboard, "getAccounts");
    let state = dashboard.execute(&accounts, &HashMap::new()).await.unwrap();
    assert_eq!(state.error(), Some("RPC Error: connection refused"));
}
