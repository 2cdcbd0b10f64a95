//! Scripted in-process transport for tests and offline demos

use crate::error::{TransportError, TransportResult};
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::time::Duration;

/// A request observed by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Vec<JsonValue>,
}

#[derive(Debug, Clone)]
struct Scripted {
    response: TransportResult<JsonValue>,
    delay: Option<Duration>,
}

/// Answers from a `method -> response` table and records every call.
/// Unscripted methods fail with a JSON-RPC "Method not found" error.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with `result`
    pub fn with_result(self, method: &str, result: JsonValue) -> Self {
        let scripted = Scripted {
            response: Ok(result),
            delay: None,
        };
        self.script.lock().insert(method.to_string(), scripted);
        self
    }

    /// Answer `method` with `error`
    pub fn with_error(self, method: &str, error: TransportError) -> Self {
        let scripted = Scripted {
            response: Err(error),
            delay: None,
        };
        self.script.lock().insert(method.to_string(), scripted);
        self
    }

    /// Delay the scripted answer for `method`
    pub fn with_delay(self, method: &str, delay: Duration) -> Self {
        if let Some(entry) = self.script.lock().get_mut(method) {
            entry.delay = Some(delay);
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, method: &str, params: Vec<JsonValue>) -> TransportResult<JsonValue> {
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            params,
        });

        let scripted = self.script.lock().get(method).cloned();
        let Some(scripted) = scripted else {
            return Err(TransportError::protocol(-32601, "Method not found"));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.response
    }

    fn endpoint(&self) -> &str {
        "mock://"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn answers_from_script_and_records_calls() {
        let mock = MockTransport::new()
            .with_result("eth_blockNumber", json!("0x10"))
            .with_error("eth_call", TransportError::protocol(3, "reverted"));

        assert_eq!(mock.send("eth_blockNumber", vec![]).await.unwrap(), json!("0x10"));
        let err = mock.send("eth_call", vec![json!({})]).await.unwrap_err();
        assert_eq!(err.to_string(), "reverted");
        assert_eq!(
            mock.send("nope", vec![]).await.unwrap_err(),
            TransportError::protocol(-32601, "Method not found")
        );

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1],
            RecordedCall {
                method: "eth_call".into(),
                params: vec![json!({})]
            }
        );
    }
}
