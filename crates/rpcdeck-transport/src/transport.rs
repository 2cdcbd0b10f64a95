use crate::error::TransportResult;
use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Sends one JSON-RPC request and returns its `result` member
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method` with positional `params`
    async fn send(&self, method: &str, params: Vec<JsonValue>) -> TransportResult<JsonValue>;

    /// Where requests go, for display and logs
    fn endpoint(&self) -> &str;
}
