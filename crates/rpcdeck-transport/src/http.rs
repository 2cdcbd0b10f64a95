//! reqwest-backed JSON-RPC transport

use crate::error::{TransportError, TransportResult};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// JSON-RPC 2.0 over HTTP POST against a single endpoint.
///
/// No retries and no request timeout: a call resolves when the socket does.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Create a transport for `url`, which must be an absolute http(s) URL
    pub fn new(url: impl Into<String>) -> TransportResult<Self> {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create a transport that reuses an existing client
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> TransportResult<Self> {
        let url = url.into();
        let parsed = reqwest::Url::parse(&url).map_err(|e| {
            TransportError::transport(format!("invalid endpoint URL '{}': {}", url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::transport(format!(
                "unsupported endpoint scheme '{}'",
                parsed.scheme()
            )));
        }
        Ok(Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Turn a raw HTTP exchange into the call's outcome
    fn interpret(status: reqwest::StatusCode, body: &[u8]) -> TransportResult<JsonValue> {
        let envelope = match serde_json::from_slice::<JsonRpcResponse>(body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TransportError::transport(format!("HTTP status {}", status)));
            }
            Err(e) => return Err(TransportError::parse(e.to_string())),
        };

        // A JSON-RPC error wins over any HTTP-level failure
        if let Some(error) = envelope.error {
            return Err(TransportError::Protocol {
                code: error.code,
                message: error.message,
            });
        }
        if !status.is_success() {
            return Err(TransportError::transport(format!("HTTP status {}", status)));
        }
        envelope
            .result
            .ok_or_else(|| TransportError::parse("response has neither result nor error"))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: &str, params: Vec<JsonValue>) -> TransportResult<JsonValue> {
        let id = self.next_id();
        let request = JsonRpcRequest::new(id, method, params);
        debug!(method = %method, id = id, endpoint = %self.url, "sending JSON-RPC request");

        let outcome: TransportResult<JsonValue> = async {
            let response = self
                .client
                .post(&self.url)
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(&request)
                .send()
                .await?;
            let status = response.status();
            let body = response.bytes().await?;
            Self::interpret(status, &body)
        }
        .await;

        match &outcome {
            Ok(_) => debug!(method = %method, id = id, "JSON-RPC request succeeded"),
            Err(e) => warn!(
                method = %method,
                id = id,
                kind = e.kind(),
                error = %e,
                "JSON-RPC request failed"
            ),
        }
        outcome
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn rejects_invalid_urls() {
        assert!(HttpTransport::new("not a url").is_err());
        assert!(HttpTransport::new("ftp://localhost:8545").is_err());
        assert!(HttpTransport::new("http://localhost:8545").is_ok());
    }

    #[test]
    fn ids_are_monotonic() {
        let transport = HttpTransport::new("http://localhost:8545").unwrap();
        let a = transport.next_id();
        let b = transport.next_id();
        assert!(b > a);
    }

    #[test]
    fn interpret_prefers_jsonrpc_error_over_http_status() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"boom"}}"#;
        let err = HttpTransport::interpret(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert_eq!(err, TransportError::protocol(-32000, "boom"));
    }

    #[test]
    fn interpret_classifies_bad_bodies() {
        let err = HttpTransport::interpret(StatusCode::OK, b"<html>").unwrap_err();
        assert_eq!(err.kind(), "parse");

        let err = HttpTransport::interpret(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert_eq!(err.kind(), "transport");

        let err =
            HttpTransport::interpret(StatusCode::OK, br#"{"jsonrpc":"2.0","id":1}"#).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn interpret_returns_result_verbatim() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":{"a":[1,2]}}"#;
        assert_eq!(HttpTransport::interpret(StatusCode::OK, body).unwrap(), json!({"a": [1, 2]}));

        let body = br#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        assert_eq!(HttpTransport::interpret(StatusCode::OK, body).unwrap(), JsonValue::Null);
    }
}
