use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rpcdeck_registry::MethodDescriptor;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Message shown when a failure carries no text of its own
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Where a slot's most recent invocation stands
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum ExecutionState {
    #[default]
    Idle,
    Pending,
    Succeeded(JsonValue),
    Failed(String),
}

impl ExecutionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn result(&self) -> Option<&JsonValue> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Metadata of a completed invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    /// JSON-RPC method that was called
    pub method: String,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct EngineInner {
    state: ExecutionState,
    record: Option<ExecutionRecord>,
    generation: u64,
}

/// Drives one slot through `Idle -> Pending -> Succeeded | Failed`.
///
/// Re-invoking while a call is in flight starts a new generation; only the
/// newest generation may write its outcome. A detached engine keeps running
/// calls to completion but never records them.
#[derive(Debug, Default)]
pub struct ExecutionEngine {
    inner: RwLock<EngineInner>,
    detached: AtomicBool,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ExecutionState {
        self.inner.read().state.clone()
    }

    /// Record of the last applied completion
    pub fn last_record(&self) -> Option<ExecutionRecord> {
        self.inner.read().record.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.read().state.is_pending()
    }

    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }

    /// Collect `descriptor`'s parameters from `values` by name, call it and
    /// return the outcome of this invocation.
    pub async fn execute(
        &self,
        descriptor: &MethodDescriptor,
        values: &HashMap<String, String>,
    ) -> ExecutionState {
        let generation = {
            let mut inner = self.inner.write();
            inner.generation += 1;
            if !self.is_detached() {
                inner.state = ExecutionState::Pending;
            }
            inner.generation
        };

        let args: Vec<String> = descriptor
            .params()
            .iter()
            .map(|param| values.get(&param.name).cloned().unwrap_or_default())
            .collect();

        tracing::info!(
            method = %descriptor.name(),
            wire_method = %descriptor.wire_method(),
            "Starting method execution"
        );
        let started = Instant::now();
        let outcome = match descriptor.invoke(args).await {
            Ok(value) => ExecutionState::Succeeded(value),
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(
                    method = %descriptor.name(),
                    kind = e.kind(),
                    error = %message,
                    "Method execution failed"
                );
                if message.is_empty() {
                    ExecutionState::Failed(UNKNOWN_ERROR.to_string())
                } else {
                    ExecutionState::Failed(message)
                }
            }
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let mut inner = self.inner.write();
        if self.is_detached() {
            tracing::debug!(
                method = %descriptor.name(),
                "Discarding completion of detached engine"
            );
        } else if inner.generation != generation {
            tracing::debug!(
                method = %descriptor.name(),
                generation,
                latest = inner.generation,
                "Discarding stale completion"
            );
        } else {
            inner.state = outcome.clone();
            inner.record = Some(ExecutionRecord {
                method: descriptor.wire_method().to_string(),
                duration_ms,
                completed_at: Utc::now(),
            });
            tracing::debug!(
                method = %descriptor.name(),
                duration_ms,
                status = outcome.label(),
                "Method execution finished"
            );
        }
        outcome
    }
}
