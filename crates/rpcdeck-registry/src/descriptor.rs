//! Method descriptors: one invocable remote procedure each

use crate::error::RpcError;
use futures::future::BoxFuture;
use rpcdeck_core::{ParamKind, ParamValue};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Future returned by a bound call function
pub type CallFuture = BoxFuture<'static, Result<JsonValue, RpcError>>;

/// Procedure-specific call: converts validated params, talks to the transport
/// and shapes the response.
pub type CallFn = Arc<dyn Fn(Vec<ParamValue>) -> CallFuture + Send + Sync>;

/// One positional parameter of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    /// UI label and key of the collected input
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub placeholder: String,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind, placeholder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            placeholder: placeholder.into(),
        }
    }

    /// Free-text parameter
    pub fn string(name: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String, placeholder)
    }

    /// Validate raw input for this parameter
    pub fn parse(&self, raw: &str) -> Result<ParamValue, RpcError> {
        self.kind
            .parse(raw)
            .map_err(|e| RpcError::conversion(format!("Invalid parameter '{}': {}", self.name, e)))
    }
}

/// Immutable description of an invocable remote procedure
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    label: String,
    wire_method: String,
    params: Vec<ParameterSpec>,
    description: Option<String>,
    call: CallFn,
}

impl MethodDescriptor {
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        wire_method: impl Into<String>,
        call: CallFn,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            wire_method: wire_method.into(),
            params: Vec::new(),
            description: None,
            call,
        }
    }

    pub fn with_param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// JSON-RPC method this descriptor calls
    pub fn wire_method(&self) -> &str {
        &self.wire_method
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Validate positional args against the parameter specs. Missing args count as empty
    /// text and extra args are ignored. Pure: never touches the network.
    pub fn prepare(&self, args: &[String]) -> Result<Vec<ParamValue>, RpcError> {
        self.params
            .iter()
            .enumerate()
            .map(|(i, spec)| spec.parse(args.get(i).map(String::as_str).unwrap_or("")))
            .collect()
    }

    /// Validate `args` and run the bound call
    pub async fn invoke(&self, args: Vec<String>) -> Result<JsonValue, RpcError> {
        let values = self.prepare(&args)?;
        (self.call)(values).await
    }

    /// Serializable summary for listings
    pub fn info(&self) -> MethodInfo {
        MethodInfo {
            name: self.name.clone(),
            label: self.label.clone(),
            method: self.wire_method.clone(),
            params: self.params.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("wire_method", &self.wire_method)
            .field("params", &self.params)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Descriptor metadata without the call function
#[derive(Debug, Clone, Serialize)]
pub struct MethodInfo {
    pub name: String,
    pub label: String,
    pub method: String,
    pub params: Vec<ParameterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
