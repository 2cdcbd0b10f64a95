//! Built-in catalog for Anvil / Ethereum dev nodes.
//!
//! Every descriptor is bound to the transport passed in, so several catalogs
//! can target different endpoints side by side.

use crate::descriptor::{CallFn, CallFuture, MethodDescriptor, ParameterSpec};
use crate::error::RpcError;
use crate::registry::MethodRegistry;
use futures::FutureExt;
use rpcdeck_core::{units, ParamKind, ParamValue};
use rpcdeck_transport::Transport;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Post-processing applied to a successful result
type Shape = fn(JsonValue) -> Result<JsonValue, RpcError>;

/// Build the standard/anvil/debug catalog against `transport`
pub fn anvil(transport: Arc<dyn Transport>) -> MethodRegistry {
    let t = &transport;
    MethodRegistry::builder()
        .category("standard", "Standard Methods")
        .method(
            MethodDescriptor::new(
                "getAccounts",
                "Get Accounts",
                "eth_accounts",
                bind(t, "eth_accounts", &[], verbatim),
            )
            .with_description("Returns a list of addresses owned by client"),
        )
        .method(
            MethodDescriptor::new(
                "getBalance",
                "Get Balance",
                "eth_getBalance",
                bind(t, "eth_getBalance", &["latest"], wei_to_ether),
            )
            .with_param(ParameterSpec::new("address", ParamKind::Hex, "0x..."))
            .with_description("Returns the balance of the given address"),
        )
        .method(
            MethodDescriptor::new(
                "getBlockNumber",
                "Get Block Number",
                "eth_blockNumber",
                bind(t, "eth_blockNumber", &[], hex_to_decimal),
            )
            .with_description("Returns the current block number"),
        )
        .category("anvil", "Anvil Methods")
        .method(
            MethodDescriptor::new(
                "impersonateAccount",
                "Impersonate Account",
                "anvil_impersonateAccount",
                bind(t, "anvil_impersonateAccount", &[], verbatim),
            )
            .with_param(ParameterSpec::new("address", ParamKind::Hex, "0x..."))
            .with_description("Impersonate an address for sending transactions"),
        )
        .method(
            MethodDescriptor::new(
                "setBalance",
                "Set Balance",
                "anvil_setBalance",
                bind(t, "anvil_setBalance", &[], verbatim),
            )
            .with_param(ParameterSpec::new("address", ParamKind::Hex, "0x..."))
            .with_param(ParameterSpec::new("balance", ParamKind::Ether, "Balance in ETH"))
            .with_description("Sets the balance of an address"),
        )
        .method(
            MethodDescriptor::new(
                "mine",
                "Mine Blocks",
                "anvil_mine",
                bind(t, "anvil_mine", &[], verbatim),
            )
            .with_param(ParameterSpec::new("blocks", ParamKind::Quantity, "Number of blocks"))
            .with_description("Mine a number of blocks"),
        )
        .category("debug", "Debug Methods")
        .method(
            MethodDescriptor::new(
                "traceTransaction",
                "Trace Transaction",
                "debug_traceTransaction",
                bind(t, "debug_traceTransaction", &[], verbatim),
            )
            .with_param(ParameterSpec::new("txHash", ParamKind::Hex, "0x..."))
            .with_description("Traces a transaction execution"),
        )
        .build()
}

/// Bind `wire` on `transport`: user params in order, then `trailing` literals, then `shape`
fn bind(
    transport: &Arc<dyn Transport>,
    wire: &'static str,
    trailing: &'static [&'static str],
    shape: Shape,
) -> CallFn {
    let transport = Arc::clone(transport);
    Arc::new(move |values: Vec<ParamValue>| -> CallFuture {
        let transport = Arc::clone(&transport);
        async move {
            let mut params: Vec<JsonValue> = values.iter().map(ParamValue::to_json).collect();
            params.extend(trailing.iter().map(|literal| JsonValue::String((*literal).to_string())));
            let result = transport.send(wire, params).await?;
            shape(result)
        }
        .boxed()
    })
}

fn verbatim(result: JsonValue) -> Result<JsonValue, RpcError> {
    Ok(result)
}

fn hex_str(result: &JsonValue) -> Result<&str, RpcError> {
    result
        .as_str()
        .ok_or_else(|| RpcError::conversion(format!("expected a hex quantity, got {}", result)))
}

/// Hex wei balance to a decimal ether string
fn wei_to_ether(result: JsonValue) -> Result<JsonValue, RpcError> {
    let eth = units::wei_hex_to_eth(hex_str(&result)?)
        .map_err(|e| RpcError::conversion(e.to_string()))?;
    Ok(JsonValue::String(eth))
}

/// Hex quantity to a decimal string
fn hex_to_decimal(result: JsonValue) -> Result<JsonValue, RpcError> {
    let n = units::from_hex(hex_str(&result)?).map_err(|e| RpcError::conversion(e.to_string()))?;
    Ok(JsonValue::String(n.to_string()))
}
