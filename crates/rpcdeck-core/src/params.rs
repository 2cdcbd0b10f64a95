//! Tagged parameter values: raw UI text is checked against a [`ParamKind`]
//! before any procedure-specific conversion runs.

use crate::error::{CoreError, CoreResult};
use crate::units::{self, strip_hex_prefix};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Semantic type of a descriptor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKind {
    /// Free text, passed through untouched
    #[default]
    String,
    /// `0x`-prefixed hex (addresses, hashes, calldata)
    Hex,
    /// Non-negative integer, decimal or `0x` hex
    Quantity,
    /// Decimal ether amount, converted to wei
    Ether,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Hex => "hex",
            ParamKind::Quantity => "quantity",
            ParamKind::Ether => "ether",
        }
    }

    /// Validate raw text and produce a typed value
    pub fn parse(&self, raw: &str) -> CoreResult<ParamValue> {
        match self {
            ParamKind::String => Ok(ParamValue::Text(raw.to_string())),
            ParamKind::Hex => {
                let trimmed = raw.trim();
                match strip_hex_prefix(trimmed) {
                    Some(digits)
                        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) =>
                    {
                        Ok(ParamValue::Hex(trimmed.to_string()))
                    }
                    _ => Err(CoreError::Invalid(format!(
                        "expected 0x-prefixed hex, got '{}'",
                        raw
                    ))),
                }
            }
            ParamKind::Quantity => units::parse_quantity(raw).map(ParamValue::Number),
            ParamKind::Ether => units::eth_to_wei(raw).map(ParamValue::Number),
        }
    }
}

/// A validated parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Hex(String),
    Number(U256),
}

impl ParamValue {
    /// Textual content of `Text`/`Hex` values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) | ParamValue::Hex(s) => Some(s),
            ParamValue::Number(_) => None,
        }
    }

    /// Integer content of `Number` values
    pub fn as_number(&self) -> Option<U256> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Wire form: strings verbatim, numbers as hex quantities
    pub fn to_json(&self) -> JsonValue {
        match self {
            ParamValue::Text(s) | ParamValue::Hex(s) => JsonValue::String(s.clone()),
            ParamValue::Number(n) => JsonValue::String(units::to_hex(*n)),
        }
    }
}
