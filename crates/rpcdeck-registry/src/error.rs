//! Error types for the registry system

use rpcdeck_transport::TransportError;
use thiserror::Error;

/// Why a descriptor invocation failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcError {
    /// Transport, protocol or parse failure from the wire exchange
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A parameter or result failed conversion; no request was sent for parameter failures
    #[error("{0}")]
    Conversion(String),
}

impl RpcError {
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Short label for logs: transport, protocol, parse or conversion
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(e) => e.kind(),
            Self::Conversion(_) => "conversion",
        }
    }
}

/// Registry lookup errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Method '{0}' is not in the catalog")]
    MethodNotFound(String),

    #[error("Category '{0}' is not in the catalog")]
    CategoryNotFound(String),
}

/// Registry result type
pub type RegistryResult<T> = Result<T, RegistryError>;
