//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] rpcdeck_config::ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] rpcdeck_registry::RegistryError),

    #[error("Store error: {0}")]
    Store(#[from] rpcdeck_store::StoreError),

    #[error("Transport error: {0}")]
    Transport(#[from] rpcdeck_transport::TransportError),

    #[error("{0}")]
    Runtime(#[from] rpcdeck_runtime::RuntimeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("General error: {0}")]
    General(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::General(format!("{:#}", err))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
