//! Error types for the transport layer

use thiserror::Error;

/// Failures of a single JSON-RPC exchange
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The endpoint could not be reached or the exchange broke off
    #[error("RPC Error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC `error` envelope
    #[error("{message}")]
    Protocol { code: i64, message: String },

    /// The body was not JSON or not a JSON-RPC response
    #[error("RPC Error: invalid response: {0}")]
    Parse(String),
}

impl TransportError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn protocol(code: i64, message: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Transport result type
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_error_displays_endpoint_message_only() {
        assert_eq!(TransportError::protocol(-32000, "boom").to_string(), "boom");
        assert_eq!(
            TransportError::transport("connection refused").to_string(),
            "RPC Error: connection refused"
        );
        assert_eq!(TransportError::parse("eof").kind(), "parse");
    }
}
