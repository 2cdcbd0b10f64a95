pub mod error;
pub mod http;
pub mod jsonrpc;
pub mod mock;
pub mod transport;

// Re-export commonly used types
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId, JSONRPC_VERSION};
pub use mock::{MockTransport, RecordedCall};
pub use transport::Transport;
