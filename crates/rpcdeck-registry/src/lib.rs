pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod registry;

// Re-export commonly used types
pub use descriptor::{CallFn, CallFuture, MethodDescriptor, MethodInfo, ParameterSpec};
pub use error::{RegistryError, RegistryResult, RpcError};
pub use registry::{MethodCategory, MethodOption, MethodRegistry, RegistryBuilder};
