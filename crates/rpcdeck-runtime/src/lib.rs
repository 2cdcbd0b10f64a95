pub mod board;
pub mod dashboard;
pub mod error;
pub mod execution;

pub use board::ExecutionBoard;
pub use dashboard::Dashboard;
pub use error::{RuntimeError, RuntimeResult};
pub use execution::{ExecutionEngine, ExecutionRecord, ExecutionState, UNKNOWN_ERROR};
