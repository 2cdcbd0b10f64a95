pub mod error;
pub mod params;
pub mod types;
pub mod units;

// Re-export commonly used types
pub use error::{CoreError, CoreResult};
pub use params::{ParamKind, ParamValue};
pub use types::{InvocationSlot, SlotCollection, SlotId, DEFAULT_METHODS};
pub use primitive_types::U256;
pub use units::{eth_to_wei_hex, from_hex, to_hex, wei_hex_to_eth};
