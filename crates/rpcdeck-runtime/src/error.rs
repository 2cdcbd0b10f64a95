use rpcdeck_core::SlotId;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Slot not found: {0}")]
    SlotNotFound(SlotId),

    #[error("Slot {0} has no method configured")]
    SlotNotConfigured(SlotId),
}
