use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Text that does not satisfy a parameter kind or unit conversion
    #[error("{0}")]
    Invalid(String),
}
