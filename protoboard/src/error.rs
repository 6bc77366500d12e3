use thiserror::Error;

/// Structural precondition violations raised during circuit construction
/// or evaluation. An unsatisfied constraint system is not an error, it is
/// the `Ok(false)` outcome of a satisfaction check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtoboardError {
    #[error("index {index} out of range, {allocated} allocated")]
    OutOfRange { index: usize, allocated: usize },

    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}

pub type Result<T> = core::result::Result<T, ProtoboardError>;
