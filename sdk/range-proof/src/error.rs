use blsct_curve::HashToCurveError;
use thiserror::Error;

/// Reasons a range proof cannot be constructed
#[derive(Debug, Error)]
pub enum RangeProofError {
    #[error("range proof needs at least one amount")]
    EmptyAmounts,

    #[error("too many amounts: got {got}, max {max}")]
    TooManyAmounts { got: usize, max: usize },

    #[error("amount {amount} at index {index} exceeds {max}")]
    AmountOutOfRange { index: usize, amount: u64, max: u64 },

    #[error("message is {len} bytes, max {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("value generator unavailable: {0}")]
    Generator(#[from] HashToCurveError),

    #[error("amount encryption failed")]
    Encryption,
}
