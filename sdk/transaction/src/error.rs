use blsct_curve::{EncodingError, HashToCurveError};
use blsct_range_proof::RangeProofError;
use blsct_signature::SignatureError;
use std::fmt;
use thiserror::Error;

/// Which list of a transaction an index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Inputs,
    Outputs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Inputs => f.write_str("inputs"),
            Side::Outputs => f.write_str("outputs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountReason {
    /// Above `MAX_AMOUNT`
    OutOfRange,
    /// The per-token totals do not balance
    Unbalanced,
    /// The declared amount does not open the output's commitment
    CommitmentMismatch,
}

impl fmt::Display for AmountReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountReason::OutOfRange => f.write_str("amount out of range"),
            AmountReason::Unbalanced => f.write_str("amounts do not balance"),
            AmountReason::CommitmentMismatch => f.write_str("amount does not match its commitment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{side}[{index}] has an invalid amount: {reason}")]
pub struct AmountError {
    pub side: Side,
    pub index: usize,
    pub reason: AmountReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("transaction needs at least one input")]
    NoInputs,

    #[error("transaction needs at least one output")]
    NoOutputs,

    #[error("fee overflows for {components} components")]
    FeeOverflow { components: usize },
}

/// Reasons a single output cannot be built
#[derive(Debug, Error)]
pub enum OutputError {
    #[error(transparent)]
    RangeProof(#[from] RangeProofError),

    #[error("staked commitment of {amount} is below the minimum stake {min_stake}")]
    StakeBelowMinimum { amount: u64, min_stake: u64 },
}

#[derive(Debug, Error)]
pub enum TxError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("value generator unavailable: {0}")]
    Generator(#[from] HashToCurveError),

    #[error("signing failed: {0}")]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Why `Tx::verify` rejected a transaction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    #[error("expected {expected} spent outputs, got {got}")]
    SpentOutputCount { expected: usize, got: usize },

    #[error("range proof of output {index} is invalid")]
    RangeProof { index: usize },

    #[error("no value generator for the token of output {index}")]
    Generator { index: usize },

    #[error("aggregate signature does not cover the inputs and balance")]
    Signature,
}
