//! Confidential inputs, outputs and transactions
//!
//! `TxOut::build` derives the stealth keys of an output and proves its
//! amount; `TxIn::build` packages an owned output for spending; `Tx::build`
//! checks the per-token balance, appends the fee output and signs.

mod error;
mod fee;
mod out_point;
pub mod script;
mod tx;
mod tx_in;
mod tx_out;
mod wire;

pub use error::{
    AmountError, AmountReason, ConstructionError, OutputError, Side, TxError, VerificationFailure,
};
pub use fee::FeePolicy;
pub use out_point::{OutPoint, TxId};
pub use script::Script;
pub use tx::{BALANCE_MESSAGE, BLSCT_MARKER, SpentOutput, TX_VERSION, Tx};
pub use tx_in::{SEQUENCE_FINAL, SEQUENCE_RBF, TxIn};
pub use tx_out::{OutputType, TxOut};
pub use wire::{BlsctData, CTxIn, CTxOut};

/// Version byte leading every `TxIn` / `TxOut` encoding
pub const PAYLOAD_VERSION_V1: u8 = 1;
