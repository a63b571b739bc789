//! BLSCT keys
//!
//! Deterministic key hierarchy, dual-key (view/spend) addresses,
//! sub-addresses, and the per-output stealth keys built on them.
//!
//! ```text
//! seed -> ChildKey -> TxKey -> (ViewKey v, SpendingKey s)
//!                               │
//!                               ▼
//!        DoublePublicKey (v·G, s·G) ── (account, address) ──▶ SubAddr (C, D)
//!                                                               │
//!                                          blinding r ──────────▼
//!                                          StealthOutput (R, E, P, view tag)
//! ```

pub mod derivation;
mod error;
mod keys;
mod public_key;
pub mod stealth;
mod sub_addr;

pub use derivation::derive;
pub use error::DerivationError;
pub use keys::{
    BlindingKey, ChildKey, PrivSpendingKey, SpendingKey, TokenKey, TxKey, ViewKey,
};
pub use public_key::{DoublePublicKey, PublicKey};
pub use stealth::{HashId, StealthOutput, ViewTag};
pub use sub_addr::{SubAddr, SubAddrId};
