use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("key derivation from a zero scalar")]
    ZeroKey,
}
