//! One-way key derivation
//!
//! `HKDF_mod_r` in the style of EIP-2333: the parent key and a one-byte
//! domain tag are stretched with HKDF-SHA256 to 48 bytes and reduced modulo
//! the group order. A zero result re-hashes the salt and tries again, so
//! derived keys are never zero.
//!
//! ```text
//! seed ──130──▶ ChildKey ──0──▶ BlindingKey
//!                        ├─1──▶ TokenKey
//!                        └─2──▶ TxKey ──0──▶ ViewKey
//!                                     └─1──▶ SpendingKey
//! ```

use blsct_curve::Scalar;
use hkdf::Hkdf;
use sha2::{Digest, Sha256};

use crate::DerivationError;

pub const CHILD_KEY_TAG: u8 = 130;
pub const BLINDING_KEY_TAG: u8 = 0;
pub const TOKEN_KEY_TAG: u8 = 1;
pub const TX_KEY_TAG: u8 = 2;
pub const VIEW_KEY_TAG: u8 = 0;
pub const SPENDING_KEY_TAG: u8 = 1;

const KEYGEN_SALT: &[u8] = b"BLSCT-KEYGEN-SALT-";
const OKM_LEN: usize = 48;

/// Derive a child scalar from `parent` under `tag`.
pub fn derive(parent: &Scalar, tag: u8) -> Result<Scalar, DerivationError> {
    if parent.is_zero() {
        return Err(DerivationError::ZeroKey);
    }
    Ok(derive_nonzero(parent, tag))
}

/// Derivation for parents already known to be non-zero.
pub(crate) fn derive_nonzero(parent: &Scalar, tag: u8) -> Scalar {
    let mut ikm = Vec::with_capacity(Scalar::SIZE + 2);
    ikm.extend_from_slice(&parent.to_bytes_be());
    ikm.push(tag);
    ikm.push(0);

    let mut salt: [u8; 32] = Sha256::digest(KEYGEN_SALT).into();
    loop {
        let hk = Hkdf::<Sha256>::new(Some(&salt), &ikm);
        let mut okm = [0u8; OKM_LEN];
        hk.expand(&(OKM_LEN as u16).to_be_bytes(), &mut okm)
            .expect("HKDF expand failed");

        // OS2IP is big-endian
        okm.reverse();
        let sk = Scalar::from_bytes_mod_order(&okm);
        if !sk.is_zero() {
            return sk;
        }
        salt = Sha256::digest(salt).into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let parent = Scalar::from_u64(42);
        assert_eq!(
            derive(&parent, CHILD_KEY_TAG).unwrap(),
            derive(&parent, CHILD_KEY_TAG).unwrap()
        );
    }

    #[test]
    fn test_tags_separate_domains() {
        let parent = Scalar::from_u64(42);
        let a = derive(&parent, VIEW_KEY_TAG).unwrap();
        let b = derive(&parent, SPENDING_KEY_TAG).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, parent);
    }

    #[test]
    fn test_distinct_parents() {
        let a = derive(&Scalar::from_u64(1), TX_KEY_TAG).unwrap();
        let b = derive(&Scalar::from_u64(2), TX_KEY_TAG).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_parent_rejected() {
        assert_eq!(
            derive(&Scalar::zero(), CHILD_KEY_TAG),
            Err(DerivationError::ZeroKey)
        );
    }
}
