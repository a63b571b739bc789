//! Stealth output keys
//!
//! ```text
//! Sender (knows destination (C, D), picks blinding scalar r):
//!   R = r·D          blinding public key
//!   E = r·G          ephemeral public key
//!   N = r·C          shared point (range proof nonce)
//!   P = D + Hs(N)·G  one-time spending public key
//!
//! Recipient (knows view key v):
//!   N = v·R = v·r·D = r·C
//!   D' = P - Hs(N)·G, matched against its own sub-addresses via HashId
//! ```

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HashWriter, Point, Scalar};
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{SubAddr, ViewKey};

const STEALTH_DOMAIN: &[u8] = b"BLSCT-STEALTH-V1";
const VIEW_TAG_DOMAIN: &[u8] = b"BLSCT-VIEW-TAG-V1";

/// `Hs(N)`
pub fn shared_secret_scalar(shared: &Point) -> Scalar {
    HashWriter::new(STEALTH_DOMAIN)
        .write_point(shared)
        .finalize_scalar()
}

/// Recipient side of the shared point: `v·R`
pub fn recover_nonce(blinding_pub: &Point, view_key: &ViewKey) -> Point {
    *blinding_pub * *view_key.as_scalar()
}

/// 16-bit scan filter. Roughly one in 65536 foreign outputs passes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewTag(u16);

impl ViewTag {
    pub fn generate(blinding_pub: &Point, view_key: &ViewKey) -> Self {
        Self::from_shared_point(&recover_nonce(blinding_pub, view_key))
    }

    pub fn from_shared_point(shared: &Point) -> Self {
        let digest = HashWriter::new(VIEW_TAG_DOMAIN).write_point(shared).finalize();
        Self(u16::from_le_bytes([digest[0], digest[1]]))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for ViewTag {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

impl Encode for ViewTag {
    fn encode(&self, w: &mut Writer) {
        w.write_u16(self.0);
    }
}

impl Decode for ViewTag {
    const FIXED_SIZE: Option<usize> = Some(2);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        r.read_u16().map(Self)
    }
}

/// RIPEMD160(SHA256(x))
fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

/// 160-bit destination identifier: `Hash160(D)` of the sub-address an
/// output pays to.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashId([u8; 20]);

impl HashId {
    pub const SIZE: usize = 20;

    /// Recover `D' = P - Hs(v·R)·G` from an output and hash it.
    pub fn generate(blinding_pub: &Point, spend_pub: &Point, view_key: &ViewKey) -> Self {
        let shared = recover_nonce(blinding_pub, view_key);
        let spend_part = *spend_pub - Point::mul_base(&shared_secret_scalar(&shared));
        Self(hash160(&spend_part.to_bytes()))
    }

    /// Identifier a wallet indexes its own sub-addresses under.
    pub fn from_sub_addr(sub_addr: &SubAddr) -> Self {
        Self(hash160(&sub_addr.spend_part().to_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl Encode for HashId {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(&self.0);
    }
}

impl Decode for HashId {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        r.read_array().map(Self)
    }
}

impl fmt::Debug for HashId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashId({})", blsct_curve::HexCodec::to_hex(self))
    }
}

blsct_curve::impl_hex_serde!(HashId);

/// Keys published with a confidential output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StealthOutput {
    /// `R`
    pub blinding_key: Point,
    /// `E`
    pub ephemeral_key: Point,
    /// `P`
    pub spending_key: Point,
    pub view_tag: ViewTag,
    /// `N`, never published
    pub nonce: Point,
}

impl StealthOutput {
    pub fn derive(destination: &SubAddr, blinding: &Scalar) -> Self {
        let spend_part = destination.spend_part();
        let nonce = destination.view_part() * *blinding;
        Self {
            blinding_key: spend_part * *blinding,
            ephemeral_key: Point::mul_base(blinding),
            spending_key: spend_part + Point::mul_base(&shared_secret_scalar(&nonce)),
            view_tag: ViewTag::from_shared_point(&nonce),
            nonce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChildKey, PrivSpendingKey, SpendingKey, SubAddrId};
    use blsct_curve::HexCodec;

    fn wallet() -> (ViewKey, SpendingKey) {
        let tx_key = ChildKey::from_seed(&Scalar::from_u64(42)).unwrap().to_tx_key();
        (tx_key.to_view_key(), tx_key.to_spending_key())
    }

    #[test]
    fn test_recipient_recovers_nonce() {
        let (view, spend) = wallet();
        let sub = SubAddr::generate(&view, &spend.to_public_key(), SubAddrId::new(0, 3));
        let out = StealthOutput::derive(&sub, &Scalar::random());

        assert_eq!(recover_nonce(&out.blinding_key, &view), out.nonce);
        assert_eq!(ViewTag::generate(&out.blinding_key, &view), out.view_tag);
    }

    #[test]
    fn test_hash_id_matches_sub_address() {
        let (view, spend) = wallet();
        let id = SubAddrId::new(2, 5);
        let sub = SubAddr::generate(&view, &spend.to_public_key(), id);
        let out = StealthOutput::derive(&sub, &Scalar::random());

        let recovered = HashId::generate(&out.blinding_key, &out.spending_key, &view);
        assert_eq!(recovered, HashId::from_sub_addr(&sub));

        let other = SubAddr::generate(&view, &spend.to_public_key(), SubAddrId::new(2, 6));
        assert_ne!(recovered, HashId::from_sub_addr(&other));
    }

    #[test]
    fn test_hash_id_deterministic() {
        let (view, spend) = wallet();
        let blinding_pub = Point::mul_base(&Scalar::from_u64(7));
        let spend_pub = *spend.to_public_key().as_point();
        let a = HashId::generate(&blinding_pub, &spend_pub, &view);
        let b = HashId::generate(&blinding_pub, &spend_pub, &view);
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 40);
        assert_eq!(HashId::from_hex(&a.to_hex()).unwrap(), a);
        assert!(HashId::from_hex(&"00".repeat(21)).is_err());
    }

    #[test]
    fn test_priv_spending_key_matches_output() {
        let (view, spend) = wallet();
        let sub = SubAddr::generate(&view, &spend.to_public_key(), SubAddrId::new(1, 4));
        let out = StealthOutput::derive(&sub, &Scalar::random());

        let key = PrivSpendingKey::generate(&out.blinding_key, &view, &spend, 1, 4);
        assert_eq!(*key.to_public_key().as_point(), out.spending_key);

        let wrong_index = PrivSpendingKey::generate(&out.blinding_key, &view, &spend, 1, 5);
        assert_ne!(*wrong_index.to_public_key().as_point(), out.spending_key);
    }

    #[test]
    fn test_fresh_blinding_unlinks_outputs() {
        let (view, spend) = wallet();
        let sub = SubAddr::generate(&view, &spend.to_public_key(), SubAddrId::default());
        let a = StealthOutput::derive(&sub, &Scalar::random());
        let b = StealthOutput::derive(&sub, &Scalar::random());
        assert_ne!(a.spending_key, b.spending_key);
        assert_ne!(a.blinding_key, b.blinding_key);
    }
}
