//! Sub-addresses
//!
//! One published key pair yields an unbounded family of unlinkable
//! destinations, indexed by `(account, address)`:
//!
//! ```text
//! m = Hs("SubAddress", v, account, address)
//! D = S + m·G          spend part
//! C = v·D              view part
//! ```
//!
//! Only the holder of the view key `v` can compute `m`, so nobody else can
//! tell that two sub-addresses belong to the same wallet.

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HashWriter, Point, Scalar};
use serde::{Deserialize, Serialize};

use crate::{DoublePublicKey, PublicKey, ViewKey};

const SUB_ADDRESS_DOMAIN: &[u8] = b"SubAddress";

/// `(account, address)` index of a sub-address
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubAddrId {
    pub account: u64,
    pub address: u64,
}

impl SubAddrId {
    pub const fn new(account: u64, address: u64) -> Self {
        Self { account, address }
    }
}

impl Encode for SubAddrId {
    fn encode(&self, w: &mut Writer) {
        w.write_u64(self.account);
        w.write_u64(self.address);
    }
}

impl Decode for SubAddrId {
    const FIXED_SIZE: Option<usize> = Some(16);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            account: r.read_u64()?,
            address: r.read_u64()?,
        })
    }
}

/// `m` in the module docs
pub(crate) fn sub_address_scalar(view_key: &ViewKey, id: &SubAddrId) -> Scalar {
    HashWriter::new(SUB_ADDRESS_DOMAIN)
        .write_scalar(view_key.as_scalar())
        .write_u64(id.account)
        .write_u64(id.address)
        .finalize_scalar()
}

/// One-time destination `(C, D)`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubAddr(DoublePublicKey);

impl SubAddr {
    pub fn generate(view_key: &ViewKey, spend_pub: &PublicKey, id: SubAddrId) -> Self {
        let m = sub_address_scalar(view_key, &id);
        let spend = *spend_pub.as_point() + Point::mul_base(&m);
        let view = spend * *view_key.as_scalar();
        Self(DoublePublicKey::from_points(view, spend))
    }

    /// Reinterpret a published address as a destination.
    pub fn from_double_public_key(dpk: &DoublePublicKey) -> Self {
        Self(*dpk)
    }

    pub fn to_double_public_key(&self) -> DoublePublicKey {
        self.0
    }

    /// `C`
    pub fn view_part(&self) -> Point {
        *self.0.view_key().as_point()
    }

    /// `D`
    pub fn spend_part(&self) -> Point {
        *self.0.spend_key().as_point()
    }
}

impl From<SubAddr> for DoublePublicKey {
    fn from(sub: SubAddr) -> Self {
        sub.0
    }
}

impl From<DoublePublicKey> for SubAddr {
    fn from(dpk: DoublePublicKey) -> Self {
        Self(dpk)
    }
}

impl Encode for SubAddr {
    fn encode(&self, w: &mut Writer) {
        self.0.encode(w);
    }
}

impl Decode for SubAddr {
    const FIXED_SIZE: Option<usize> = Some(DoublePublicKey::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        DoublePublicKey::decode(r).map(Self)
    }
}

blsct_curve::impl_hex_serde!(SubAddr);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChildKey;
    use blsct_curve::HexCodec;

    fn wallet() -> (ViewKey, PublicKey) {
        let tx_key = ChildKey::from_seed(&Scalar::from_u64(42)).unwrap().to_tx_key();
        (tx_key.to_view_key(), tx_key.to_spending_key().to_public_key())
    }

    #[test]
    fn test_double_public_key_path_matches() {
        let (view, spend_pub) = wallet();
        for (account, address) in [(0, 0), (0, 1), (1, 0), (u64::MAX, 7)] {
            let sub = SubAddr::generate(&view, &spend_pub, SubAddrId::new(account, address));
            let dpk = DoublePublicKey::from_keys_account_address(&view, &spend_pub, account, address);
            assert_eq!(sub.to_double_public_key(), dpk);
            assert_eq!(SubAddr::from_double_public_key(&dpk), sub);
        }
    }

    #[test]
    fn test_view_part_is_view_key_times_spend_part() {
        let (view, spend_pub) = wallet();
        let sub = SubAddr::generate(&view, &spend_pub, SubAddrId::new(3, 9));
        assert_eq!(sub.view_part(), sub.spend_part() * *view.as_scalar());
    }

    #[test]
    fn test_indices_are_unlinkable() {
        let (view, spend_pub) = wallet();
        let a = SubAddr::generate(&view, &spend_pub, SubAddrId::new(0, 0));
        let b = SubAddr::generate(&view, &spend_pub, SubAddrId::new(0, 1));
        let c = SubAddr::generate(&view, &spend_pub, SubAddrId::new(1, 0));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_ne!(a.spend_part(), *spend_pub.as_point());
    }

    #[test]
    fn test_hex_roundtrip() {
        let (view, spend_pub) = wallet();
        let sub = SubAddr::generate(&view, &spend_pub, SubAddrId::default());
        assert_eq!(SubAddr::from_hex(&sub.to_hex()).unwrap(), sub);

        let id = SubAddrId::new(5, 6);
        assert_eq!(SubAddrId::from_hex(&id.to_hex()).unwrap(), id);
    }
}
