use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, Point, Scalar};
use blsct_signature::Signature;
use std::fmt;

use crate::{SubAddr, SubAddrId, ViewKey};

fn decode_non_identity(r: &mut Reader<'_>) -> Result<Point, EncodingError> {
    let p = Point::decode(r)?;
    if p.is_identity() {
        return Err(EncodingError::InvalidPoint);
    }
    Ok(p)
}

/// `x · G` for some private scalar `x`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(Point);

impl PublicKey {
    pub fn from_scalar(secret: &Scalar) -> Self {
        Self(Point::mul_base(secret))
    }

    pub fn from_point(point: Point) -> Self {
        Self(point)
    }

    pub fn random() -> Self {
        Self(Point::random())
    }

    pub fn as_point(&self) -> &Point {
        &self.0
    }

    pub fn verify(&self, msg: &[u8], signature: &Signature) -> bool {
        signature.verify(&self.0, msg)
    }
}

impl From<PublicKey> for Point {
    fn from(pk: PublicKey) -> Point {
        pk.0
    }
}

impl Encode for PublicKey {
    fn encode(&self, w: &mut Writer) {
        self.0.encode(w);
    }
}

impl Decode for PublicKey {
    const FIXED_SIZE: Option<usize> = Some(Point::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        decode_non_identity(r).map(Self)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.0)
    }
}

blsct_curve::impl_hex_serde!(PublicKey);

/// Published address root: `(view public key, spend public key)`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DoublePublicKey {
    view: Point,
    spend: Point,
}

impl DoublePublicKey {
    /// Encoded width in bytes
    pub const SIZE: usize = 2 * Point::SIZE;

    pub fn from_view_and_spend(view: &PublicKey, spend: &PublicKey) -> Self {
        Self {
            view: view.0,
            spend: spend.0,
        }
    }

    /// Address of sub-address `(account, address)`; identical to
    /// [`SubAddr::generate`] for the same inputs.
    pub fn from_keys_account_address(
        view_key: &ViewKey,
        spend_pub: &PublicKey,
        account: u64,
        address: u64,
    ) -> Self {
        SubAddr::generate(view_key, spend_pub, SubAddrId::new(account, address)).into()
    }

    pub fn random() -> Self {
        Self {
            view: Point::random(),
            spend: Point::random(),
        }
    }

    pub fn view_key(&self) -> PublicKey {
        PublicKey(self.view)
    }

    pub fn spend_key(&self) -> PublicKey {
        PublicKey(self.spend)
    }

    pub(crate) fn from_points(view: Point, spend: Point) -> Self {
        Self { view, spend }
    }
}

impl Encode for DoublePublicKey {
    fn encode(&self, w: &mut Writer) {
        self.view.encode(w);
        self.spend.encode(w);
    }
}

impl Decode for DoublePublicKey {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            view: decode_non_identity(r)?,
            spend: decode_non_identity(r)?,
        })
    }
}

blsct_curve::impl_hex_serde!(DoublePublicKey);
