//! Scalar field elements
//!
//! Scalars are elements of the BLS12-381 scalar field `Fr`. The canonical
//! encoding is 32 bytes big-endian; decoding rejects values outside
//! `[0, r)`.

use ark_bls12_381::Fr;
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use ark_serialize::CanonicalDeserialize;
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::codec::{Decode, Encode, Reader, Writer};
use crate::{EncodingError, HexCodec};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scalar(pub(crate) Fr);

impl Scalar {
    /// Encoded width in bytes
    pub const SIZE: usize = 32;

    pub fn zero() -> Self {
        Self(Fr::zero())
    }

    pub fn one() -> Self {
        Self(Fr::one())
    }

    pub fn from_u64(v: u64) -> Self {
        Self(Fr::from(v))
    }

    /// Uniformly random scalar from the thread-local CSPRNG
    pub fn random() -> Self {
        Self::random_from_rng(&mut rand::thread_rng())
    }

    pub fn random_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }

    /// Reduce an arbitrary little-endian byte string modulo the group order.
    ///
    /// Used with 48 or 64 byte inputs so the result is statistically uniform.
    pub fn from_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_le_bytes_mod_order(bytes))
    }

    pub fn from_bytes_be(bytes: &[u8; Self::SIZE]) -> Result<Self, EncodingError> {
        let mut le = *bytes;
        le.reverse();
        Fr::deserialize_compressed(&le[..])
            .map(Self)
            .map_err(|_| EncodingError::InvalidScalar)
    }

    pub fn to_bytes_be(&self) -> [u8; Self::SIZE] {
        let be = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; Self::SIZE];
        out[Self::SIZE - be.len()..].copy_from_slice(&be);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn invert(&self) -> Option<Self> {
        self.0.inverse().map(Self)
    }

    pub fn from_fr(fr: Fr) -> Self {
        Self(fr)
    }

    pub fn as_fr(&self) -> &Fr {
        &self.0
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 + rhs.0)
    }
}

impl AddAssign for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        self.0 += rhs.0;
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 - rhs.0)
    }
}

impl SubAssign for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        self.0 -= rhs.0;
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(-self.0)
    }
}

impl Sum for Scalar {
    fn sum<I: Iterator<Item = Scalar>>(iter: I) -> Scalar {
        iter.fold(Scalar::zero(), |acc, s| acc + s)
    }
}

impl Encode for Scalar {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(&self.to_bytes_be());
    }
}

impl Decode for Scalar {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Self::from_bytes_be(&r.read_array()?)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({})", self.to_hex())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

crate::impl_hex_serde!(Scalar);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let s = Scalar::random();
        let hex = s.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(Scalar::from_hex(&hex).unwrap(), s);
    }

    #[test]
    fn test_integer_encoding_is_big_endian() {
        let s = Scalar::from_u64(0x0102);
        let bytes = s.to_bytes_be();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_rejects_non_canonical() {
        // 0xff..ff is above the group order
        let err = Scalar::from_hex(&"ff".repeat(32)).unwrap_err();
        assert_eq!(err, EncodingError::InvalidScalar);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(
            Scalar::from_hex("00ff").unwrap_err(),
            EncodingError::InvalidLength { expected: 32, got: 2 }
        );
        assert!(matches!(
            Scalar::from_hex("0").unwrap_err(),
            EncodingError::Hex(_)
        ));
    }

    #[test]
    fn test_arithmetic() {
        let a = Scalar::from_u64(7);
        let b = Scalar::from_u64(5);
        assert_eq!(a + b, Scalar::from_u64(12));
        assert_eq!(a - b, Scalar::from_u64(2));
        assert_eq!(a * b, Scalar::from_u64(35));
        assert_eq!(a + (-a), Scalar::zero());
        assert_eq!(a * a.invert().unwrap(), Scalar::one());
        assert!(Scalar::zero().invert().is_none());
        assert_eq!([a, b].into_iter().sum::<Scalar>(), Scalar::from_u64(12));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let s = Scalar::from_u64(1);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, format!("\"{}01\"", "00".repeat(31)));
        let back: Scalar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
