//! G1 group elements
//!
//! ```text
//! encoding : 48-byte compressed affine form (ZCash flag bits)
//! decoding : rejects points off the curve or outside the r-order subgroup
//! validity : decodable and not the identity
//! ```

use ark_bls12_381::{G1Affine, G1Projective, g1};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::hashing::{HashToCurve, HashToCurveError};
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::Zero;
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::UniformRand;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::codec::{Decode, Encode, Reader, Writer};
use crate::{EncodingError, HexCodec, Scalar};

type G1Hasher = MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point(pub(crate) G1Projective);

impl Point {
    /// Encoded width in bytes
    pub const SIZE: usize = 48;

    /// The distinguished generator `G`
    pub fn base() -> Self {
        Self(G1Projective::generator())
    }

    pub fn identity() -> Self {
        Self(G1Projective::zero())
    }

    pub fn random() -> Self {
        Self::random_from_rng(&mut rand::thread_rng())
    }

    pub fn random_from_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self(G1Projective::rand(rng))
    }

    /// `scalar · G`
    pub fn mul_base(scalar: &Scalar) -> Self {
        Self(G1Projective::generator() * scalar.0)
    }

    /// Hash an arbitrary message onto G1 (RFC 9380, SSWU + isogeny).
    ///
    /// Nobody knows the discrete log of the result with respect to `G`.
    pub fn hash_to_curve(dst: &[u8], msg: &[u8]) -> Result<Self, HashToCurveError> {
        let hasher = G1Hasher::new(dst)?;
        Ok(Self(hasher.hash(msg)?.into_group()))
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_valid(&self) -> bool {
        let affine = self.0.into_affine();
        !affine.is_zero() && affine.is_on_curve() && affine.is_in_correct_subgroup_assuming_on_curve()
    }

    pub fn double(&self) -> Self {
        Self(self.0 + self.0)
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        self.0
            .into_affine()
            .serialize_compressed(&mut out[..])
            .expect("compressed G1 points are 48 bytes");
        out
    }

    pub fn from_bytes_compressed(bytes: &[u8; Self::SIZE]) -> Result<Self, EncodingError> {
        G1Affine::deserialize_compressed(&bytes[..])
            .map(|p| Self(p.into_group()))
            .map_err(|_| EncodingError::InvalidPoint)
    }

    pub fn from_projective(p: G1Projective) -> Self {
        Self(p)
    }

    pub fn as_projective(&self) -> &G1Projective {
        &self.0
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.0 += rhs.0;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.0 -= rhs.0;
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0)
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    fn mul(self, rhs: Scalar) -> Point {
        Point(self.0 * rhs.0)
    }
}

impl Mul<&Scalar> for &Point {
    type Output = Point;

    fn mul(self, rhs: &Scalar) -> Point {
        Point(self.0 * rhs.0)
    }
}

impl Sum for Point {
    fn sum<I: Iterator<Item = Point>>(iter: I) -> Point {
        iter.fold(Point::identity(), |acc, p| acc + p)
    }
}

impl Encode for Point {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(&self.to_bytes());
    }
}

impl Decode for Point {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Self::from_bytes_compressed(&r.read_array()?)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", self.to_hex())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

crate::impl_hex_serde!(Point);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let p = Point::random();
        let hex = p.to_hex();
        assert_eq!(hex.len(), 96);
        assert_eq!(Point::from_hex(&hex).unwrap(), p);
    }

    #[test]
    fn test_base_point_validity() {
        assert!(Point::base().is_valid());
        assert!(!Point::identity().is_valid());
        assert!(Point::random().is_valid());
    }

    #[test]
    fn test_identity_roundtrip() {
        let id = Point::identity();
        let decoded = Point::from_hex(&id.to_hex()).unwrap();
        assert!(decoded.is_identity());
    }

    #[test]
    fn test_rejects_garbage() {
        // Compression flag set but x is not on the curve
        let mut bytes = [0x11u8; Point::SIZE];
        bytes[0] = 0x9f;
        assert_eq!(
            Point::from_bytes(&bytes).unwrap_err(),
            EncodingError::InvalidPoint
        );
        assert_eq!(
            Point::from_hex("abcd").unwrap_err(),
            EncodingError::InvalidLength { expected: 48, got: 2 }
        );
    }

    #[test]
    fn test_group_law() {
        let a = Scalar::from_u64(3);
        let b = Scalar::from_u64(4);
        let g = Point::base();
        assert_eq!(g * a + g * b, g * (a + b));
        assert_eq!(Point::mul_base(&a), g * a);
        assert_eq!(g.double(), g * Scalar::from_u64(2));
        assert_eq!(g - g, Point::identity());
    }

    #[test]
    fn test_hash_to_curve_deterministic() {
        let p = Point::hash_to_curve(b"BLSCT-TEST", b"msg").unwrap();
        let q = Point::hash_to_curve(b"BLSCT-TEST", b"msg").unwrap();
        let r = Point::hash_to_curve(b"BLSCT-TEST", b"other").unwrap();
        assert_eq!(p, q);
        assert_ne!(p, r);
        assert!(p.is_valid());
    }
}
