//! BLS Signatures
//!
//! Public keys live in G1 (48 bytes), signatures in G2 (96 bytes). Messages
//! are augmented with the signer's public key before hashing, which makes
//! aggregation of signatures over the same message safe against rogue keys.
//!
//! ```text
//! sign(sk, m)   = sk · H2(pk || m)
//! verify        : e(G, sig) == e(pk, H2(pk || m))
//! aggregate     : sig = Σ sig_i
//! verify_agg    : e(G, sig) == Π e(pk_i, H2(pk_i || m_i))
//! ```

use ark_bls12_381::{Bls12_381, G1Projective, G2Affine, G2Projective, g2};
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::hashing::{HashToCurve, HashToCurveError};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::Zero;
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HexCodec, Point, Scalar};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

/// Ciphersuite tag for the message-augmentation scheme
pub const SIGNATURE_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_AUG_";

type G2Hasher = MapToCurveBasedHasher<G2Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g2::Config>>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("hash to G2 failed: {0}")]
    HashToCurve(#[from] HashToCurveError),
}

fn hash_message(public_key: &Point, msg: &[u8]) -> Result<G2Projective, SignatureError> {
    let hasher = G2Hasher::new(SIGNATURE_DST)?;
    let mut augmented = Vec::with_capacity(Point::SIZE + msg.len());
    augmented.extend_from_slice(&public_key.to_bytes());
    augmented.extend_from_slice(msg);
    Ok(hasher.hash(&augmented)?.into_group())
}

/// A (possibly aggregated) BLS signature
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(G2Projective);

impl Signature {
    /// Encoded width in bytes
    pub const SIZE: usize = 96;

    /// The empty aggregate
    pub fn identity() -> Self {
        Self(G2Projective::zero())
    }

    pub fn sign(secret: &Scalar, msg: &[u8]) -> Result<Self, SignatureError> {
        let public_key = Point::mul_base(secret);
        let h = hash_message(&public_key, msg)?;
        Ok(Self(h * secret.as_fr()))
    }

    pub fn verify(&self, public_key: &Point, msg: &[u8]) -> bool {
        self.verify_aggregate(&[(*public_key, msg)])
    }

    pub fn aggregate(signatures: &[Signature]) -> Self {
        Self(signatures.iter().map(|s| s.0).sum())
    }

    /// Verify an aggregate against every `(public key, message)` it covers.
    ///
    /// An empty list never verifies.
    pub fn verify_aggregate(&self, signed: &[(Point, &[u8])]) -> bool {
        if signed.is_empty() {
            return false;
        }

        let mut g1 = Vec::with_capacity(signed.len());
        let mut g2 = Vec::with_capacity(signed.len());
        for (public_key, msg) in signed {
            match hash_message(public_key, msg) {
                Ok(h) => {
                    g1.push(*public_key.as_projective());
                    g2.push(h);
                }
                Err(_) => return false,
            }
        }

        let lhs = Bls12_381::pairing(G1Projective::generator(), self.0);
        let rhs = Bls12_381::multi_pairing(g1, g2);
        lhs == rhs
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        self.0
            .into_affine()
            .serialize_compressed(&mut out[..])
            .expect("compressed G2 points are 96 bytes");
        out
    }
}

impl Encode for Signature {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(&self.to_bytes());
    }
}

impl Decode for Signature {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        let bytes: [u8; Self::SIZE] = r.read_array()?;
        G2Affine::deserialize_compressed(&bytes[..])
            .map(|p| Self(p.into_group()))
            .map_err(|_| EncodingError::InvalidPoint)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

blsct_curve::impl_hex_serde!(Signature);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let sk = Scalar::random();
        let pk = Point::mul_base(&sk);
        let sig = Signature::sign(&sk, b"navio").unwrap();

        assert!(sig.verify(&pk, b"navio"));
        assert!(!sig.verify(&pk, b"other"));
        assert!(!sig.verify(&Point::random(), b"navio"));
    }

    #[test]
    fn test_aggregate() {
        let sk1 = Scalar::random();
        let sk2 = Scalar::random();
        let s1 = Signature::sign(&sk1, b"one").unwrap();
        let s2 = Signature::sign(&sk2, b"two").unwrap();
        let agg = Signature::aggregate(&[s1, s2]);

        let pk1 = Point::mul_base(&sk1);
        let pk2 = Point::mul_base(&sk2);
        assert!(agg.verify_aggregate(&[(pk1, b"one".as_slice()), (pk2, b"two".as_slice())]));
        assert!(!agg.verify_aggregate(&[(pk1, b"one".as_slice()), (pk2, b"one".as_slice())]));
        assert!(!agg.verify_aggregate(&[(pk1, b"one".as_slice())]));
        assert!(!agg.verify_aggregate(&[]));
    }

    #[test]
    fn test_hex_roundtrip() {
        let sig = Signature::sign(&Scalar::random(), b"roundtrip").unwrap();
        let hex = sig.to_hex();
        assert_eq!(hex.len(), 192);
        assert_eq!(Signature::from_hex(&hex).unwrap(), sig);
    }

    #[test]
    fn test_rejects_short_input() {
        assert_eq!(
            Signature::from_hex("00").unwrap_err(),
            EncodingError::InvalidLength { expected: 96, got: 1 }
        );
    }
}
