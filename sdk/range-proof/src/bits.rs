//! Per-bit OR proofs
//!
//! Each bit commitment `C = b·H + r·G` comes with a Chaum–Pedersen OR proof
//! that either `C` or `C - H` is a multiple of `G`:
//!
//! ```text
//! P0 = C, P1 = C - H
//! A_k = s_k·G - e_k·P_k          (k = 0, 1)
//! e0 + e1 = Hs(context, j, i, C, A0, A1)
//! ```
//!
//! The prover answers honestly on the branch of the real bit and simulates
//! the other one.

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HashWriter, Point, Scalar};
use rand::{CryptoRng, RngCore};

const BIT_CHALLENGE_DOMAIN: &[u8] = b"BLSCT-RANGE-PROOF-BIT-V1";

/// Position of a bit proof inside a range proof.
pub(crate) struct BitTranscript<'a> {
    pub context: &'a [u8; 64],
    pub amount_index: usize,
    pub bit_index: usize,
}

impl BitTranscript<'_> {
    fn challenge(&self, commitment: &Point, a0: &Point, a1: &Point) -> Scalar {
        HashWriter::new(BIT_CHALLENGE_DOMAIN)
            .write(self.context)
            .write_u64(self.amount_index as u64)
            .write_u64(self.bit_index as u64)
            .write_point(commitment)
            .write_point(a0)
            .write_point(a1)
            .finalize_scalar()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitProof {
    commitment: Point,
    e0: Scalar,
    e1: Scalar,
    s0: Scalar,
    s1: Scalar,
}

impl BitProof {
    /// Encoded width in bytes
    pub const SIZE: usize = Point::SIZE + 4 * Scalar::SIZE;

    pub(crate) fn prove<R: RngCore + CryptoRng>(
        rng: &mut R,
        bit: bool,
        blinding: &Scalar,
        h: &Point,
        transcript: &BitTranscript<'_>,
    ) -> Self {
        let mut commitment = Point::mul_base(blinding);
        if bit {
            commitment += *h;
        }

        let k = Scalar::random_from_rng(rng);
        let e_sim = Scalar::random_from_rng(rng);
        let s_sim = Scalar::random_from_rng(rng);

        if bit {
            let a0 = Point::mul_base(&s_sim) - commitment * e_sim;
            let a1 = Point::mul_base(&k);
            let e1 = transcript.challenge(&commitment, &a0, &a1) - e_sim;
            Self {
                commitment,
                e0: e_sim,
                e1,
                s0: s_sim,
                s1: k + e1 * *blinding,
            }
        } else {
            let a0 = Point::mul_base(&k);
            let a1 = Point::mul_base(&s_sim) - (commitment - *h) * e_sim;
            let e0 = transcript.challenge(&commitment, &a0, &a1) - e_sim;
            Self {
                commitment,
                e0,
                e1: e_sim,
                s0: k + e0 * *blinding,
                s1: s_sim,
            }
        }
    }

    pub(crate) fn verify(&self, h: &Point, transcript: &BitTranscript<'_>) -> bool {
        let a0 = Point::mul_base(&self.s0) - self.commitment * self.e0;
        let a1 = Point::mul_base(&self.s1) - (self.commitment - *h) * self.e1;
        self.e0 + self.e1 == transcript.challenge(&self.commitment, &a0, &a1)
    }

    pub fn commitment(&self) -> &Point {
        &self.commitment
    }
}

impl Encode for BitProof {
    fn encode(&self, w: &mut Writer) {
        self.commitment.encode(w);
        self.e0.encode(w);
        self.e1.encode(w);
        self.s0.encode(w);
        self.s1.encode(w);
    }
}

impl Decode for BitProof {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            commitment: Point::decode(r)?,
            e0: Scalar::decode(r)?,
            e1: Scalar::decode(r)?,
            s0: Scalar::decode(r)?,
            s1: Scalar::decode(r)?,
        })
    }
}
