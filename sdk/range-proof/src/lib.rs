//! Range Proof Engine
//!
//! Proves that one or more Pedersen-committed amounts lie in `[0, 2^64)`
//! and lets the holder of the proof's nonce recover them.
//!
//! ```text
//! gamma_j = Hs("gamma", N, j)
//! V_j     = a_j·H_token + gamma_j·G
//!
//! a_j = Σ b_i 2^i,   C_i = b_i·H_token + r_i·G,   Σ r_i 2^i = gamma_j
//!   => Σ 2^i C_i = V_j, and every C_i carries an OR proof of b_i ∈ {0, 1}
//! ```
//!
//! All Fiat–Shamir challenges are bound to a context hash over the token id,
//! every value commitment and the encrypted recovery payload, so none of
//! them can be swapped between proofs.

mod bits;
mod error;
mod payload;

pub use bits::BitProof;
pub use error::RangeProofError;

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HashWriter, Point, Scalar};
use blsct_token::TokenId;
use rand::{CryptoRng, RngCore};

use bits::BitTranscript;

/// Largest amount a confidential output may carry
pub const MAX_AMOUNT: u64 = i64::MAX as u64;
/// Amounts covered by a single proof
pub const MAX_AMOUNTS: usize = 16;
/// Message bytes embedded in a proof
pub const MAX_MESSAGE_SIZE: usize = 54;
/// Bits per amount
pub const AMOUNT_BITS: usize = 64;

const CONTEXT_DOMAIN: &[u8] = b"BLSCT-RANGE-PROOF-V1";
const GAMMA_DOMAIN: &[u8] = b"BLSCT-RANGE-PROOF-GAMMA-V1";

/// Blinding factor of the `index`-th commitment of a proof built with
/// `nonce`.
pub fn gamma_from_nonce(nonce: &Point, index: usize) -> Scalar {
    HashWriter::new(GAMMA_DOMAIN)
        .write_point(nonce)
        .write_u64(index as u64)
        .finalize_scalar()
}

fn powers_of_two() -> [Scalar; AMOUNT_BITS] {
    std::array::from_fn(|i| Scalar::from_u64(1u64 << i))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeProof {
    token_id: TokenId,
    commitments: Vec<Point>,
    bit_proofs: Vec<BitProof>,
    ciphertext: Vec<u8>,
}

impl RangeProof {
    pub fn build(
        amounts: &[u64],
        nonce: &Point,
        message: &str,
        token_id: &TokenId,
    ) -> Result<Self, RangeProofError> {
        Self::build_with_rng(&mut rand::thread_rng(), amounts, nonce, message, token_id)
    }

    pub fn build_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        amounts: &[u64],
        nonce: &Point,
        message: &str,
        token_id: &TokenId,
    ) -> Result<Self, RangeProofError> {
        if amounts.is_empty() {
            return Err(RangeProofError::EmptyAmounts);
        }
        if amounts.len() > MAX_AMOUNTS {
            return Err(RangeProofError::TooManyAmounts {
                got: amounts.len(),
                max: MAX_AMOUNTS,
            });
        }
        if let Some((index, &amount)) = amounts.iter().enumerate().find(|(_, a)| **a > MAX_AMOUNT) {
            return Err(RangeProofError::AmountOutOfRange {
                index,
                amount,
                max: MAX_AMOUNT,
            });
        }
        if message.len() > MAX_MESSAGE_SIZE {
            return Err(RangeProofError::MessageTooLong {
                len: message.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }

        let h = token_id.value_generator()?;
        let gammas: Vec<Scalar> = (0..amounts.len()).map(|j| gamma_from_nonce(nonce, j)).collect();
        let commitments: Vec<Point> = amounts
            .iter()
            .zip(&gammas)
            .map(|(a, gamma)| h * Scalar::from_u64(*a) + Point::mul_base(gamma))
            .collect();

        let aad = associated_data(token_id, &commitments);
        let ciphertext = payload::seal(nonce, &aad, amounts, message.as_bytes())?;
        let context = context_hash(token_id, &commitments, &ciphertext);

        let pow2 = powers_of_two();
        let mut bit_proofs = Vec::with_capacity(amounts.len() * AMOUNT_BITS);
        for (j, (amount, gamma)) in amounts.iter().zip(&gammas).enumerate() {
            // r_1..r_63 random, r_0 fixes Σ r_i 2^i = gamma
            let mut blindings = [Scalar::zero(); AMOUNT_BITS];
            let mut acc = Scalar::zero();
            for i in 1..AMOUNT_BITS {
                blindings[i] = Scalar::random_from_rng(rng);
                acc += blindings[i] * pow2[i];
            }
            blindings[0] = *gamma - acc;

            for (i, blinding) in blindings.iter().enumerate() {
                let transcript = BitTranscript {
                    context: &context,
                    amount_index: j,
                    bit_index: i,
                };
                let bit = (amount >> i) & 1 == 1;
                bit_proofs.push(BitProof::prove(rng, bit, blinding, &h, &transcript));
            }
        }

        log::trace!(
            "built range proof over {} amount(s) for {:?}",
            amounts.len(),
            token_id
        );

        Ok(Self {
            token_id: *token_id,
            commitments,
            bit_proofs,
            ciphertext,
        })
    }

    /// Check a single proof against its own commitments and token id.
    pub fn verify(&self) -> bool {
        let count = self.commitments.len();
        if count == 0 || count > MAX_AMOUNTS || self.bit_proofs.len() != count * AMOUNT_BITS {
            log::debug!("range proof has inconsistent shape");
            return false;
        }
        let min = payload::plaintext_len(count, 0) + payload::TAG_SIZE;
        if self.ciphertext.len() < min || self.ciphertext.len() > min + MAX_MESSAGE_SIZE {
            log::debug!("range proof payload has invalid length {}", self.ciphertext.len());
            return false;
        }

        let h = match self.token_id.value_generator() {
            Ok(h) => h,
            Err(e) => {
                log::warn!("no value generator for {:?}: {e}", self.token_id);
                return false;
            }
        };
        let context = context_hash(&self.token_id, &self.commitments, &self.ciphertext);

        for (j, (commitment, proofs)) in self
            .commitments
            .iter()
            .zip(self.bit_proofs.chunks_exact(AMOUNT_BITS))
            .enumerate()
        {
            // Horner: Σ 2^i C_i
            let recombined = proofs
                .iter()
                .rev()
                .fold(Point::identity(), |acc, p| acc.double() + *p.commitment());
            if recombined != *commitment {
                log::debug!("bit commitments of amount {j} do not sum to its commitment");
                return false;
            }

            for (i, proof) in proofs.iter().enumerate() {
                let transcript = BitTranscript {
                    context: &context,
                    amount_index: j,
                    bit_index: i,
                };
                if !proof.verify(&h, &transcript) {
                    log::debug!("bit proof {i} of amount {j} failed");
                    return false;
                }
            }
        }
        true
    }

    /// All-or-nothing batch verification.
    pub fn verify_proofs(proofs: &[RangeProof]) -> bool {
        proofs.iter().enumerate().all(|(i, proof)| {
            let ok = proof.verify();
            if !ok {
                log::warn!("range proof {i} failed verification");
            }
            ok
        })
    }

    /// Recover every request independently; results are in request order.
    pub fn recover_amounts(requests: &[AmountRecoveryRequest]) -> Vec<AmountRecoveryResult> {
        requests.iter().map(AmountRecoveryRequest::recover).collect()
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    /// Value commitments `V_j`
    pub fn commitments(&self) -> &[Point] {
        &self.commitments
    }

    pub fn bit_proofs(&self) -> &[BitProof] {
        &self.bit_proofs
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

fn associated_data(token_id: &TokenId, commitments: &[Point]) -> Vec<u8> {
    let mut w = Writer::with_capacity(TokenId::SIZE + commitments.len() * Point::SIZE);
    token_id.encode(&mut w);
    for c in commitments {
        c.encode(&mut w);
    }
    w.into_inner()
}

fn context_hash(token_id: &TokenId, commitments: &[Point], ciphertext: &[u8]) -> [u8; 64] {
    let mut hasher = HashWriter::new(CONTEXT_DOMAIN)
        .write(&token_id.to_bytes())
        .write_u64(commitments.len() as u64);
    for c in commitments {
        hasher = hasher.write_point(c);
    }
    hasher.write(ciphertext).finalize()
}

impl Encode for RangeProof {
    fn encode(&self, w: &mut Writer) {
        self.token_id.encode(w);
        w.write_vec(&self.commitments);
        // count is implied by the number of commitments
        for proof in &self.bit_proofs {
            proof.encode(w);
        }
        w.write_var_bytes(&self.ciphertext);
    }
}

impl Decode for RangeProof {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        let token_id = TokenId::decode(r)?;
        let count = r.read_length(MAX_AMOUNTS as u64)?;
        if count == 0 {
            return Err(EncodingError::InvalidValue("range proof without commitments"));
        }
        let mut commitments = Vec::with_capacity(count);
        for _ in 0..count {
            commitments.push(Point::decode(r)?);
        }
        let mut bit_proofs = Vec::with_capacity(count * AMOUNT_BITS);
        for _ in 0..count * AMOUNT_BITS {
            bit_proofs.push(BitProof::decode(r)?);
        }
        let ciphertext = r.read_var_bytes()?;
        Ok(Self {
            token_id,
            commitments,
            bit_proofs,
            ciphertext,
        })
    }
}

blsct_curve::impl_hex_serde!(RangeProof);

/// A proof paired with the nonce it is believed to be built with
#[derive(Clone, Debug)]
pub struct AmountRecoveryRequest {
    pub range_proof: RangeProof,
    pub nonce: Point,
}

impl AmountRecoveryRequest {
    pub fn new(range_proof: RangeProof, nonce: Point) -> Self {
        Self { range_proof, nonce }
    }

    /// Open the proof's payload with this request's nonce.
    pub fn recover(&self) -> AmountRecoveryResult {
        let proof = &self.range_proof;
        let count = proof.commitments.len();
        let aad = associated_data(&proof.token_id, &proof.commitments);

        let Some((amounts, message)) = payload::open(&self.nonce, &aad, &proof.ciphertext, count) else {
            return AmountRecoveryResult::failure();
        };
        let Ok(h) = proof.token_id.value_generator() else {
            return AmountRecoveryResult::failure();
        };

        // The payload must open the commitments it was sealed with
        for (j, (amount, commitment)) in amounts.iter().zip(&proof.commitments).enumerate() {
            let gamma = gamma_from_nonce(&self.nonce, j);
            if h * Scalar::from_u64(*amount) + Point::mul_base(&gamma) != *commitment {
                log::debug!("recovered amount {j} does not open its commitment");
                return AmountRecoveryResult::failure();
            }
        }

        AmountRecoveryResult {
            success: true,
            amount: amounts[0],
            gamma: gamma_from_nonce(&self.nonce, 0),
            message,
        }
    }
}

/// Outcome of recovering one proof; the amount and gamma belong to its
/// first commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmountRecoveryResult {
    pub success: bool,
    pub amount: u64,
    pub gamma: Scalar,
    pub message: String,
}

impl AmountRecoveryResult {
    fn failure() -> Self {
        Self {
            success: false,
            amount: 0,
            gamma: Scalar::zero(),
            message: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blsct_curve::HexCodec;

    #[test]
    fn test_build_and_verify() {
        let nonce = Point::random();
        let proof = RangeProof::build(&[1000], &nonce, "hello", &TokenId::native()).unwrap();
        assert!(proof.verify());
        assert_eq!(proof.commitments().len(), 1);
        assert_eq!(proof.bit_proofs().len(), AMOUNT_BITS);
    }

    #[test]
    fn test_edge_amounts() {
        let nonce = Point::random();
        let proof = RangeProof::build(&[0, MAX_AMOUNT], &nonce, "", &TokenId::from_token(3)).unwrap();
        assert!(RangeProof::verify_proofs(&[proof]));
    }

    #[test]
    fn test_construction_errors() {
        let nonce = Point::random();
        let native = TokenId::native();
        assert!(matches!(
            RangeProof::build(&[], &nonce, "", &native),
            Err(RangeProofError::EmptyAmounts)
        ));
        assert!(matches!(
            RangeProof::build(&[1; MAX_AMOUNTS + 1], &nonce, "", &native),
            Err(RangeProofError::TooManyAmounts { got: 17, max: 16 })
        ));
        assert!(matches!(
            RangeProof::build(&[1, MAX_AMOUNT + 1], &nonce, "", &native),
            Err(RangeProofError::AmountOutOfRange { index: 1, .. })
        ));
        let long = "x".repeat(MAX_MESSAGE_SIZE + 1);
        assert!(matches!(
            RangeProof::build(&[1], &nonce, &long, &native),
            Err(RangeProofError::MessageTooLong { len: 55, max: 54 })
        ));
    }

    #[test]
    fn test_wrong_token_fails() {
        let nonce = Point::random();
        let proof = RangeProof::build(&[42], &nonce, "", &TokenId::from_token(1)).unwrap();
        let mut forged = proof.clone();
        forged.token_id = TokenId::from_token(2);
        assert!(!forged.verify());
        assert!(!RangeProof::verify_proofs(&[proof, forged]));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let nonce = Point::random();
        let mut proof = RangeProof::build(&[42], &nonce, "memo", &TokenId::native()).unwrap();
        proof.ciphertext[0] ^= 1;
        assert!(!proof.verify());
    }

    #[test]
    fn test_swapped_commitment_fails() {
        let native = TokenId::native();
        let a = RangeProof::build(&[5], &Point::random(), "", &native).unwrap();
        let b = RangeProof::build(&[5], &Point::random(), "", &native).unwrap();
        let mut mixed = a.clone();
        mixed.commitments = b.commitments.clone();
        assert!(!mixed.verify());
    }

    #[test]
    fn test_recover() {
        let nonce = Point::random();
        let proof = RangeProof::build(&[777], &nonce, "navio", &TokenId::native()).unwrap();
        let results = RangeProof::recover_amounts(&[AmountRecoveryRequest::new(proof.clone(), nonce)]);
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].amount, 777);
        assert_eq!(results[0].message, "navio");
        assert_eq!(results[0].gamma, gamma_from_nonce(&nonce, 0));

        let wrong = RangeProof::recover_amounts(&[AmountRecoveryRequest::new(proof, Point::random())]);
        assert!(!wrong[0].success);
        assert_eq!(wrong[0].amount, 0);
        assert!(wrong[0].message.is_empty());
    }

    #[test]
    fn test_hex_roundtrip() {
        let proof = RangeProof::build(&[9], &Point::random(), "m", &TokenId::native()).unwrap();
        let decoded = RangeProof::from_hex(&proof.to_hex()).unwrap();
        assert_eq!(decoded, proof);
        assert!(decoded.verify());
    }

    #[test]
    fn test_decode_rejects_empty_proof() {
        let mut w = Writer::new();
        TokenId::native().encode(&mut w);
        w.write_compact_size(0);
        w.write_var_bytes(&[]);
        assert!(RangeProof::from_bytes(&w.into_inner()).is_err());
    }
}
