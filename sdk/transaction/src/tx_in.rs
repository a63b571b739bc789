use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, Scalar};
use blsct_token::TokenId;

use crate::{CTxIn, OutPoint, PAYLOAD_VERSION_V1, Script};

pub const SEQUENCE_FINAL: u32 = 0xFFFF_FFFF;
/// Signals replace-by-fee
pub const SEQUENCE_RBF: u32 = 0xFFFF_FFFD;

/// A previously received output, with everything needed to spend it.
#[derive(Clone, PartialEq, Eq)]
pub struct TxIn {
    amount: u64,
    gamma: Scalar,
    spending_key: Scalar,
    token_id: TokenId,
    out_point: OutPoint,
    staked_commitment: bool,
    rbf: bool,
}

impl TxIn {
    /// `spending_key` is the one-time private key of the spent output
    /// (`PrivSpendingKey`).
    pub fn build(
        amount: u64,
        gamma: Scalar,
        spending_key: impl Into<Scalar>,
        token_id: TokenId,
        out_point: OutPoint,
        staked_commitment: bool,
        rbf: bool,
    ) -> Self {
        Self {
            amount,
            gamma,
            spending_key: spending_key.into(),
            token_id,
            out_point,
            staked_commitment,
            rbf,
        }
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn gamma(&self) -> &Scalar {
        &self.gamma
    }

    pub fn spending_key(&self) -> &Scalar {
        &self.spending_key
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    pub fn out_point(&self) -> &OutPoint {
        &self.out_point
    }

    pub fn is_staked_commitment(&self) -> bool {
        self.staked_commitment
    }

    pub fn is_rbf(&self) -> bool {
        self.rbf
    }

    pub fn sequence(&self) -> u32 {
        if self.rbf { SEQUENCE_RBF } else { SEQUENCE_FINAL }
    }

    /// Wire form, without the private fields
    pub fn to_ctx_in(&self) -> CTxIn {
        CTxIn {
            prev_out: self.out_point,
            script_sig: if self.staked_commitment {
                Script::staked_marker()
            } else {
                Script::default()
            },
            sequence: self.sequence(),
            script_witness: Vec::new(),
        }
    }
}

impl std::fmt::Debug for TxIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxIn")
            .field("amount", &self.amount)
            .field("token_id", &self.token_id)
            .field("out_point", &self.out_point)
            .field("staked_commitment", &self.staked_commitment)
            .field("rbf", &self.rbf)
            .finish_non_exhaustive()
    }
}

impl Encode for TxIn {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(PAYLOAD_VERSION_V1);
        w.write_u64(self.amount);
        self.gamma.encode(w);
        self.spending_key.encode(w);
        self.token_id.encode(w);
        self.out_point.encode(w);
        w.write_bool(self.staked_commitment);
        w.write_bool(self.rbf);
    }
}

impl Decode for TxIn {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        let version = r.read_u8()?;
        if version != PAYLOAD_VERSION_V1 {
            return Err(EncodingError::UnsupportedVersion(version));
        }
        Ok(Self {
            amount: r.read_u64()?,
            gamma: Scalar::decode(r)?,
            spending_key: Scalar::decode(r)?,
            token_id: TokenId::decode(r)?,
            out_point: OutPoint::decode(r)?,
            staked_commitment: r.read_bool()?,
            rbf: r.read_bool()?,
        })
    }
}

blsct_curve::impl_hex_serde!(TxIn);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxId;
    use blsct_curve::HexCodec;

    fn sample(staked: bool, rbf: bool) -> TxIn {
        TxIn::build(
            500,
            Scalar::from_u64(11),
            Scalar::from_u64(12),
            TokenId::native(),
            OutPoint::new(TxId::random(), 1),
            staked,
            rbf,
        )
    }

    #[test]
    fn test_sequence_follows_rbf() {
        assert_eq!(sample(false, false).sequence(), SEQUENCE_FINAL);
        assert_eq!(sample(false, true).sequence(), SEQUENCE_RBF);
    }

    #[test]
    fn test_ctx_in() {
        let tx_in = sample(true, true);
        let ctx_in = tx_in.to_ctx_in();
        assert_eq!(ctx_in.prev_out, *tx_in.out_point());
        assert_eq!(ctx_in.sequence, SEQUENCE_RBF);
        assert!(ctx_in.script_sig.is_staked());
        assert!(sample(false, false).to_ctx_in().script_sig.is_empty());
    }

    #[test]
    fn test_versioned_encoding() {
        let tx_in = sample(true, false);
        let hex = tx_in.to_hex();
        assert!(hex.starts_with("01"));
        assert_eq!(TxIn::from_hex(&hex).unwrap(), tx_in);

        let mut bytes = tx_in.to_bytes();
        bytes[0] = 2;
        assert!(matches!(
            TxIn::from_bytes(&bytes),
            Err(EncodingError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_debug_hides_keys() {
        let s = format!("{:?}", sample(false, false));
        assert!(s.contains("amount: 500"));
        assert!(!s.contains("gamma"));
    }
}
