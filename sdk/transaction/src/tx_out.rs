use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HashToCurveError, Point, Scalar};
use blsct_keys::{StealthOutput, SubAddr};
use blsct_range_proof::{MAX_AMOUNT, RangeProof, gamma_from_nonce};
use blsct_token::TokenId;

use crate::{BlsctData, CTxOut, OutputError, PAYLOAD_VERSION_V1, Script};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum OutputType {
    #[default]
    Normal,
    StakedCommitment,
}

impl OutputType {
    fn tag(self) -> u8 {
        match self {
            OutputType::Normal => 0,
            OutputType::StakedCommitment => 1,
        }
    }

    fn from_tag(tag: u8) -> Result<Self, EncodingError> {
        match tag {
            0 => Ok(OutputType::Normal),
            1 => Ok(OutputType::StakedCommitment),
            tag => Err(EncodingError::UnknownTag {
                kind: "output type",
                tag,
            }),
        }
    }
}

/// A confidential output to a sub-address, with its stealth keys and range
/// proof already computed.
#[derive(Clone, PartialEq, Eq)]
pub struct TxOut {
    destination: SubAddr,
    amount: u64,
    memo: String,
    token_id: TokenId,
    output_type: OutputType,
    min_stake: u64,
    blinding_key: Scalar,
    stealth: StealthOutput,
    gamma: Scalar,
    range_proof: RangeProof,
}

impl TxOut {
    pub fn build(
        destination: &SubAddr,
        amount: u64,
        memo: &str,
        token_id: &TokenId,
        output_type: OutputType,
        min_stake: u64,
    ) -> Result<Self, OutputError> {
        Self::build_with_blinding_key(
            destination,
            amount,
            memo,
            token_id,
            output_type,
            min_stake,
            Scalar::random(),
        )
    }

    /// Build with a caller-chosen blinding scalar `r`. Reusing `r` across
    /// outputs links them.
    pub fn build_with_blinding_key(
        destination: &SubAddr,
        amount: u64,
        memo: &str,
        token_id: &TokenId,
        output_type: OutputType,
        min_stake: u64,
        blinding_key: Scalar,
    ) -> Result<Self, OutputError> {
        if output_type == OutputType::StakedCommitment && amount < min_stake {
            return Err(OutputError::StakeBelowMinimum { amount, min_stake });
        }

        let stealth = StealthOutput::derive(destination, &blinding_key);
        let range_proof = RangeProof::build(&[amount], &stealth.nonce, memo, token_id)?;

        Ok(Self {
            destination: *destination,
            amount,
            memo: memo.to_owned(),
            token_id: *token_id,
            output_type,
            min_stake,
            blinding_key,
            gamma: gamma_from_nonce(&stealth.nonce, 0),
            stealth,
            range_proof,
        })
    }

    pub fn destination(&self) -> &SubAddr {
        &self.destination
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn min_stake(&self) -> u64 {
        self.min_stake
    }

    /// Blinding factor of the amount commitment
    pub fn gamma(&self) -> &Scalar {
        &self.gamma
    }

    /// `P`
    pub fn spending_key(&self) -> &Point {
        &self.stealth.spending_key
    }

    /// `E`
    pub fn ephemeral_key(&self) -> &Point {
        &self.stealth.ephemeral_key
    }

    /// `R`
    pub fn blinding_key(&self) -> &Point {
        &self.stealth.blinding_key
    }

    pub fn view_tag(&self) -> blsct_keys::ViewTag {
        self.stealth.view_tag
    }

    pub fn range_proof(&self) -> &RangeProof {
        &self.range_proof
    }

    /// Whether the range proof commits to `amount·H_token + gamma·G` for
    /// this output's token.
    pub fn commitment_matches(&self) -> Result<bool, HashToCurveError> {
        if *self.range_proof.token_id() != self.token_id {
            return Ok(false);
        }
        let h = self.token_id.value_generator()?;
        let expected = h * Scalar::from_u64(self.amount) + Point::mul_base(&self.gamma);
        Ok(self.range_proof.commitments() == [expected])
    }

    pub fn script_pub_key(&self) -> Script {
        match self.output_type {
            OutputType::Normal => Script::op_true(),
            OutputType::StakedCommitment => Script::staked_commitment(self.min_stake),
        }
    }

    pub fn to_ctx_out(&self) -> CTxOut {
        CTxOut {
            value: 0,
            script_pub_key: self.script_pub_key(),
            token_id: self.token_id,
            blsct_data: Some(BlsctData {
                spending_key: self.stealth.spending_key,
                ephemeral_key: self.stealth.ephemeral_key,
                blinding_key: self.stealth.blinding_key,
                view_tag: self.stealth.view_tag,
                range_proof: self.range_proof.clone(),
            }),
        }
    }
}

impl std::fmt::Debug for TxOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxOut")
            .field("destination", &self.destination)
            .field("amount", &self.amount)
            .field("memo", &self.memo)
            .field("token_id", &self.token_id)
            .field("output_type", &self.output_type)
            .field("min_stake", &self.min_stake)
            .finish_non_exhaustive()
    }
}

// The stealth keys and gamma are re-derived from the blinding scalar on
// decode.
impl Encode for TxOut {
    fn encode(&self, w: &mut Writer) {
        w.write_u8(PAYLOAD_VERSION_V1);
        self.destination.encode(w);
        w.write_u64(self.amount);
        self.memo.encode(w);
        self.token_id.encode(w);
        w.write_u8(self.output_type.tag());
        w.write_u64(self.min_stake);
        self.blinding_key.encode(w);
        self.range_proof.encode(w);
    }
}

impl Decode for TxOut {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        let version = r.read_u8()?;
        if version != PAYLOAD_VERSION_V1 {
            return Err(EncodingError::UnsupportedVersion(version));
        }
        let destination = SubAddr::decode(r)?;
        let amount = r.read_u64()?;
        if amount > MAX_AMOUNT {
            return Err(EncodingError::InvalidValue("amount out of range"));
        }
        let memo = String::decode(r)?;
        let token_id = TokenId::decode(r)?;
        let output_type = OutputType::from_tag(r.read_u8()?)?;
        let min_stake = r.read_u64()?;
        if output_type == OutputType::StakedCommitment && amount < min_stake {
            return Err(EncodingError::InvalidValue("stake below minimum"));
        }
        let blinding_key = Scalar::decode(r)?;
        let range_proof = RangeProof::decode(r)?;

        let stealth = StealthOutput::derive(&destination, &blinding_key);
        let out = Self {
            destination,
            amount,
            memo,
            token_id,
            output_type,
            min_stake,
            blinding_key,
            gamma: gamma_from_nonce(&stealth.nonce, 0),
            stealth,
            range_proof,
        };
        if !out.commitment_matches().unwrap_or(false) {
            return Err(EncodingError::InvalidValue("amount does not match its commitment"));
        }
        Ok(out)
    }
}

blsct_curve::impl_hex_serde!(TxOut);
