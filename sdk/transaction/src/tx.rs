//! Transaction assembly and verification
//!
//! ```text
//! Σ C_in  =  Σ V_out  +  Σ value·H_token  +  (Σγ_in − Σγ_out)·G
//!                        (fee output)         └── balance key X
//!
//! signature = Σ sign(x_i, txid)  +  sign(Σγ_in − Σγ_out, "BLSCT_BALANCE")
//! ```
//!
//! A verifier recomputes `X` from the spent commitments and the outputs.
//! Signing for `X` is only possible when the `H` components cancel, so the
//! aggregate signature proves both ownership of the inputs and the balance.

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, Point, Scalar, sha256d};
use blsct_range_proof::MAX_AMOUNT;
use blsct_signature::Signature;
use blsct_token::TokenId;

use crate::{
    AmountError, AmountReason, CTxIn, CTxOut, ConstructionError, FeePolicy, Side, TxError, TxId,
    TxIn, TxOut, VerificationFailure,
};

/// Version bit marking a confidential transaction
pub const BLSCT_MARKER: i32 = 0x20;
pub const TX_VERSION: i32 = 2 | BLSCT_MARKER;
/// Message signed by the blinding excess
pub const BALANCE_MESSAGE: &[u8] = b"BLSCT_BALANCE";

/// The parts of a spent output `Tx::verify` needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpentOutput {
    pub commitment: Point,
    /// `P`
    pub spending_key: Point,
}

impl SpentOutput {
    /// `None` for outputs without confidential data
    pub fn from_ctx_out(out: &CTxOut) -> Option<Self> {
        let data = out.blsct_data.as_ref()?;
        Some(Self {
            commitment: *data.commitment()?,
            spending_key: data.spending_key,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tx {
    version: i32,
    inputs: Vec<CTxIn>,
    outputs: Vec<CTxOut>,
    lock_time: u32,
    signature: Signature,
}

impl Tx {
    /// Build with the configured fee policy.
    pub fn build(tx_ins: &[TxIn], tx_outs: &[TxOut]) -> Result<Self, TxError> {
        Self::build_with_fee_policy(tx_ins, tx_outs, FeePolicy::configured())
    }

    /// Validate amounts, append the fee output and sign.
    ///
    /// A balance error on the fee itself is reported as
    /// `outputs[tx_outs.len()]`, the index the fee output would take.
    pub fn build_with_fee_policy(
        tx_ins: &[TxIn],
        tx_outs: &[TxOut],
        policy: FeePolicy,
    ) -> Result<Self, TxError> {
        if tx_ins.is_empty() {
            return Err(ConstructionError::NoInputs.into());
        }
        if tx_outs.is_empty() {
            return Err(ConstructionError::NoOutputs.into());
        }

        if let Some(index) = tx_ins.iter().position(|i| i.amount() > MAX_AMOUNT) {
            return Err(amount_error(Side::Inputs, index, AmountReason::OutOfRange).into());
        }
        if let Some(index) = tx_outs.iter().position(|o| o.amount() > MAX_AMOUNT) {
            return Err(amount_error(Side::Outputs, index, AmountReason::OutOfRange).into());
        }
        for (index, tx_out) in tx_outs.iter().enumerate() {
            if !tx_out.commitment_matches()? {
                return Err(
                    amount_error(Side::Outputs, index, AmountReason::CommitmentMismatch).into(),
                );
            }
        }

        let fee = policy
            .fee_for(tx_ins.len(), tx_outs.len())
            .ok_or(ConstructionError::FeeOverflow {
                components: tx_ins.len() + tx_outs.len(),
            })?;
        check_balance(tx_ins, tx_outs, fee)?;

        let inputs = tx_ins.iter().map(TxIn::to_ctx_in).collect();
        let mut outputs: Vec<CTxOut> = tx_outs.iter().map(TxOut::to_ctx_out).collect();
        if fee > 0 {
            outputs.push(CTxOut::fee(fee));
        }

        let mut tx = Self {
            version: TX_VERSION,
            inputs,
            outputs,
            lock_time: 0,
            signature: Signature::identity(),
        };

        let tx_id = tx.tx_id();
        let mut signatures = Vec::with_capacity(tx_ins.len() + 1);
        for tx_in in tx_ins {
            signatures.push(Signature::sign(tx_in.spending_key(), tx_id.as_bytes())?);
        }
        let excess = tx_ins.iter().map(|i| *i.gamma()).sum::<Scalar>()
            - tx_outs.iter().map(|o| *o.gamma()).sum::<Scalar>();
        signatures.push(Signature::sign(&excess, BALANCE_MESSAGE)?);
        tx.signature = Signature::aggregate(&signatures);

        log::debug!(
            "built tx {} with {} input(s), {} output(s), fee {}",
            tx_id,
            tx.inputs.len(),
            tx.outputs.len(),
            fee
        );
        Ok(tx)
    }

    /// Check range proofs, balance and ownership against the outputs being
    /// spent, given in input order.
    pub fn verify(&self, spent_outputs: &[SpentOutput]) -> Result<(), VerificationFailure> {
        if spent_outputs.len() != self.inputs.len() {
            return Err(VerificationFailure::SpentOutputCount {
                expected: self.inputs.len(),
                got: spent_outputs.len(),
            });
        }

        let mut balance_key: Point = spent_outputs.iter().map(|s| s.commitment).sum();
        for (index, out) in self.outputs.iter().enumerate() {
            if out.value > 0 {
                let h = out
                    .token_id
                    .value_generator()
                    .map_err(|_| VerificationFailure::Generator { index })?;
                balance_key -= h * Scalar::from_u64(out.value);
            }
            if let Some(data) = &out.blsct_data {
                let commitment = data
                    .commitment()
                    .ok_or(VerificationFailure::RangeProof { index })?;
                if *data.range_proof.token_id() != out.token_id || !data.range_proof.verify() {
                    log::warn!("tx {}: range proof of output {index} rejected", self.tx_id());
                    return Err(VerificationFailure::RangeProof { index });
                }
                balance_key -= *commitment;
            }
        }

        let tx_id = self.tx_id();
        let mut signed: Vec<(Point, &[u8])> = spent_outputs
            .iter()
            .map(|s| (s.spending_key, tx_id.as_bytes().as_slice()))
            .collect();
        signed.push((balance_key, BALANCE_MESSAGE));

        if !self.signature.verify_aggregate(&signed) {
            log::warn!("tx {tx_id}: aggregate signature rejected");
            return Err(VerificationFailure::Signature);
        }
        Ok(())
    }

    pub fn tx_id(&self) -> TxId {
        let mut w = Writer::new();
        self.encode_unsigned(&mut w);
        TxId::new(sha256d(&w.into_inner()))
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.to_bytes()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, EncodingError> {
        Self::from_bytes(bytes)
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn inputs(&self) -> &[CTxIn] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[CTxOut] {
        &self.outputs
    }

    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Sum of the explicit fee outputs
    pub fn fee(&self) -> u64 {
        self.outputs
            .iter()
            .filter(|o| o.is_fee())
            .fold(0u64, |acc, o| acc.saturating_add(o.value))
    }

    fn encode_unsigned(&self, w: &mut Writer) {
        w.write_i32(self.version);
        w.write_vec(&self.inputs);
        w.write_vec(&self.outputs);
        w.write_u32(self.lock_time);
    }
}

fn amount_error(side: Side, index: usize, reason: AmountReason) -> AmountError {
    AmountError {
        side,
        index,
        reason,
    }
}

/// Per-token totals; the native token is checked first, then others in
/// order of first appearance.
fn check_balance(tx_ins: &[TxIn], tx_outs: &[TxOut], fee: u64) -> Result<(), AmountError> {
    let mut tokens = vec![TokenId::native()];
    for token_id in tx_ins
        .iter()
        .map(TxIn::token_id)
        .chain(tx_outs.iter().map(TxOut::token_id))
    {
        if !tokens.contains(token_id) {
            tokens.push(*token_id);
        }
    }

    for token_id in &tokens {
        let fee = if token_id.is_native() { fee as u128 } else { 0 };
        let ins: u128 = tx_ins
            .iter()
            .filter(|i| i.token_id() == token_id)
            .map(|i| i.amount() as u128)
            .sum();
        let outs: u128 = tx_outs
            .iter()
            .filter(|o| o.token_id() == token_id)
            .map(|o| o.amount() as u128)
            .sum::<u128>()
            + fee;

        if ins < outs {
            // First output (or the fee) that overruns the inputs
            let mut acc = 0u128;
            for (index, out) in tx_outs.iter().enumerate() {
                if out.token_id() != token_id {
                    continue;
                }
                acc += out.amount() as u128;
                if acc > ins {
                    return Err(amount_error(Side::Outputs, index, AmountReason::Unbalanced));
                }
            }
            return Err(amount_error(Side::Outputs, tx_outs.len(), AmountReason::Unbalanced));
        }
        if ins > outs {
            // First input that overruns outputs plus fee
            let mut acc = 0u128;
            for (index, tx_in) in tx_ins.iter().enumerate() {
                if tx_in.token_id() != token_id {
                    continue;
                }
                acc += tx_in.amount() as u128;
                if acc > outs {
                    return Err(amount_error(Side::Inputs, index, AmountReason::Unbalanced));
                }
            }
        }
    }
    Ok(())
}

impl Encode for Tx {
    fn encode(&self, w: &mut Writer) {
        self.encode_unsigned(w);
        self.signature.encode(w);
    }
}

impl Decode for Tx {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        let version = r.read_i32()?;
        if version & BLSCT_MARKER == 0 {
            return Err(EncodingError::InvalidValue("not a confidential transaction"));
        }
        Ok(Self {
            version,
            inputs: r.read_vec()?,
            outputs: r.read_vec()?,
            lock_time: r.read_u32()?,
            signature: Signature::decode(r)?,
        })
    }
}

blsct_curve::impl_hex_serde!(Tx);
