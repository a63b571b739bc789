//! Wire form of inputs and outputs
//!
//! ```text
//! CTxIn   prev_out | script_sig | sequence u32 | witness (vec of var bytes)
//! CTxOut  value u64 | script_pub_key | token_id | has_blsct u8 [| BlsctData]
//! BlsctData  P | E | R | view_tag u16 | range_proof
//! ```

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, Point};
use blsct_keys::stealth::recover_nonce;
use blsct_keys::{HashId, SubAddr, ViewKey, ViewTag};
use blsct_range_proof::{AmountRecoveryRequest, AmountRecoveryResult, RangeProof};
use blsct_token::TokenId;

use crate::{OutPoint, Script};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CTxIn {
    pub prev_out: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
    pub script_witness: Vec<Vec<u8>>,
}

impl Encode for CTxIn {
    fn encode(&self, w: &mut Writer) {
        self.prev_out.encode(w);
        self.script_sig.encode(w);
        w.write_u32(self.sequence);
        w.write_vec(&self.script_witness);
    }
}

impl Decode for CTxIn {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            prev_out: OutPoint::decode(r)?,
            script_sig: Script::decode(r)?,
            sequence: r.read_u32()?,
            script_witness: r.read_vec()?,
        })
    }
}

/// Confidential part of an output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlsctData {
    /// `P`, one-time spending public key
    pub spending_key: Point,
    /// `E`
    pub ephemeral_key: Point,
    /// `R`
    pub blinding_key: Point,
    pub view_tag: ViewTag,
    pub range_proof: RangeProof,
}

impl BlsctData {
    /// Pedersen commitment to the output amount
    pub fn commitment(&self) -> Option<&Point> {
        match self.range_proof.commitments() {
            [commitment] => Some(commitment),
            _ => None,
        }
    }

    /// Whether this output pays `sub_addr`. The view tag is checked first.
    pub fn is_for(&self, view_key: &ViewKey, sub_addr: &SubAddr) -> bool {
        if ViewTag::generate(&self.blinding_key, view_key) != self.view_tag {
            return false;
        }
        HashId::generate(&self.blinding_key, &self.spending_key, view_key)
            == HashId::from_sub_addr(sub_addr)
    }

    pub fn recovery_request(&self, view_key: &ViewKey) -> AmountRecoveryRequest {
        AmountRecoveryRequest::new(
            self.range_proof.clone(),
            recover_nonce(&self.blinding_key, view_key),
        )
    }

    /// Recover the amount, gamma and memo with the recipient's view key.
    pub fn recover(&self, view_key: &ViewKey) -> AmountRecoveryResult {
        self.recovery_request(view_key).recover()
    }
}

impl Encode for BlsctData {
    fn encode(&self, w: &mut Writer) {
        self.spending_key.encode(w);
        self.ephemeral_key.encode(w);
        self.blinding_key.encode(w);
        self.view_tag.encode(w);
        self.range_proof.encode(w);
    }
}

impl Decode for BlsctData {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            spending_key: Point::decode(r)?,
            ephemeral_key: Point::decode(r)?,
            blinding_key: Point::decode(r)?,
            view_tag: ViewTag::decode(r)?,
            range_proof: RangeProof::decode(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CTxOut {
    /// Explicit amount; zero for confidential outputs
    pub value: u64,
    pub script_pub_key: Script,
    pub token_id: TokenId,
    pub blsct_data: Option<BlsctData>,
}

impl CTxOut {
    /// Unencrypted fee output
    pub fn fee(value: u64) -> Self {
        Self {
            value,
            script_pub_key: Script::op_return(),
            token_id: TokenId::native(),
            blsct_data: None,
        }
    }

    pub fn is_fee(&self) -> bool {
        self.blsct_data.is_none() && self.script_pub_key.is_op_return() && self.token_id.is_native()
    }
}

impl Encode for CTxOut {
    fn encode(&self, w: &mut Writer) {
        w.write_u64(self.value);
        self.script_pub_key.encode(w);
        self.token_id.encode(w);
        match &self.blsct_data {
            Some(data) => {
                w.write_bool(true);
                data.encode(w);
            }
            None => w.write_bool(false),
        }
    }
}

impl Decode for CTxOut {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        let value = r.read_u64()?;
        let script_pub_key = Script::decode(r)?;
        let token_id = TokenId::decode(r)?;
        let blsct_data = if r.read_bool()? {
            Some(BlsctData::decode(r)?)
        } else {
            None
        };
        Ok(Self {
            value,
            script_pub_key,
            token_id,
            blsct_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxId;
    use blsct_curve::HexCodec;

    #[test]
    fn test_ctx_in_with_witness() {
        let ctx_in = CTxIn {
            prev_out: OutPoint::new(TxId::random(), 3),
            script_sig: Script::staked_marker(),
            sequence: 0xFFFF_FFFD,
            script_witness: vec![vec![1, 2, 3], vec![]],
        };
        assert_eq!(CTxIn::from_hex(&ctx_in.to_hex()).unwrap(), ctx_in);
    }

    #[test]
    fn test_fee_output() {
        let out = CTxOut::fee(400_000);
        assert!(out.is_fee());
        let bytes = out.to_bytes();
        // value, script, token id, no blsct data
        assert_eq!(bytes.len(), 8 + 2 + 16 + 1);
        assert_eq!(CTxOut::from_bytes(&bytes).unwrap(), out);
    }

    #[test]
    fn test_bool_flag_must_be_canonical() {
        let mut bytes = CTxOut::fee(1).to_bytes();
        let last = bytes.len() - 1;
        bytes[last] = 2;
        assert!(CTxOut::from_bytes(&bytes).is_err());
    }
}
