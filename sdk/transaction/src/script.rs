//! Output and input scripts
//!
//! Scripts are opaque bytes to this crate except for the three forms it
//! writes itself:
//!
//! ```text
//! OP_TRUE                                confidential output
//! OP_RETURN                              explicit fee output
//! OP_STAKED_COMMITMENT || min_stake LE   staked commitment output
//! ```

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HexCodec};
use std::fmt;

pub const OP_TRUE: u8 = 0x51;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_STAKED_COMMITMENT: u8 = 0xc1;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn op_true() -> Self {
        Self(vec![OP_TRUE])
    }

    pub fn op_return() -> Self {
        Self(vec![OP_RETURN])
    }

    pub fn staked_commitment(min_stake: u64) -> Self {
        let mut bytes = Vec::with_capacity(9);
        bytes.push(OP_STAKED_COMMITMENT);
        bytes.extend_from_slice(&min_stake.to_le_bytes());
        Self(bytes)
    }

    /// Marker placed in the script_sig of an input spending a stake
    pub fn staked_marker() -> Self {
        Self(vec![OP_STAKED_COMMITMENT])
    }

    pub fn is_op_return(&self) -> bool {
        self.0.first() == Some(&OP_RETURN)
    }

    pub fn is_staked(&self) -> bool {
        self.0.first() == Some(&OP_STAKED_COMMITMENT)
    }

    /// Minimum stake of a staked commitment script
    pub fn min_stake(&self) -> Option<u64> {
        match self.0.as_slice() {
            [OP_STAKED_COMMITMENT, rest @ ..] if rest.len() == 8 => {
                let mut b = [0u8; 8];
                b.copy_from_slice(rest);
                Some(u64::from_le_bytes(b))
            }
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Encode for Script {
    fn encode(&self, w: &mut Writer) {
        w.write_var_bytes(&self.0);
    }
}

impl Decode for Script {
    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        r.read_var_bytes().map(Self)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}
