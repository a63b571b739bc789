//! Token identifiers
//!
//! A token is identified by `(token, subid)`. Fungible tokens use
//! `subid = u64::MAX`; the native asset is `(0, u64::MAX)`.
//!
//! Every token has its own Pedersen value generator, hashed to G1 from the
//! token id so amounts of different tokens can never cancel in a balance
//! equation:
//!
//! ```text
//! V = amount · H_token + gamma · G
//! H_token = hash_to_curve("BLSCT-VALUE-GENERATOR-V1", token || subid)
//! ```

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, HashToCurveError, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Sub-identifier of fungible tokens
pub const FUNGIBLE_SUBID: u64 = u64::MAX;

const VALUE_GENERATOR_DST: &[u8] = b"BLSCT-VALUE-GENERATOR-V1";

static NATIVE_GENERATOR: OnceLock<Point> = OnceLock::new();

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId {
    token: u64,
    subid: u64,
}

impl TokenId {
    /// Encoded width in bytes
    pub const SIZE: usize = 16;

    /// The native asset
    pub const fn native() -> Self {
        Self {
            token: 0,
            subid: FUNGIBLE_SUBID,
        }
    }

    /// A fungible token
    pub const fn from_token(token: u64) -> Self {
        Self {
            token,
            subid: FUNGIBLE_SUBID,
        }
    }

    pub const fn from_token_and_subid(token: u64, subid: u64) -> Self {
        Self { token, subid }
    }

    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn subid(&self) -> u64 {
        self.subid
    }

    pub fn is_native(&self) -> bool {
        *self == Self::native()
    }

    pub fn is_fungible(&self) -> bool {
        self.subid == FUNGIBLE_SUBID
    }

    /// Pedersen value generator `H_token`.
    ///
    /// The native generator is computed once per process.
    pub fn value_generator(&self) -> Result<Point, HashToCurveError> {
        if self.is_native() {
            if let Some(h) = NATIVE_GENERATOR.get() {
                return Ok(*h);
            }
        }

        let h = Point::hash_to_curve(VALUE_GENERATOR_DST, &self.to_bytes())?;
        if self.is_native() {
            let _ = NATIVE_GENERATOR.set(h);
        }
        Ok(h)
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            f.write_str("TokenId(native)")
        } else {
            write!(f, "TokenId({}:{})", self.token, self.subid)
        }
    }
}

impl Encode for TokenId {
    fn encode(&self, w: &mut Writer) {
        w.write_u64(self.token);
        w.write_u64(self.subid);
    }
}

impl Decode for TokenId {
    const FIXED_SIZE: Option<usize> = Some(Self::SIZE);

    fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            token: r.read_u64()?,
            subid: r.read_u64()?,
        })
    }
}
