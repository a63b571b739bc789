//! BLSCT curve primitives
//!
//! Thin value types over the BLS12-381 G1 group used by every other BLSCT
//! crate, plus the canonical byte codec shared by all wire types.
//!
//! ```text
//! Scalar : Fr, 32 bytes big-endian
//! Point  : G1, 48 bytes compressed
//! ```

pub mod codec;
mod error;
pub mod hash;
mod point;
mod scalar;

pub use ark_ec::hashing::HashToCurveError;
pub use codec::{Decode, Encode, HexCodec, Reader, Writer};
pub use error::EncodingError;
pub use hash::{HashWriter, sha256d};
pub use point::Point;
pub use scalar::Scalar;
