//! Address text encoding
//!
//! An address is the 96-byte `DoublePublicKey` (view || spend) in bech32 or
//! bech32m form. The human-readable part selects the network:
//!
//! ```text
//! nav1...   mainnet
//! tnav1...  testnet / signet
//! nvrt1...  regtest
//! ```

use bech32::{FromBase32, ToBase32, Variant};
use blsct_config::{AddressEncodingToml, Chain, NETWORK};
use blsct_curve::codec::{Decode, Encode};
use blsct_curve::EncodingError;
use blsct_keys::DoublePublicKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressEncoding {
    Bech32,
    Bech32M,
}

impl AddressEncoding {
    fn variant(self) -> Variant {
        match self {
            AddressEncoding::Bech32 => Variant::Bech32,
            AddressEncoding::Bech32M => Variant::Bech32m,
        }
    }

    fn from_variant(variant: Variant) -> Self {
        match variant {
            Variant::Bech32 => AddressEncoding::Bech32,
            Variant::Bech32m => AddressEncoding::Bech32M,
        }
    }

    /// Encoding selected in the global configuration
    pub fn configured() -> Self {
        NETWORK.address_encoding.into()
    }
}

impl From<AddressEncodingToml> for AddressEncoding {
    fn from(value: AddressEncodingToml) -> Self {
        match value {
            AddressEncodingToml::Bech32 => AddressEncoding::Bech32,
            AddressEncodingToml::Bech32m => AddressEncoding::Bech32M,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("malformed address: {0}")]
    Bech32(#[from] bech32::Error),

    #[error("address belongs to network prefix {found}, expected {expected}")]
    WrongNetwork { expected: &'static str, found: String },

    #[error("invalid address payload: {0}")]
    Payload(#[from] EncodingError),
}

/// A decoded address together with the network and encoding it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub chain: Chain,
    pub encoding: AddressEncoding,
    pub key: DoublePublicKey,
}

impl Address {
    /// Encode for the configured network.
    pub fn encode(dpk: &DoublePublicKey, encoding: AddressEncoding) -> Result<String, AddressError> {
        Self::encode_for_chain(NETWORK.chain, dpk, encoding)
    }

    /// Decode an address of the configured network.
    pub fn decode(s: &str) -> Result<DoublePublicKey, AddressError> {
        Self::decode_for_chain(NETWORK.chain, s).map(|a| a.key)
    }

    pub fn encode_for_chain(
        chain: Chain,
        dpk: &DoublePublicKey,
        encoding: AddressEncoding,
    ) -> Result<String, AddressError> {
        let data = dpk.to_bytes().to_base32();
        Ok(bech32::encode(chain.hrp(), data, encoding.variant())?)
    }

    pub fn decode_for_chain(chain: Chain, s: &str) -> Result<Self, AddressError> {
        let (hrp, data, variant) = bech32::decode(s)?;
        if hrp != chain.hrp() {
            return Err(AddressError::WrongNetwork {
                expected: chain.hrp(),
                found: hrp,
            });
        }
        let payload = Vec::<u8>::from_base32(&data)?;
        Ok(Self {
            chain,
            encoding: AddressEncoding::from_variant(variant),
            key: DoublePublicKey::from_bytes(&payload)?,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = Self::encode_for_chain(self.chain, &self.key, self.encoding).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts an address of any known network.
    fn from_str(s: &str) -> Result<Self, AddressError> {
        let (hrp, _, _) = bech32::decode(s)?;
        let chain = Chain::ALL
            .into_iter()
            .find(|c| c.hrp() == hrp)
            .ok_or(AddressError::WrongNetwork {
                expected: NETWORK.chain.hrp(),
                found: hrp,
            })?;
        Self::decode_for_chain(chain, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_both_encodings() {
        let dpk = DoublePublicKey::random();
        for encoding in [AddressEncoding::Bech32, AddressEncoding::Bech32M] {
            let s = Address::encode_for_chain(Chain::Mainnet, &dpk, encoding).unwrap();
            assert!(s.starts_with("nav1"));
            let decoded = Address::decode_for_chain(Chain::Mainnet, &s).unwrap();
            assert_eq!(decoded.key, dpk);
            assert_eq!(decoded.encoding, encoding);
            assert_eq!(decoded.to_string(), s);
        }
    }

    #[test]
    fn test_encode_decode_with_configured_network() {
        let dpk = DoublePublicKey::random();
        let s = Address::encode(&dpk, AddressEncoding::Bech32M).unwrap();
        assert_eq!(Address::decode(&s).unwrap(), dpk);
    }

    #[test]
    fn test_checksum_failure() {
        let dpk = DoublePublicKey::random();
        let s = Address::encode_for_chain(Chain::Mainnet, &dpk, AddressEncoding::Bech32M).unwrap();

        // Swap one data character for another valid one
        let mut chars: Vec<char> = s.chars().collect();
        let i = 10;
        chars[i] = if chars[i] == 'q' { 'p' } else { 'q' };
        let tampered: String = chars.into_iter().collect();

        assert!(matches!(
            Address::decode_for_chain(Chain::Mainnet, &tampered),
            Err(AddressError::Bech32(_))
        ));
    }

    #[test]
    fn test_invalid_charset() {
        assert!(matches!(
            Address::decode_for_chain(Chain::Mainnet, "nav1bbbbbbbio"),
            Err(AddressError::Bech32(_))
        ));
    }

    #[test]
    fn test_wrong_network() {
        let dpk = DoublePublicKey::random();
        let s = Address::encode_for_chain(Chain::Regtest, &dpk, AddressEncoding::Bech32M).unwrap();
        assert!(matches!(
            Address::decode_for_chain(Chain::Mainnet, &s),
            Err(AddressError::WrongNetwork { .. })
        ));

        let parsed: Address = s.parse().unwrap();
        assert_eq!(parsed.chain, Chain::Regtest);
        assert_eq!(parsed.key, dpk);
    }

    #[test]
    fn test_wrong_payload_length() {
        let s = bech32::encode("nav", [1u8; 10].to_base32(), Variant::Bech32m).unwrap();
        assert!(matches!(
            Address::decode_for_chain(Chain::Mainnet, &s),
            Err(AddressError::Payload(EncodingError::InvalidLength { expected: 96, got: 10 }))
        ));
    }
}
