//! Private key types
//!
//! Each key is a distinct non-zero scalar newtype so keys derived under
//! different tags cannot be passed where another is expected.

use blsct_curve::codec::{Decode, Encode, Reader, Writer};
use blsct_curve::{EncodingError, Point, Scalar};
use blsct_signature::{Signature, SignatureError};
use std::fmt;

use crate::derivation::{
    BLINDING_KEY_TAG, CHILD_KEY_TAG, SPENDING_KEY_TAG, TOKEN_KEY_TAG, TX_KEY_TAG, VIEW_KEY_TAG,
    derive, derive_nonzero,
};
use crate::stealth::shared_secret_scalar;
use crate::sub_addr::sub_address_scalar;
use crate::{DerivationError, PublicKey, SubAddrId};

macro_rules! scalar_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq)]
        pub struct $name(Scalar);

        impl $name {
            pub fn as_scalar(&self) -> &Scalar {
                &self.0
            }

            pub fn to_public_key(&self) -> PublicKey {
                PublicKey::from_scalar(&self.0)
            }
        }

        impl TryFrom<Scalar> for $name {
            type Error = DerivationError;

            fn try_from(s: Scalar) -> Result<Self, DerivationError> {
                if s.is_zero() {
                    return Err(DerivationError::ZeroKey);
                }
                Ok(Self(s))
            }
        }

        impl From<$name> for Scalar {
            fn from(key: $name) -> Scalar {
                key.0
            }
        }

        impl Encode for $name {
            fn encode(&self, w: &mut Writer) {
                self.0.encode(w);
            }
        }

        impl Decode for $name {
            const FIXED_SIZE: Option<usize> = Some(Scalar::SIZE);

            fn decode(r: &mut Reader<'_>) -> Result<Self, EncodingError> {
                let s = Scalar::decode(r)?;
                Self::try_from(s).map_err(|_| EncodingError::InvalidValue("zero key"))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }

        blsct_curve::impl_hex_serde!($name);
    };
}

scalar_key!(
    /// First key below the seed; root of the blinding, token and tx branches
    ChildKey
);
scalar_key!(BlindingKey);
scalar_key!(TokenKey);
scalar_key!(
    /// Parent of the view/spend pair
    TxKey
);
scalar_key!(
    /// Lets its holder detect incoming outputs and recover their amounts
    ViewKey
);
scalar_key!(
    /// Long-term spend authority
    SpendingKey
);
scalar_key!(
    /// One-time private key of a single received output
    PrivSpendingKey
);

impl ChildKey {
    pub fn from_seed(seed: &Scalar) -> Result<Self, DerivationError> {
        derive(seed, CHILD_KEY_TAG).map(Self)
    }

    pub fn to_blinding_key(&self) -> BlindingKey {
        BlindingKey(derive_nonzero(&self.0, BLINDING_KEY_TAG))
    }

    pub fn to_token_key(&self) -> TokenKey {
        TokenKey(derive_nonzero(&self.0, TOKEN_KEY_TAG))
    }

    pub fn to_tx_key(&self) -> TxKey {
        TxKey(derive_nonzero(&self.0, TX_KEY_TAG))
    }
}

impl TxKey {
    pub fn to_view_key(&self) -> ViewKey {
        ViewKey(derive_nonzero(&self.0, VIEW_KEY_TAG))
    }

    pub fn to_spending_key(&self) -> SpendingKey {
        SpendingKey(derive_nonzero(&self.0, SPENDING_KEY_TAG))
    }
}

impl PrivSpendingKey {
    /// Recompute the one-time key of an output sent to sub-address
    /// `(account, address)`:
    ///
    /// ```text
    /// x = Hs(v·R) + s + m(v, account, address)
    /// x·G = Hs(v·R)·G + D = P
    /// ```
    pub fn generate(
        blinding_pub: &Point,
        view_key: &ViewKey,
        spending_key: &SpendingKey,
        account: u64,
        address: u64,
    ) -> Self {
        let shared = *blinding_pub * view_key.0;
        let m = sub_address_scalar(view_key, &SubAddrId::new(account, address));
        Self(shared_secret_scalar(&shared) + spending_key.0 + m)
    }

    pub fn sign(&self, msg: &[u8]) -> Result<Signature, SignatureError> {
        Signature::sign(&self.0, msg)
    }
}
