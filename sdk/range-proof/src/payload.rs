//! Amount recovery payload
//!
//! The amounts and message are sealed for whoever knows the nonce point:
//!
//! ```text
//! key   = blake3::derive_key("BLSCT range proof amount key v1", N)
//! iv    = blake3::derive_key("BLSCT range proof amount iv v1", N)[..12]
//! ct    = ChaCha20-Poly1305(key, iv, count || amounts (u64 LE) || message)
//! aad   = token id || value commitments
//! ```
//!
//! Every proof uses a fresh nonce point, so the derived `(key, iv)` pair is
//! never reused.

use blsct_curve::Point;
use chacha20poly1305::{
    ChaCha20Poly1305,
    aead::{Aead, KeyInit, Payload},
};

use crate::RangeProofError;

const KEY_CONTEXT: &str = "BLSCT range proof amount key v1";
const IV_CONTEXT: &str = "BLSCT range proof amount iv v1";

/// Poly1305 tag length
pub(crate) const TAG_SIZE: usize = 16;

fn derive_cipher(nonce: &Point) -> (ChaCha20Poly1305, [u8; 12]) {
    let nonce_bytes = nonce.to_bytes();
    let key = blake3::derive_key(KEY_CONTEXT, &nonce_bytes);
    let iv_full = blake3::derive_key(IV_CONTEXT, &nonce_bytes);
    let mut iv = [0u8; 12];
    iv.copy_from_slice(&iv_full[..12]);
    (ChaCha20Poly1305::new(&key.into()), iv)
}

/// Plaintext length for `count` amounts and a message of `message_len` bytes
pub(crate) fn plaintext_len(count: usize, message_len: usize) -> usize {
    1 + 8 * count + message_len
}

pub(crate) fn seal(
    nonce: &Point,
    aad: &[u8],
    amounts: &[u64],
    message: &[u8],
) -> Result<Vec<u8>, RangeProofError> {
    let mut plaintext = Vec::with_capacity(plaintext_len(amounts.len(), message.len()));
    plaintext.push(amounts.len() as u8);
    for amount in amounts {
        plaintext.extend_from_slice(&amount.to_le_bytes());
    }
    plaintext.extend_from_slice(message);

    let (cipher, iv) = derive_cipher(nonce);
    cipher
        .encrypt(
            &iv.into(),
            Payload {
                msg: &plaintext,
                aad,
            },
        )
        .map_err(|_| RangeProofError::Encryption)
}

/// Decrypt and parse; `None` on a wrong nonce or malformed plaintext.
pub(crate) fn open(
    nonce: &Point,
    aad: &[u8],
    ciphertext: &[u8],
    count: usize,
) -> Option<(Vec<u64>, String)> {
    let (cipher, iv) = derive_cipher(nonce);
    let plaintext = cipher
        .decrypt(
            &iv.into(),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .ok()?;

    let (&declared, rest) = plaintext.split_first()?;
    if declared as usize != count || rest.len() < 8 * count {
        return None;
    }

    let (amount_bytes, message) = rest.split_at(8 * count);
    let amounts = amount_bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut b = [0u8; 8];
            b.copy_from_slice(chunk);
            u64::from_le_bytes(b)
        })
        .collect();
    let message = String::from_utf8(message.to_vec()).ok()?;
    Some((amounts, message))
}
