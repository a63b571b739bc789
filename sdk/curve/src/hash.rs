//! Domain-separated hashing into the scalar field
//!
//! ```text
//! H(domain, x1, .., xn) = SHA-512(len(domain) || domain || len(x1) || x1 || ..)
//! Hs(...)               = H(...) mod r      (64-byte reduction, unbiased)
//! ```

use sha2::{Digest, Sha256, Sha512};

use crate::{Point, Scalar};

/// Incremental transcript hasher with length-prefixed fields.
#[derive(Clone)]
pub struct HashWriter {
    hasher: Sha512,
}

impl HashWriter {
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha512::new();
        hasher.update((domain.len() as u64).to_le_bytes());
        hasher.update(domain);
        Self { hasher }
    }

    pub fn write(mut self, bytes: &[u8]) -> Self {
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    pub fn write_u64(self, v: u64) -> Self {
        self.write(&v.to_le_bytes())
    }

    pub fn write_scalar(self, s: &Scalar) -> Self {
        self.write(&s.to_bytes_be())
    }

    pub fn write_point(self, p: &Point) -> Self {
        self.write(&p.to_bytes())
    }

    pub fn finalize(self) -> [u8; 64] {
        let digest = self.hasher.finalize();
        let mut out = [0u8; 64];
        out.copy_from_slice(&digest);
        out
    }

    pub fn finalize_scalar(self) -> Scalar {
        Scalar::from_bytes_mod_order(&self.finalize())
    }
}

/// Double SHA-256
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_separation() {
        let a = HashWriter::new(b"a").write(b"x").finalize_scalar();
        let b = HashWriter::new(b"b").write(b"x").finalize_scalar();
        assert_ne!(a, b);
    }

    #[test]
    fn test_length_prefix_prevents_concatenation_collisions() {
        let a = HashWriter::new(b"d").write(b"ab").write(b"c").finalize();
        let b = HashWriter::new(b"d").write(b"a").write(b"bc").finalize();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sha256d_empty() {
        assert_eq!(
            hex::encode(sha256d(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }
}
