//! # SHA-256 Digests
//!
//! Thin wrapper over `sha2` used by the field canonicalizer. The circuit
//! consumes only the leading 64 bits of each digest; the full value is kept
//! so diagnostics can print it.

use sha2::{Digest, Sha256};

/// A raw 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The first 16 hex characters of the digest read as a base-16 integer.
    ///
    /// Equivalent to the first eight digest bytes in big-endian order.
    pub fn leading_u64(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(head)
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of arbitrary bytes.
pub fn sha256_digest(data: &[u8]) -> Sha256Digest {
    Sha256Digest(Sha256::digest(data).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        let d = sha256_digest(b"");
        assert_eq!(
            d.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn leading_u64_matches_hex_prefix() {
        let d = sha256_digest(b"3333332222220001");
        let hex = d.to_hex();
        let from_hex = u64::from_str_radix(&hex[..16], 16).unwrap();
        assert_eq!(d.leading_u64(), from_hex);
        assert_eq!(d.leading_u64(), 12309871718263622894);
    }

    #[test]
    fn display_is_tagged() {
        let d = sha256_digest(b"");
        assert!(d.to_string().starts_with("sha256:e3b0c442"));
    }
}
