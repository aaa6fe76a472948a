//! # Content Digest
//!
//! SHA-256 digests of rendered artifacts. The navigation index carries the
//! digest of its text rendering so CI can pin the expected navigation and
//! detect drift between runs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 digest of a byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Digest `data` with SHA-256.
    pub fn sha256(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hash);
        Self { bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_digest() {
        let d = ContentDigest::sha256(b"");
        assert_eq!(
            d.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_display_has_algorithm_prefix() {
        let d = ContentDigest::sha256(b"abc");
        let shown = d.to_string();
        assert!(shown.starts_with("sha256:"));
        assert_eq!(shown.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(ContentDigest::sha256(b"index"), ContentDigest::sha256(b"index"));
        assert_ne!(ContentDigest::sha256(b"index"), ContentDigest::sha256(b"Index"));
    }
}
