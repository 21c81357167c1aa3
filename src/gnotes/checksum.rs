//! Content hashes for change detection.
//!
//! Used both as the remote document checksum and by the editor to tell
//! whether a buffer was modified.

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 of some bytes as a 64 character lowercase hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    hex: String,
}

impl ContentHash {
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            hex: format!("{:x}", hasher.finalize()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }

    pub fn into_string(self) -> String {
        self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_empty_input() {
        assert_eq!(
            ContentHash::compute(&[]).as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hashes_known_content() {
        assert_eq!(
            ContentHash::compute(b"hello world").to_string(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn different_content_differs() {
        assert_ne!(
            ContentHash::compute(b"buy milk"),
            ContentHash::compute(b"buy milk\n")
        );
    }
}
