//! Checksum utilities for emitted artifacts

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 checksum of artifact content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from text content
    pub fn from_content(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &[u8]) -> bool {
        Self::from_bytes(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "type Post {\n  id: ID!\n}\n";
        assert_eq!(Checksum::from_content(content), Checksum::from_content(content));
    }

    #[test]
    fn test_checksum_different_content() {
        let checksum1 = Checksum::from_content("enum Role { A }");
        let checksum2 = Checksum::from_content("enum Role { B }");
        assert_ne!(checksum1, checksum2);
    }

    #[test]
    fn test_checksum_verification() {
        let content = "scalar DateTime\n";
        let checksum = Checksum::from_content(content);
        assert!(checksum.verify(content.as_bytes()));
        assert!(!checksum.verify(b"different content"));
        assert_eq!(checksum.as_str().len(), 64);
    }
}
