//! Core types for content digests.

use std::fmt;

/// Length of a content digest in bytes (160-bit hash, 40 hex characters on disk).
pub const DIGEST_LEN: usize = 20;

/// Fixed-length content hash of a file's bytes.
///
/// Stored on disk as lowercase hexadecimal in the sidecar database, so the
/// encoding here is part of the external format and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Create a digest from raw bytes
    pub fn new(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Convert to lowercase hexadecimal string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hexadecimal string
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_str)?;
        if bytes.len() != DIGEST_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; DIGEST_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
