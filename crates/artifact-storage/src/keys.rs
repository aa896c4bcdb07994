//! Key encoding and decoding for storage layer.
//!
//! Artifact key format: `artifact:{id}`. Ids are caller supplied
//! (`<kind>-<name>`) and may themselves contain `:`; records are read back
//! from their values, never by parsing keys.

use crate::error::StorageError;

/// Prefix shared by every artifact key
pub const ARTIFACT_PREFIX: &str = "artifact:";

/// Meta key holding the store schema version (u32, big-endian)
pub const META_SCHEMA_VERSION: &[u8] = b"schema_version";

/// Meta key holding the next write sequence (u64, big-endian)
pub const META_NEXT_SEQUENCE: &[u8] = b"next_sequence";

/// Key for an artifact record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey {
    pub id: String,
}

impl ArtifactKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{}{}", ARTIFACT_PREFIX, self.id).into_bytes()
    }

    /// Prefix for scanning every artifact
    pub fn prefix() -> &'static [u8] {
        ARTIFACT_PREFIX.as_bytes()
    }
}

/// Decode a big-endian u64 meta value.
pub fn decode_u64(bytes: &[u8]) -> Result<u64, StorageError> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorageError::Key(format!("Expected 8 bytes, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(array))
}

/// Decode a big-endian u32 meta value.
pub fn decode_u32(bytes: &[u8]) -> Result<u32, StorageError> {
    let array: [u8; 4] = bytes
        .try_into()
        .map_err(|_| StorageError::Key(format!("Expected 4 bytes, got {}", bytes.len())))?;
    Ok(u32::from_be_bytes(array))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_key_keeps_colons_in_id() {
        let key = ArtifactKey::new("plan-2024:refactor");
        assert_eq!(key.to_bytes(), b"artifact:plan-2024:refactor".to_vec());
    }

    #[test]
    fn test_keys_share_scan_prefix() {
        let key = ArtifactKey::new("ledger-x");
        assert!(key.to_bytes().starts_with(ArtifactKey::prefix()));
    }

    #[test]
    fn test_decode_meta_values() {
        assert_eq!(decode_u64(&42u64.to_be_bytes()).unwrap(), 42);
        assert_eq!(decode_u32(&1u32.to_be_bytes()).unwrap(), 1);
        assert!(decode_u64(b"abc").is_err());
    }
}
