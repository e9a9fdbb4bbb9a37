//! Artifact digest computation.
//!
//! Oracles log the digest of a model artifact before loading it so a failing
//! accuracy check can be correlated to the exact artifact that produced it.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::domain::error::Result;

/// Compute the SHA-256 hex digest of an artifact file's contents.
pub fn artifact_digest(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_artifact_digest_deterministic() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"model bytes").expect("write");

        let digest1 = artifact_digest(file.path()).expect("digest");
        let digest2 = artifact_digest(file.path()).expect("digest");
        assert_eq!(digest1, digest2);
        assert_eq!(digest1.len(), 64);
        assert!(digest1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_artifact_digest_content_sensitive() {
        let mut file1 = tempfile::NamedTempFile::new().expect("temp file");
        file1.write_all(b"model a").expect("write");
        let mut file2 = tempfile::NamedTempFile::new().expect("temp file");
        file2.write_all(b"model b").expect("write");

        let digest1 = artifact_digest(file1.path()).expect("digest");
        let digest2 = artifact_digest(file2.path()).expect("digest");
        assert_ne!(digest1, digest2);
    }

    #[test]
    fn test_artifact_digest_missing_file() {
        let result = artifact_digest(Path::new("/nonexistent/model.bin"));
        assert!(result.is_err());
    }
}
