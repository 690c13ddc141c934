//! Model file integrity checks.
//!
//! Model files are opaque blobs handed to a runtime, so the loader can pin them to a
//! list of known SHA-256 digests. An empty allow-list is the development setting: the
//! digest is logged and any file is accepted.

use crate::core::errors::{DigitError, DigitResult, SimpleError};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Computes the lower-case hex SHA-256 digest of a file.
pub fn sha256_file(path: &Path) -> DigitResult<String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| DigitError::model_load(path, "failed to open model file", Some(e)))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| DigitError::model_load(path, "failed to read model file", Some(e)))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verifies a model file against the allowed digests and returns its digest.
///
/// # Errors
///
/// Returns [`DigitError::ModelLoad`] if the file cannot be read or its digest is not
/// in a non-empty `allowed` list.
pub fn verify_model_integrity(path: &Path, allowed: &[String]) -> DigitResult<String> {
    let digest = sha256_file(path)?;

    if allowed.is_empty() {
        warn!(
            path = %path.display(),
            sha256 = %digest,
            "no model digests configured, skipping integrity check"
        );
        return Ok(digest);
    }

    if allowed.iter().any(|d| d.eq_ignore_ascii_case(&digest)) {
        debug!(path = %path.display(), sha256 = %digest, "model integrity verified");
        Ok(digest)
    } else {
        Err(DigitError::model_load(
            path,
            "model file failed the integrity check",
            Some(SimpleError::new(format!(
                "digest {digest} is not in the allowed list"
            ))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // SHA-256 of the ASCII string "abc".
    const ABC_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    fn abc_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "abc").unwrap();
        file
    }

    #[test]
    fn test_sha256_file() {
        let file = abc_file();
        assert_eq!(sha256_file(file.path()).unwrap(), ABC_DIGEST);
    }

    #[test]
    fn test_empty_allow_list_accepts() {
        let file = abc_file();
        assert_eq!(verify_model_integrity(file.path(), &[]).unwrap(), ABC_DIGEST);
    }

    #[test]
    fn test_allow_list_match_is_case_insensitive() {
        let file = abc_file();
        let allowed = vec![ABC_DIGEST.to_uppercase()];
        assert!(verify_model_integrity(file.path(), &allowed).is_ok());
    }

    #[test]
    fn test_unknown_digest_rejected() {
        let file = abc_file();
        let allowed = vec!["0".repeat(64)];
        let err = verify_model_integrity(file.path(), &allowed).unwrap_err();
        assert!(matches!(err, DigitError::ModelLoad { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = verify_model_integrity(Path::new("/nonexistent/model.onnx"), &[]).unwrap_err();
        assert!(matches!(err, DigitError::ModelLoad { .. }));
    }
}
