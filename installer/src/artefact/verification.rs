//! Integrity checking for downloaded installers.
//!
//! The digest is computed by streaming the file through SHA-256 in fixed
//! chunks, so multi-hundred-megabyte installers never sit in memory.

use super::sha256_digest::Sha256Digest;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read buffer size for hashing.
const CHUNK_SIZE: usize = 8192;

/// Failure to read the file being checked.
#[derive(Debug, thiserror::Error)]
#[error("could not read {path}: {source}")]
pub struct IntegrityError {
    /// The file that could not be read.
    pub path: PathBuf,
    /// The underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

impl IntegrityError {
    fn new(path: &Path, source: std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of comparing a file against its expected digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityCheck {
    /// The file hashes to the expected digest.
    Match,
    /// The file hashes to something else.
    Mismatch {
        /// The digest that was actually computed.
        actual: Sha256Digest,
    },
}

impl IntegrityCheck {
    /// Return whether the file matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Compute the SHA-256 digest of a file.
///
/// Reads the file at `path` in chunks and returns the lowercase hex
/// digest as a validated [`Sha256Digest`].
///
/// # Errors
///
/// Returns [`IntegrityError`] if the file cannot be opened or read.
pub fn compute_sha256(path: &Path) -> Result<Sha256Digest, IntegrityError> {
    let mut file = fs::File::open(path).map_err(|e| IntegrityError::new(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| IntegrityError::new(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    let hex = format!("{:x}", hasher.finalize());
    // sha2 always produces valid 64-char lowercase hex.
    Ok(Sha256Digest::try_from(hex).expect("sha2 produces valid 64-char lowercase hex"))
}

/// Compare the file at `path` against `expected`.
///
/// # Errors
///
/// Returns [`IntegrityError`] when the file cannot be read. Callers that
/// only care whether the file is usable treat this the same as a mismatch.
///
/// # Examples
///
/// ```
/// use nether_portal::artefact::sha256_digest::Sha256Digest;
/// use nether_portal::artefact::verification::check_integrity;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("empty.bin");
/// std::fs::write(&path, b"").unwrap();
///
/// let empty: Sha256Digest =
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855".parse().unwrap();
/// assert!(check_integrity(&path, &empty).unwrap().is_match());
/// ```
pub fn check_integrity(
    path: &Path,
    expected: &Sha256Digest,
) -> Result<IntegrityCheck, IntegrityError> {
    let actual = compute_sha256(path)?;
    log::debug!("computed sha256 {actual} for {}", path.display());
    if &actual == expected {
        Ok(IntegrityCheck::Match)
    } else {
        Ok(IntegrityCheck::Mismatch { actual })
    }
}
