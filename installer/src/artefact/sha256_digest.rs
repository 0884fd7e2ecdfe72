//! SHA-256 digest newtype for artefact verification.
//!
//! Validates that the value is a 64-character hexadecimal string
//! representing a 256-bit hash digest. Input is normalised to lowercase so
//! that digests copied from vendor pages in either case compare equal.

use super::error::{ArtefactError, Result};
use std::fmt;
use std::str::FromStr;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A validated, lowercase, hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use nether_portal::artefact::sha256_digest::Sha256Digest;
///
/// let hex = "A".repeat(64);
/// let digest: Sha256Digest = hex.as_str().try_into().unwrap();
/// assert_eq!(digest.as_str(), "a".repeat(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a digest already known to be lowercase hex, such as a constant
    /// checked at compile time with [`is_lowercase_sha256`].
    pub(crate) fn from_checked(value: &str) -> Self {
        debug_assert!(is_lowercase_sha256(value));
        Self(value.to_owned())
    }
}

/// Whether `value` is exactly 64 lowercase hex characters.
///
/// Usable in `const` items.
pub(crate) const fn is_lowercase_sha256(value: &str) -> bool {
    if value.len() != DIGEST_HEX_LEN {
        return false;
    }
    let mut rest = value.as_bytes();
    while let [first, tail @ ..] = rest {
        if !matches!(*first, b'0'..=b'9' | b'a'..=b'f') {
            return false;
        }
        rest = tail;
    }
    true
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        validate_sha256(trimmed)?;
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl FromStr for Sha256Digest {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ArtefactError::InvalidSha256Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}
