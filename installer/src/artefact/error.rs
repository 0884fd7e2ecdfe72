//! Error types for artefact naming, digests, and sources.
//!
//! Each variant provides a descriptive message identifying the invalid input
//! and the constraint that was violated.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A JDK version string is empty or contains more than digits and dots.
    #[error("invalid JDK version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// An installer file suffix is empty or not a plain extension.
    #[error("invalid installer suffix \"{value}\": {reason}")]
    InvalidSuffix {
        /// The rejected suffix string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// An artefact file name is empty or is not a bare file name.
    #[error("invalid artefact name \"{value}\": {reason}")]
    InvalidName {
        /// The rejected file name.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A download URL does not use HTTP or HTTPS.
    #[error("invalid download url \"{value}\": expected an http:// or https:// url")]
    InvalidUrl {
        /// The rejected URL.
        value: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
