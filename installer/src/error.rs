//! Error types for the Nether Portal installer.
//!
//! Only failures that end the run live here. Download, integrity, and launch
//! failures are recovered inside the install flow and never reach `main`.

use crate::artefact::error::ArtefactError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that end an installation run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The user declined a step the run cannot continue without.
    #[error("Quitting due to {reason}.")]
    Aborted {
        /// What the user declined, e.g. `incomplete file "jdk.exe"`.
        reason: String,
    },

    /// The artefact configuration is invalid.
    #[error("invalid artefact configuration: {0}")]
    Artefact(#[from] ArtefactError),

    /// The configuration file exists but could not be read or parsed.
    #[error("invalid configuration file {path}: {reason}")]
    Config {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },

    /// The directory containing the program could not be determined.
    #[error("could not locate the program directory: {reason}")]
    ProgramDirectory {
        /// Description of why the directory could not be resolved.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
