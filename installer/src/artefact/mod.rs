//! The installer artefact: identity, download, and integrity checking.
//!
//! # Sub-modules
//!
//! - [`error`] - Semantic error types for validation failures.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`spec`] - Artefact identity (`ArtefactSpec`, `ArtefactDefaults`).
//! - [`download`] - Fetcher trait and HTTP implementation.
//! - [`verification`] - Streaming SHA-256 integrity checks.

pub mod download;
pub mod error;
pub mod sha256_digest;
pub mod spec;
pub mod verification;
