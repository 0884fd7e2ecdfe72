//! Nether Portal installer library.
//!
//! This crate finds, downloads, verifies, and runs the Oracle JDK installer
//! for Minecraft players. It is used by the `nether-portal` binary and can be
//! driven programmatically (with scripted input and stub collaborators) for
//! testing.
//!
//! # Modules
//!
//! - [`artefact`] - Artefact identity, download, and SHA-256 verification
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Optional `nether-portal.toml` overrides
//! - [`confirm`] - Yes/no confirmation prompts
//! - [`console`] - Line-oriented terminal interaction
//! - [`customize`] - Interactive version, suffix, digest, and URL overrides
//! - [`diagnostics`] - Append-only error log beside the program
//! - [`error`] - Errors that end a run
//! - [`install_flow`] - The download, verify, install, and clean-up sequence
//! - [`launch`] - Running the downloaded installer
//! - [`output`] - Fixed user-facing text
//! - [`welcome`] - Startup greeting and the hidden customisation switch
//! - [`workdir`] - Program-directory resolution

pub mod artefact;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod console;
pub mod customize;
pub mod diagnostics;
pub mod error;
pub mod install_flow;
pub mod launch;
pub mod output;
pub mod welcome;
pub mod workdir;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
