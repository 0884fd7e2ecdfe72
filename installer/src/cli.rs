//! CLI argument definitions for the Nether Portal installer.
//!
//! The installer is meant to be double-clicked, so every argument is
//! optional and the default run asks everything interactively.

use clap::Parser;

/// Download, verify, and install the Oracle JDK for Minecraft.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nether-portal")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download, verify, and install the Oracle JDK for Minecraft.\n\n",
    "The installer looks for the JDK installer next to this program, downloads ",
    "it when missing, checks its SHA-256, and then runs it. Errors are written ",
    "to logfile.log beside the program.\n\n",
    "Defaults can be overridden with a nether-portal.toml file in the same ",
    "directory.",
))]
pub struct Cli {
    /// Ask for a custom JDK version, suffix, SHA-256, and download URL.
    #[arg(long = "enable-cli", hide = true)]
    pub enable_cli: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
