//! Output formatting for the installer CLI.
//!
//! Fixed text shown to the user (banner, welcome, summaries) lives here so
//! the flow modules only decide *when* to print.

use std::fmt;
use std::io::Write;

/// ASCII-art banner printed at startup.
pub const BANNER: &str = concat!(
    "  __  __ _                            __ _   \n",
    " |  \\/  (_)                          / _| |  \n",
    " | \\  / |_ _ __   ___  ___ _ __ __ _| |_| |_ \n",
    " | |\\/| | | '_ \\ / _ \\/ __| '__/ _` |  _| __|\n",
    " | |  | | | | | |  __/ (__| | | (_| | | | |_ \n",
    " |_|  |_|_|_| |_|\\___|\\___|_|  \\__,_|_|  \\__|\n",
);

/// Write one line to `out`, ignoring write failures.
pub fn write_line(out: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// The greeting shown under the banner.
///
/// # Examples
///
/// ```
/// use nether_portal::output::welcome_text;
///
/// assert!(welcome_text("0.1.0").contains("Minecraft players"));
/// assert!(welcome_text("0.2.0-beta.1").contains("beta version"));
/// ```
#[must_use]
pub fn welcome_text(version: &str) -> String {
    let description = if version.contains("beta") {
        "This is a beta version."
    } else {
        concat!(
            "This is an open source program that helps Minecraft players ",
            "install the JDK environment with one click."
        )
    };
    format!("Welcome to >>> Nether Portal <<<\n[version: {version}]\n\n{description}\n")
}

/// Announce which installer file will be used.
#[must_use]
pub fn installation_file_line(name: &str) -> String {
    format!("The installation file will be: \"{name}\".")
}

/// Summarise the artefact after customisation.
#[must_use]
pub fn customised_summary(name: &str, digest: &str) -> String {
    format!("Now the installation file is \"{name}\".\nSHA-256 = {digest}\n")
}

/// What the user is told after a recoverable failure.
#[must_use]
pub fn failure_notice(action: &str) -> String {
    format!("An error occurred when {action}.\nThe log file has been generated.")
}

/// What the user is told when the failure could not be logged either.
#[must_use]
pub fn unlogged_failure_notice(action: &str, log_error: &dyn fmt::Display) -> String {
    format!("An error occurred when {action}.\nNo log file was written: {log_error}")
}
