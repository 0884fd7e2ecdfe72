//! Startup greeting and the hidden customisation switch.

use crate::console::Console;
use crate::output::{BANNER, installation_file_line, welcome_text};
use std::io;

/// Typing this at the "press Enter" prompt turns on customisation.
pub const ENABLE_CLI_FLAG: &str = "--enable-cli";

const CONTINUE_PROMPT: &str = "Input \"Enter\" to continue...\n";

/// Greet the user and decide whether customisation mode is on.
///
/// When `enable_cli` is already set the user is not asked to press Enter.
/// Otherwise the typed line is checked for [`ENABLE_CLI_FLAG`]; a closed
/// input stream simply continues without customisation.
///
/// # Errors
///
/// Returns any console I/O error.
pub fn welcome(
    console: &mut dyn Console,
    version: &str,
    artefact_name: &str,
    enable_cli: bool,
) -> io::Result<bool> {
    console.say(BANNER.trim_end_matches('\n'));
    console.say(&welcome_text(version));
    console.say(&installation_file_line(artefact_name));
    if enable_cli {
        return Ok(true);
    }
    let escalated = console
        .ask(CONTINUE_PROMPT)?
        .is_some_and(|line| line.to_ascii_lowercase().contains(ENABLE_CLI_FLAG));
    if escalated {
        log::debug!("customisation enabled from the continue prompt");
    }
    Ok(escalated)
}
