//! Line-oriented terminal interaction.
//!
//! Every prompt and message in the installer goes through [`Console`] so the
//! whole flow can be driven from scripted input in tests.

use crate::output::write_line;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// A line-based conversation with the user.
pub trait Console {
    /// Print `prompt` without a trailing newline and read one line of input.
    ///
    /// The returned line has its line terminator removed. `Ok(None)` means
    /// the input stream is closed.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from writing the prompt or reading input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Print one line of output. Write failures are ignored.
    fn say(&mut self, message: &str);
}

/// A [`Console`] over any buffered reader and writer.
///
/// # Examples
///
/// ```
/// use nether_portal::console::{Console, IoConsole};
/// use std::io::Cursor;
///
/// let mut console = IoConsole::new(Cursor::new("y\n"), Vec::new());
/// let answer = console.ask("Continue? ").unwrap();
/// assert_eq!(answer.as_deref(), Some("y"));
/// assert_eq!(console.into_output(), b"Continue? ");
/// ```
#[derive(Debug)]
pub struct IoConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    /// Wrap the given reader and writer.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the console and return the writer.
    #[must_use]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl IoConsole<StdinLock<'static>, Stdout> {
    /// A console over the process's standard input and output.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn say(&mut self, message: &str) {
        write_line(&mut self.output, message);
    }
}

/// Wait for Enter so a console window opened by double-click stays visible.
pub fn pause(console: &mut dyn Console) {
    if let Err(err) = console.ask("Press Enter to exit...") {
        log::debug!("pause prompt failed: {err}");
    }
}
