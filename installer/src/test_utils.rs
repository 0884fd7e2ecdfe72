//! Shared test utilities for the installer crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour tests under `tests/`.

use crate::artefact::download::{FetchError, Fetcher};
use crate::console::Console;
use crate::diagnostics::DiagnosticSink;
use crate::launch::{InstallCommand, ProcessLauncher};
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::ExitStatus;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// A [`Console`] that answers prompts from a script and records output.
///
/// Once the script runs out, every further prompt sees a closed input
/// stream.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    lines: Vec<String>,
    transcript: String,
}

impl ScriptedConsole {
    /// Creates a console that will answer with `answers`, in order.
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Every line passed to [`Console::say`].
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Every prompt passed to [`Console::ask`].
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Prompts, answers, and output interleaved as a terminal would show them.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Number of scripted answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_owned());
        self.transcript.push_str(prompt);
        let answer = self.answers.pop_front();
        if let Some(line) = &answer {
            self.transcript.push_str(line);
        }
        self.transcript.push('\n');
        Ok(answer)
    }

    fn say(&mut self, message: &str) {
        self.lines.push(message.to_owned());
        self.transcript.push_str(message);
        self.transcript.push('\n');
    }
}

/// A [`DiagnosticSink`] that keeps records in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: RefCell<Vec<String>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record as `<context>: <error>`.
    #[must_use]
    pub fn records(&self) -> Vec<String> {
        self.records.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, context: &str, error: &dyn fmt::Display) -> io::Result<()> {
        self.records.borrow_mut().push(format!("{context}: {error}"));
        Ok(())
    }
}

/// What a [`StubFetcher`] does when asked to download.
#[derive(Debug, Clone)]
pub enum StubFetch {
    /// Write these bytes to the destination.
    Serve(Vec<u8>),
    /// Fail as if the server returned 404.
    NotFound,
}

/// A [`Fetcher`] that serves canned responses in order.
///
/// Panics when asked to fetch more often than it was scripted for.
#[derive(Debug)]
pub struct StubFetcher {
    responses: RefCell<VecDeque<StubFetch>>,
    urls: RefCell<Vec<String>>,
}

impl StubFetcher {
    /// Creates a fetcher answering with `responses`, in order.
    #[must_use]
    pub fn new(responses: Vec<StubFetch>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            urls: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.urls.borrow_mut().push(url.to_owned());
        let response = self
            .responses
            .borrow_mut()
            .pop_front()
            .expect("unexpected fetch");
        match response {
            StubFetch::Serve(bytes) => {
                std::fs::write(dest, bytes)?;
                Ok(())
            }
            StubFetch::NotFound => Err(FetchError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}

/// A [`ProcessLauncher`] that records commands instead of running them.
#[derive(Debug)]
pub struct StubLauncher {
    exit_code: i32,
    commands: RefCell<Vec<InstallCommand>>,
}

impl StubLauncher {
    /// Creates a launcher whose silent runs exit with `exit_code`.
    #[must_use]
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            commands: RefCell::new(Vec::new()),
        }
    }

    /// Commands launched so far.
    #[must_use]
    pub fn commands(&self) -> Vec<InstallCommand> {
        self.commands.borrow().clone()
    }
}

impl ProcessLauncher for StubLauncher {
    fn run(&self, command: &InstallCommand) -> io::Result<ExitStatus> {
        self.commands.borrow_mut().push(command.clone());
        Ok(exit_status(self.exit_code))
    }

    fn spawn(&self, command: &InstallCommand) -> io::Result<()> {
        self.commands.borrow_mut().push(command.clone());
        Ok(())
    }
}
