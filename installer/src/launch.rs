//! Running the downloaded installer.
//!
//! A silent install runs the installer with [`SILENT_FLAG`] and waits for
//! its exit status. An interactive install starts the installer and returns
//! immediately, leaving the user with the installer's own window.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Unattended-install flag understood by the JDK `.exe` installer.
pub const SILENT_FLAG: &str = "/s";

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// The program to execute.
    pub program: OsString,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl InstallCommand {
    /// Build the shell invocation for `artefact`.
    ///
    /// On Windows the installer is started through `cmd /C` so that
    /// non-executable formats such as `.msi` open through their file
    /// association. Elsewhere the artefact is executed directly.
    #[must_use]
    pub fn for_artefact(artefact: &Path, silent: bool) -> Self {
        let mut args: Vec<OsString> = Vec::new();
        let program = if cfg!(windows) {
            args.push(OsString::from("/C"));
            args.push(artefact.as_os_str().to_owned());
            OsString::from("cmd")
        } else {
            artefact.as_os_str().to_owned()
        };
        if silent {
            args.push(OsString::from(SILENT_FLAG));
        }
        Self { program, args }
    }

    /// Return whether the unattended flag is present.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.args.iter().any(|arg| arg == SILENT_FLAG)
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Abstraction over starting operating-system processes.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessLauncher {
    /// Run `command` to completion and return its exit status.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while spawning or waiting.
    fn run(&self, command: &InstallCommand) -> io::Result<ExitStatus>;

    /// Start `command` without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while spawning.
    fn spawn(&self, command: &InstallCommand) -> io::Result<()>;
}

/// Launches processes on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn run(&self, command: &InstallCommand) -> io::Result<ExitStatus> {
        Command::new(&command.program).args(&command.args).status()
    }

    fn spawn(&self, command: &InstallCommand) -> io::Result<()> {
        Command::new(&command.program)
            .args(&command.args)
            .spawn()
            .map(|child| {
                log::debug!("installer started with pid {}", child.id());
            })
    }
}

/// What happened when the installer was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// A silent install exited successfully, or an interactive one started.
    Success,
    /// The installer could not be started, or a silent install failed.
    Failure {
        /// Human-readable description of the failure.
        detail: String,
    },
}

impl InstallOutcome {
    /// Return whether the install succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Start the installer at `artefact`, silently or with its own UI.
///
/// Never returns an error: every failure becomes
/// [`InstallOutcome::Failure`] for the caller to report.
#[must_use]
pub fn install_artefact(
    launcher: &dyn ProcessLauncher,
    artefact: &Path,
    silent: bool,
) -> InstallOutcome {
    let command = InstallCommand::for_artefact(artefact, silent);
    log::debug!("launching installer: {command}");
    if silent {
        match launcher.run(&command) {
            Ok(status) if status.success() => InstallOutcome::Success,
            Ok(status) => InstallOutcome::Failure {
                detail: format!("`{command}` exited with {status}"),
            },
            Err(err) => InstallOutcome::Failure {
                detail: format!("could not run `{command}`: {err}"),
            },
        }
    } else {
        match launcher.spawn(&command) {
            Ok(()) => InstallOutcome::Success,
            Err(err) => InstallOutcome::Failure {
                detail: format!("could not start `{command}`: {err}"),
            },
        }
    }
}
