//! The download, verify, install, and clean-up sequence.
//!
//! The flow is re-entrant with respect to the filesystem: an artefact left
//! behind by an earlier run is verified instead of downloaded again, and a
//! corrupt one is offered for re-download until it verifies or the user
//! gives up.
//!
//! ```text
//! CheckExists -> [ConfirmDownload -> Fetch] -> Verify -> [ConfirmSilent] -> Install -> Cleanup
//!                                                 ^   |
//!                                                 |   v mismatch
//!                                   Fetch <- ConfirmRedownload -> no: Aborted
//! ```
//!
//! Download, integrity, launch, and removal failures are recorded in the
//! [`DiagnosticSink`] and reported to the user; they never end the run on
//! their own. Only a declined re-download does.

use crate::artefact::download::{Fetcher, HttpFetcher};
use crate::artefact::spec::ArtefactSpec;
use crate::artefact::verification::{IntegrityCheck, check_integrity};
use crate::confirm::{Confirmation, ConfirmationOutcome, confirm};
use crate::console::Console;
use crate::diagnostics::DiagnosticSink;
use crate::error::{InstallerError, Result};
use crate::launch::{InstallOutcome, ProcessLauncher, SystemLauncher, install_artefact};
use crate::output::{failure_notice, unlogged_failure_notice};
use camino::Utf8Path;
use std::path::PathBuf;

/// What the flow operates on.
#[derive(Debug, Clone, Copy)]
pub struct FlowContext<'a> {
    /// The artefact to install.
    pub spec: &'a ArtefactSpec,
    /// Directory the artefact is stored in.
    pub workdir: &'a Utf8Path,
}

/// Side-effecting collaborators of the flow.
#[derive(Clone, Copy)]
pub struct FlowDeps<'a> {
    /// Downloads the artefact.
    pub fetcher: &'a dyn Fetcher,
    /// Starts the installer.
    pub launcher: &'a dyn ProcessLauncher,
    /// Receives failure records.
    pub sink: &'a dyn DiagnosticSink,
}

/// One step taken by the flow, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    /// Looked for the artefact in the working directory.
    CheckExists {
        /// Whether a file with the artefact name was found.
        present: bool,
    },
    /// Asked whether to download a missing artefact.
    ConfirmDownload {
        /// Whether the user agreed.
        accepted: bool,
    },
    /// Downloaded the artefact.
    Fetch {
        /// Whether the transfer completed without error.
        succeeded: bool,
    },
    /// Hashed the artefact and compared it to the expected digest.
    Verify {
        /// Whether the digest matched.
        matched: bool,
    },
    /// The user agreed to download a corrupt artefact again.
    ConfirmRedownload,
    /// Asked whether to install without the installer's UI.
    ConfirmSilent {
        /// Whether the user agreed.
        accepted: bool,
    },
    /// Started the installer.
    Install {
        /// Whether the unattended flag was passed.
        silent: bool,
        /// What happened.
        outcome: InstallOutcome,
    },
    /// Asked whether to delete the artefact.
    Cleanup {
        /// Whether the file was removed.
        removed: bool,
    },
}

/// The ordered steps of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowReport {
    steps: Vec<FlowStep>,
}

impl FlowReport {
    /// Steps in the order they were taken.
    #[must_use]
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    /// Number of download attempts.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, FlowStep::Fetch { .. }))
            .count()
    }

    /// The install step, if the flow got that far.
    #[must_use]
    pub fn install(&self) -> Option<(bool, &InstallOutcome)> {
        self.steps.iter().find_map(|step| match step {
            FlowStep::Install { silent, outcome } => Some((*silent, outcome)),
            _ => None,
        })
    }

    fn push(&mut self, step: FlowStep) {
        log::debug!("install flow step: {step:?}");
        self.steps.push(step);
    }
}

/// Run the flow with the HTTP fetcher and the system process launcher.
///
/// # Errors
///
/// See [`run_install_flow_with`].
pub fn run_install_flow(
    context: &FlowContext<'_>,
    sink: &dyn DiagnosticSink,
    console: &mut dyn Console,
) -> Result<FlowReport> {
    let deps = FlowDeps {
        fetcher: &HttpFetcher,
        launcher: &SystemLauncher,
        sink,
    };
    run_install_flow_with(context, &deps, console)
}

/// Run the flow with injected collaborators.
///
/// # Errors
///
/// Returns [`InstallerError::Aborted`] when the user declines to download a
/// corrupt artefact again, and [`InstallerError::Io`] when the console
/// fails.
pub fn run_install_flow_with(
    context: &FlowContext<'_>,
    deps: &FlowDeps<'_>,
    console: &mut dyn Console,
) -> Result<FlowReport> {
    let run = FlowRun {
        spec: context.spec,
        path: context.workdir.join(context.spec.name()).into_std_path_buf(),
        deps,
    };
    let mut report = FlowReport::default();

    run.acquire(console, &mut report)?;
    run.verify_until_intact(console, &mut report)?;
    run.install(console, &mut report)?;
    run.clean_up(console, &mut report)?;
    Ok(report)
}

struct FlowRun<'a> {
    spec: &'a ArtefactSpec,
    path: PathBuf,
    deps: &'a FlowDeps<'a>,
}

impl FlowRun<'_> {
    fn name(&self) -> &str {
        self.spec.name()
    }

    fn acquire(&self, console: &mut dyn Console, report: &mut FlowReport) -> Result<()> {
        let name = self.name();
        let present = self.path.is_file();
        report.push(FlowStep::CheckExists { present });
        if present {
            console.say(&format!("File \"{name}\" found."));
            return Ok(());
        }

        console.say(&format!("File \"{name}\" not found!"));
        let question = Confirmation::optional(
            "Do you want to download it now?",
            format!("Downloading the file \"{name}\", please wait..."),
            "Download skipped",
        );
        let accepted = confirm(console, &question)?.is_accepted();
        report.push(FlowStep::ConfirmDownload { accepted });
        if accepted {
            self.fetch(console, report);
        }
        Ok(())
    }

    fn verify_until_intact(
        &self,
        console: &mut dyn Console,
        report: &mut FlowReport,
    ) -> Result<()> {
        let name = self.name();
        loop {
            let matched = self.verify(console);
            report.push(FlowStep::Verify { matched });
            if matched {
                console.say(&format!("File \"{name}\" integrity confirmed."));
                return Ok(());
            }

            console.say(&format!("Incomplete file: \"{name}\"."));
            let question = Confirmation::required(
                "Do you want to download it again?",
                format!("Re-downloading the file \"{name}\", please wait..."),
                format!("incomplete file \"{name}\""),
            );
            if let ConfirmationOutcome::DeclinedFatal { reason } = confirm(console, &question)? {
                let err = InstallerError::Aborted { reason };
                let logged = self.deps.sink.record("verifying the installation file", &err);
                if let Err(log_err) = logged {
                    console.say(&format!("No log file was written: {log_err}"));
                }
                return Err(err);
            }
            report.push(FlowStep::ConfirmRedownload);
            self.fetch(console, report);
        }
    }

    fn install(&self, console: &mut dyn Console, report: &mut FlowReport) -> Result<()> {
        let silent = if self.spec.suffix().supports_unattended() {
            let question = Confirmation::optional(
                "Do you want to install JDK silently?",
                "The installation will be automatic and silent.",
                "A GUI installer will be displayed soon",
            );
            let accepted = confirm(console, &question)?.is_accepted();
            report.push(FlowStep::ConfirmSilent { accepted });
            accepted
        } else {
            log::debug!(
                "{} installers cannot run unattended; using the installer UI",
                self.spec.suffix()
            );
            false
        };

        console.say(if silent {
            "JDK is installing, please wait..."
        } else {
            "Check the GUI that is displayed."
        });
        let outcome = install_artefact(self.deps.launcher, &self.path, silent);
        match &outcome {
            InstallOutcome::Success => console.say(if silent {
                "Installation success."
            } else {
                "Installation started."
            }),
            InstallOutcome::Failure { detail } => {
                let action = format!("installing the file \"{}\"", self.name());
                self.report_failure(console, &action, detail);
            }
        }
        report.push(FlowStep::Install { silent, outcome });
        Ok(())
    }

    fn clean_up(&self, console: &mut dyn Console, report: &mut FlowReport) -> Result<()> {
        let name = self.name();
        let question = Confirmation::optional(
            format!("Do you want to remove the file \"{name}\"?"),
            format!("Removing the file \"{name}\"..."),
            "Everything done",
        );
        if !confirm(console, &question)?.is_accepted() {
            report.push(FlowStep::Cleanup { removed: false });
            return Ok(());
        }

        let removed = match std::fs::remove_file(&self.path) {
            Ok(()) => {
                console.say(&format!("File \"{name}\" has been removed."));
                true
            }
            Err(err) => {
                self.report_failure(console, &format!("removing the file \"{name}\""), &err);
                false
            }
        };
        console.say("Everything done.");
        report.push(FlowStep::Cleanup { removed });
        Ok(())
    }

    fn fetch(&self, console: &mut dyn Console, report: &mut FlowReport) {
        let name = self.name();
        let succeeded = match self.deps.fetcher.fetch(self.spec.url(), &self.path) {
            Ok(()) => {
                console.say(&format!("The file \"{name}\" was successfully downloaded."));
                true
            }
            Err(err) => {
                self.report_failure(console, &format!("downloading file \"{name}\""), &err);
                false
            }
        };
        report.push(FlowStep::Fetch { succeeded });
    }

    fn verify(&self, console: &mut dyn Console) -> bool {
        match check_integrity(&self.path, self.spec.digest()) {
            Ok(IntegrityCheck::Match) => true,
            Ok(IntegrityCheck::Mismatch { actual }) => {
                log::debug!(
                    "{} hashed to {actual}, expected {}",
                    self.path.display(),
                    self.spec.digest()
                );
                false
            }
            Err(err) => {
                let action = format!("checking the integrity of the file \"{}\"", self.name());
                self.report_failure(console, &action, &err);
                false
            }
        }
    }

    fn report_failure(
        &self,
        console: &mut dyn Console,
        action: &str,
        error: &dyn std::fmt::Display,
    ) {
        match self.deps.sink.record(action, error) {
            Ok(()) => console.say(&failure_notice(action)),
            Err(log_err) => console.say(&unlogged_failure_notice(action, &log_err)),
        }
    }
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
