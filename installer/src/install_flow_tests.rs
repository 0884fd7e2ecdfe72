//! Unit tests for the install flow.

use super::*;
use crate::artefact::download::{FetchError, MockFetcher};
use crate::artefact::sha256_digest::Sha256Digest;
use crate::diagnostics::{FileDiagnosticSink, LOG_FILE_NAME};
use crate::launch::{InstallCommand, MockProcessLauncher};
use crate::test_utils::{RecordingSink, ScriptedConsole, exit_status, sha256_hex};
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};

const CONTENT: &[u8] = b"jdk installer payload";
const URL: &str = "https://download.example/jdk-17_windows-x64_bin.exe";

struct Workspace {
    _temp: tempfile::TempDir,
    dir: Utf8PathBuf,
}

impl Workspace {
    fn artefact_path(&self, spec: &ArtefactSpec) -> Utf8PathBuf {
        self.dir.join(spec.name())
    }

    fn write(&self, spec: &ArtefactSpec, bytes: &[u8]) {
        std::fs::write(self.artefact_path(spec), bytes).expect("write artefact");
    }
}

#[fixture]
fn workspace() -> Workspace {
    let temp = tempfile::tempdir().expect("temp dir");
    let dir = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    Workspace { _temp: temp, dir }
}

fn spec_with_suffix(suffix: &str) -> ArtefactSpec {
    let digest = Sha256Digest::try_from(sha256_hex(CONTENT)).expect("digest");
    ArtefactSpec::new(
        format!("jdk-17_windows-x64_bin{suffix}"),
        digest,
        URL,
        suffix.parse().expect("suffix"),
    )
    .expect("spec")
}

fn exe_spec() -> ArtefactSpec {
    spec_with_suffix(".exe")
}

fn serving(content: &'static [u8]) -> MockFetcher {
    let mut fetcher = MockFetcher::new();
    fetcher
        .expect_fetch()
        .returning(move |_, dest| std::fs::write(dest, content).map_err(FetchError::from));
    fetcher
}

fn launcher_expecting_silent_run() -> MockProcessLauncher {
    let mut launcher = MockProcessLauncher::new();
    launcher
        .expect_run()
        .withf(InstallCommand::is_silent)
        .times(1)
        .returning(|_| Ok(exit_status(0)));
    launcher.expect_spawn().never();
    launcher
}

fn run(
    spec: &ArtefactSpec,
    workspace: &Workspace,
    fetcher: &dyn Fetcher,
    launcher: &dyn ProcessLauncher,
    sink: &dyn DiagnosticSink,
    console: &mut ScriptedConsole,
) -> Result<FlowReport> {
    let context = FlowContext {
        spec,
        workdir: &workspace.dir,
    };
    let deps = FlowDeps {
        fetcher,
        launcher,
        sink,
    };
    run_install_flow_with(&context, &deps, console)
}

#[rstest]
fn absent_artefact_is_downloaded_verified_and_installed(workspace: Workspace) {
    let spec = exe_spec();
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().times(1).returning(|url, dest| {
        assert_eq!(url, URL);
        std::fs::write(dest, CONTENT).map_err(FetchError::from)
    });
    let launcher = launcher_expecting_silent_run();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["y", "y", "n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(
        report.steps(),
        [
            FlowStep::CheckExists { present: false },
            FlowStep::ConfirmDownload { accepted: true },
            FlowStep::Fetch { succeeded: true },
            FlowStep::Verify { matched: true },
            FlowStep::ConfirmSilent { accepted: true },
            FlowStep::Install {
                silent: true,
                outcome: InstallOutcome::Success
            },
            FlowStep::Cleanup { removed: false },
        ]
    );
    assert!(sink.records().is_empty());
    assert!(workspace.artefact_path(&spec).exists());
}

#[rstest]
fn intact_artefact_is_not_downloaded_again(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, CONTENT);
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().never();
    let launcher = launcher_expecting_silent_run();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["y", "n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(report.steps().first(), Some(&FlowStep::CheckExists { present: true }));
    assert_eq!(report.fetch_count(), 0);
    assert!(console.lines().iter().any(|l| l.ends_with("found.")));
    assert!(
        console
            .lines()
            .iter()
            .any(|l| l.ends_with("integrity confirmed."))
    );
}

#[rstest]
fn declining_redownload_of_corrupt_artefact_aborts(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, b"truncated");
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().never();
    let mut launcher = MockProcessLauncher::new();
    launcher.expect_run().never();
    launcher.expect_spawn().never();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["n"]);

    let err = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console)
        .expect_err("decline should abort");

    assert!(
        matches!(&err, InstallerError::Aborted { reason } if reason.contains("incomplete file")),
        "got {err:?}"
    );
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r.contains("incomplete file")));
    assert!(console.lines().iter().any(|l| l.starts_with("Incomplete file:")));
}

#[rstest]
fn corrupt_artefact_is_downloaded_again_until_it_verifies(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, b"truncated");
    let mut fetcher = MockFetcher::new();
    let mut served = 0;
    fetcher.expect_fetch().times(2).returning(move |_, dest| {
        served += 1;
        let bytes: &[u8] = if served == 1 { b"still broken" } else { CONTENT };
        std::fs::write(dest, bytes).map_err(FetchError::from)
    });
    let launcher = launcher_expecting_silent_run();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["yes", "y", "y", "n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(report.fetch_count(), 2);
    let verifications: Vec<bool> = report
        .steps()
        .iter()
        .filter_map(|step| match step {
            FlowStep::Verify { matched } => Some(*matched),
            _ => None,
        })
        .collect();
    assert_eq!(verifications, [false, false, true]);
}

#[rstest]
fn declining_initial_download_routes_into_redownload_prompt(workspace: Workspace) {
    let spec = exe_spec();
    let fetcher = serving(CONTENT);
    let launcher = launcher_expecting_silent_run();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["n", "y", "y", "n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    let steps = report.steps();
    assert_eq!(steps.get(1), Some(&FlowStep::ConfirmDownload { accepted: false }));
    assert_eq!(steps.get(2), Some(&FlowStep::Verify { matched: false }));
    assert_eq!(steps.get(3), Some(&FlowStep::ConfirmRedownload));
    assert!(console.lines().iter().any(|l| l == "Download skipped."));
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|r| r.starts_with("checking the integrity of the file")));
}

#[rstest]
fn failed_download_is_recorded_and_offered_again(workspace: Workspace) {
    let spec = exe_spec();
    let mut fetcher = MockFetcher::new();
    let mut attempts = 0;
    fetcher.expect_fetch().times(2).returning(move |url, dest| {
        attempts += 1;
        if attempts == 1 {
            Err(FetchError::NotFound {
                url: url.to_owned(),
            })
        } else {
            std::fs::write(dest, CONTENT).map_err(FetchError::from)
        }
    });
    let launcher = launcher_expecting_silent_run();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["y", "y", "y", "n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(report.steps().get(2), Some(&FlowStep::Fetch { succeeded: false }));
    let records = sink.records();
    assert!(records.iter().any(|r| r.starts_with("downloading file") && r.contains("not found")));
    assert!(
        console
            .lines()
            .iter()
            .any(|l| l.starts_with("An error occurred when downloading file"))
    );
}

#[rstest]
#[case::msi(".msi")]
#[case::zip(".zip")]
fn non_exe_installers_never_run_silently(workspace: Workspace, #[case] suffix: &str) {
    let spec = spec_with_suffix(suffix);
    workspace.write(&spec, CONTENT);
    let fetcher = MockFetcher::new();
    let mut launcher = MockProcessLauncher::new();
    launcher.expect_run().never();
    launcher
        .expect_spawn()
        .withf(|command| !command.is_silent())
        .times(1)
        .returning(|_| Ok(()));
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(report.install(), Some((false, &InstallOutcome::Success)));
    assert!(
        !report
            .steps()
            .iter()
            .any(|step| matches!(step, FlowStep::ConfirmSilent { .. }))
    );
    assert!(!console.prompts().iter().any(|p| p.contains("silently")));
}

#[rstest]
fn declining_silent_install_opens_installer_ui(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, CONTENT);
    let fetcher = MockFetcher::new();
    let mut launcher = MockProcessLauncher::new();
    launcher.expect_run().never();
    launcher.expect_spawn().times(1).returning(|_| Ok(()));
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["n", "n"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(report.install(), Some((false, &InstallOutcome::Success)));
    assert!(
        console
            .lines()
            .iter()
            .any(|l| l == "A GUI installer will be displayed soon.")
    );
}

#[rstest]
fn failed_install_is_recorded_and_flow_continues(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, CONTENT);
    let fetcher = MockFetcher::new();
    let mut launcher = MockProcessLauncher::new();
    launcher.expect_run().times(1).returning(|_| Ok(exit_status(1)));
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["y", "y"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert!(matches!(
        report.install(),
        Some((true, InstallOutcome::Failure { .. }))
    ));
    assert!(sink.records().iter().any(|r| r.starts_with("installing the file")));
    assert_eq!(report.steps().last(), Some(&FlowStep::Cleanup { removed: true }));
}

#[rstest]
fn cleanup_removes_the_artefact(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, CONTENT);
    let fetcher = MockFetcher::new();
    let launcher = launcher_expecting_silent_run();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(["y", "y"]);

    let report = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console).expect("flow");

    assert_eq!(report.steps().last(), Some(&FlowStep::Cleanup { removed: true }));
    assert!(!workspace.artefact_path(&spec).exists());
    assert_eq!(console.lines().last().map(String::as_str), Some("Everything done."));
}

#[rstest]
fn closed_input_at_redownload_prompt_aborts(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, b"truncated");
    let fetcher = MockFetcher::new();
    let launcher = MockProcessLauncher::new();
    let sink = RecordingSink::new();
    let mut console = ScriptedConsole::new(Vec::<&str>::new());

    let result = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console);

    assert!(matches!(result, Err(InstallerError::Aborted { .. })));
}

#[rstest]
fn unwritable_log_is_reported_instead_of_claimed(workspace: Workspace) {
    let spec = exe_spec();
    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().times(1).returning(|url, _| {
        Err(FetchError::NotFound {
            url: url.to_owned(),
        })
    });
    let launcher = MockProcessLauncher::new();
    let sink = FileDiagnosticSink::new(workspace.dir.join("no-such-dir").join(LOG_FILE_NAME));
    let mut console = ScriptedConsole::new(["y", "n"]);

    let result = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console);

    assert!(matches!(result, Err(InstallerError::Aborted { .. })));
    assert!(!sink.path().exists());
    let transcript = console.transcript();
    assert!(!transcript.contains("The log file has been generated."));
    assert!(transcript.contains("An error occurred when downloading file"));
    assert!(transcript.contains("No log file was written"));
}

#[rstest]
fn writable_log_receives_the_failure(workspace: Workspace) {
    let spec = exe_spec();
    workspace.write(&spec, b"truncated");
    let fetcher = MockFetcher::new();
    let launcher = MockProcessLauncher::new();
    let sink = FileDiagnosticSink::beside(&workspace.dir);
    let mut console = ScriptedConsole::new(["n"]);

    let result = run(&spec, &workspace, &fetcher, &launcher, &sink, &mut console);

    assert!(matches!(result, Err(InstallerError::Aborted { .. })));
    let log = std::fs::read_to_string(sink.path()).expect("read log");
    assert!(log.contains("verifying the installation file: Quitting due to incomplete file"));
    assert!(!console.transcript().contains("No log file was written"));
}
