//! Nether Portal CLI entrypoint.
//!
//! This binary installs the Oracle JDK next to itself: it downloads the
//! installer when missing, checks its SHA-256, runs it, and optionally
//! removes it afterwards. The window stays open until Enter is pressed.

use camino::Utf8Path;
use clap::Parser;
use nether_portal::cli::Cli;
use nether_portal::config::load_defaults;
use nether_portal::console::{Console, IoConsole, pause};
use nether_portal::customize::customize;
use nether_portal::diagnostics::{DiagnosticSink, FileDiagnosticSink};
use nether_portal::error::Result;
use nether_portal::install_flow::{FlowContext, run_install_flow};
use nether_portal::welcome::welcome;
use nether_portal::workdir::enter_program_directory;

fn main() {
    let cli = Cli::parse();
    let mut console = IoConsole::stdio();
    let run_result = enter_program_directory().and_then(|dir| {
        let sink = FileDiagnosticSink::beside(&dir);
        if let Err(err) = sink.install_global() {
            console.say(&format!("Logging is unavailable: {err}"));
        }
        run(&cli, &dir, &sink, &mut console)
    });
    let exit_code = exit_code_for_run_result(run_result, &mut console);
    pause(&mut console);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(
    cli: &Cli,
    dir: &Utf8Path,
    sink: &dyn DiagnosticSink,
    console: &mut dyn Console,
) -> Result<()> {
    let mut defaults = load_defaults(dir)?;

    // Step 1: Greet, and find out whether customisation was asked for
    let customising = welcome(
        console,
        env!("CARGO_PKG_VERSION"),
        &defaults.artefact_name(),
        cli.enable_cli,
    )?;

    // Step 2: Apply interactive overrides
    if customising {
        defaults = customize(console, defaults)?;
    }

    // Step 3: Freeze the artefact and run the install flow
    let spec = defaults.build()?;
    let context = FlowContext {
        spec: &spec,
        workdir: dir,
    };
    let report = run_install_flow(&context, sink, console)?;
    log::debug!("install flow finished after {} steps", report.steps().len());
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, console: &mut dyn Console) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            console.say(&err.to_string());
            1
        }
    }
}
