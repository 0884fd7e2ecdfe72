//! Error log written next to the program.
//!
//! Recoverable failures (network, file, launch) are recorded here before the
//! user sees a one-line summary. Records go through a `tracing-subscriber`
//! formatter whose writer appends to [`LOG_FILE_NAME`]; the file is only
//! created once something is written.
//!
//! The same subscriber backs the `log` facade once
//! [`FileDiagnosticSink::install_global`] has run, so `log::error!` calls
//! elsewhere in the crate land in the same file.

use camino::Utf8Path;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// File name of the error log, created beside the program.
pub const LOG_FILE_NAME: &str = "logfile.log";

/// Environment variable that widens what reaches the log file.
///
/// Uses `EnvFilter` syntax, for example `NETHER_PORTAL_LOG=debug`.
/// Diagnostic records are written whatever the filter says.
pub const LOG_FILTER_ENV: &str = "NETHER_PORTAL_LOG";

/// Timestamp layout, e.g. `2024-01-31 09:15:02,123`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Destination for error records.
pub trait DiagnosticSink {
    /// Record that `error` happened while doing `context`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the record could not be stored, so the
    /// caller can tell the user instead.
    fn record(&self, context: &str, error: &dyn fmt::Display) -> io::Result<()>;
}

/// A [`DiagnosticSink`] that appends formatted records to a log file.
#[derive(Clone)]
pub struct FileDiagnosticSink {
    log: LogFile,
    dispatch: Dispatch,
}

impl fmt::Debug for FileDiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDiagnosticSink")
            .field("path", &self.log.path)
            .finish_non_exhaustive()
    }
}

impl FileDiagnosticSink {
    /// A sink appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let log = LogFile::new(path.into());
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(log_filter())
            .with_writer(log.clone())
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_owned()))
            .finish();
        Self {
            log,
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// A sink appending to [`LOG_FILE_NAME`] inside `dir`.
    #[must_use]
    pub fn beside(dir: &Utf8Path) -> Self {
        Self::new(dir.join(LOG_FILE_NAME).into_std_path_buf())
    }

    /// The log file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log.path
    }

    /// Make this sink's subscriber the process-wide default and route the
    /// `log` facade into it.
    ///
    /// # Errors
    ///
    /// Fails when a global subscriber or logger is already installed.
    pub fn install_global(&self) -> Result<(), TryInitError> {
        self.dispatch.clone().try_init()
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn record(&self, context: &str, error: &dyn fmt::Display) -> io::Result<()> {
        // One record per line.
        let message = error.to_string().replace(['\r', '\n'], " ");
        self.log.clear_failure();
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::error!("{context}: {message}");
        });
        self.log.take_failure().map_or(Ok(()), Err)
    }
}

/// Always let diagnostic records through, on top of the user's filter.
fn log_filter() -> EnvFilter {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    match format!("{}=error", module_path!()).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Lazily opened append-only log file that remembers the last write error.
#[derive(Debug, Clone)]
struct LogFile {
    path: PathBuf,
    failure: Arc<Mutex<Option<io::Error>>>,
}

impl LogFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            failure: Arc::new(Mutex::new(None)),
        }
    }

    fn clear_failure(&self) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = None;
        }
    }

    fn take_failure(&self) -> Option<io::Error> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }

    fn note_failure(&self, err: &io::Error) {
        if let Ok(mut slot) = self.failure.lock() {
            *slot = Some(io::Error::new(
                err.kind(),
                format!("could not write {}: {err}", self.path.display()),
            ));
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter {
            log: self,
            file: None,
        }
    }
}

/// Writer handed to the formatter for a single event.
struct LogFileWriter<'a> {
    log: &'a LogFile,
    file: Option<File>,
}

impl LogFileWriter<'_> {
    fn file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log.path)?,
        };
        Ok(self.file.insert(file))
    }

    fn noted<T>(&self, result: io::Result<T>) -> io::Result<T> {
        if let Err(err) = &result {
            self.log.note_failure(err);
        }
        result
    }
}

impl Write for LogFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.file().and_then(|file| file.write(buf));
        self.noted(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        };
        self.noted(result)
    }
}
