//! Installer download over HTTP(S).
//!
//! Provides a trait-based abstraction for fetching the installer to a local
//! path, enabling dependency injection for testing.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Connection timeout for installer downloads.
///
/// Only the connection is bounded; the transfer itself has no deadline.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for retrieving a remote resource to a local file.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```no_run
/// use nether_portal::artefact::download::{Fetcher, HttpFetcher};
/// use std::path::Path;
///
/// HttpFetcher.fetch("https://example.com/jdk.exe", Path::new("jdk.exe"))?;
/// # Ok::<(), nether_portal::artefact::download::FetchError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// Download `url` into `dest`, replacing any existing file.
    ///
    /// After a failure the destination may be missing or truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the file write fails.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Errors arising from download operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested file was not found (HTTP 404).
    #[error("installer not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based fetcher using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        log::debug!("fetching {url} into {}", dest.display());
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut response.into_body().as_reader(), &mut file)?;
        Ok(())
    }
}

/// Shared `ureq` agent with connect timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
