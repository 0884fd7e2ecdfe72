//! Optional configuration file beside the program.
//!
//! `nether-portal.toml` may override any of the compiled-in artefact
//! defaults. Every key is optional; a missing file means "use the defaults".
//!
//! ```toml
//! version = "21"
//! suffix = "msi"
//! sha256 = "…64 hex characters…"
//! url = "https://mirror.example/jdk-21_windows-x64_bin.msi"
//! ```

use crate::artefact::error::ArtefactError;
use crate::artefact::sha256_digest::Sha256Digest;
use crate::artefact::spec::{ArtefactDefaults, validate_url, validate_version};
use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use serde::Deserialize;

/// File name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "nether-portal.toml";

/// Raw contents of the configuration file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// JDK version, e.g. `"21"`.
    pub version: Option<String>,
    /// Installer suffix, with or without the leading dot.
    pub suffix: Option<String>,
    /// Expected SHA-256 of the installer.
    pub sha256: Option<String>,
    /// Download URL overriding the Oracle default.
    pub url: Option<String>,
}

impl FileConfig {
    /// Layer these settings over `defaults`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArtefactError`] for the first invalid value.
    ///
    /// # Examples
    ///
    /// ```
    /// use nether_portal::artefact::spec::ArtefactDefaults;
    /// use nether_portal::config::FileConfig;
    ///
    /// let config: FileConfig = toml::from_str("version = \"21\"").unwrap();
    /// let defaults = config.apply(ArtefactDefaults::default()).unwrap();
    /// assert_eq!(defaults.artefact_name(), "jdk-21_windows-x64_bin.exe");
    /// ```
    pub fn apply(self, defaults: ArtefactDefaults) -> std::result::Result<ArtefactDefaults, ArtefactError> {
        let mut merged = defaults;
        if let Some(version) = self.version {
            let version = version.trim().to_owned();
            validate_version(&version)?;
            merged.version = version;
        }
        if let Some(suffix) = self.suffix {
            merged.suffix = suffix.parse()?;
        }
        if let Some(sha256) = self.sha256 {
            merged.digest = Sha256Digest::try_from(sha256)?;
        }
        if let Some(url) = self.url {
            merged.url = Some(validate_url(url)?);
        }
        Ok(merged)
    }
}

/// Load the artefact defaults, applying `nether-portal.toml` from `dir`
/// when it exists.
///
/// # Errors
///
/// Returns [`InstallerError::Config`] when the file cannot be read or
/// parsed, and [`InstallerError::Artefact`] when it holds invalid values.
pub fn load_defaults(dir: &Utf8Path) -> Result<ArtefactDefaults> {
    let path = dir.join(CONFIG_FILE_NAME);
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no configuration file at {path}; using defaults");
            return Ok(ArtefactDefaults::default());
        }
        Err(err) => {
            return Err(InstallerError::Config {
                path,
                reason: err.to_string(),
            });
        }
    };
    let config: FileConfig = toml::from_str(&source).map_err(|err| InstallerError::Config {
        path: path.clone(),
        reason: err.to_string(),
    })?;
    log::debug!("loaded configuration from {path}");
    Ok(config.apply(ArtefactDefaults::default())?)
}
