//! Artefact identity: what to download, what it should hash to, and where
//! it comes from.
//!
//! [`ArtefactDefaults`] holds the editable inputs (JDK version, installer
//! suffix, digest, optional URL override). [`ArtefactDefaults::build`]
//! derives the immutable [`ArtefactSpec`] that the install flow consumes.

use super::error::{ArtefactError, Result};
use super::sha256_digest::{Sha256Digest, is_lowercase_sha256};
use std::fmt;

/// JDK version installed when nothing else is configured.
pub const DEFAULT_VERSION: &str = "17";

/// Installer suffix used when nothing else is configured.
pub const DEFAULT_SUFFIX: &str = ".exe";

/// SHA-256 of `jdk-17_windows-x64_bin.exe` as published by Oracle.
pub const DEFAULT_SHA256: &str = "4d1d6ec3976fd20bcc34db8fd7cfbe1a8cdd93a0c33182af13b31cd1feef423d";
const _: () = assert!(is_lowercase_sha256(DEFAULT_SHA256));

/// Suffix of the only installer format that accepts an unattended flag.
const UNATTENDED_SUFFIX: &str = ".exe";

/// A validated installer file suffix, always stored with its leading dot.
///
/// # Examples
///
/// ```
/// use nether_portal::artefact::spec::InstallerSuffix;
///
/// let suffix: InstallerSuffix = "msi".parse().unwrap();
/// assert_eq!(suffix.as_str(), ".msi");
/// assert!(!suffix.supports_unattended());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallerSuffix(String);

impl InstallerSuffix {
    /// Return the suffix including its leading dot.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return whether installers of this format can run with the silent flag.
    ///
    /// Only self-executing `.exe` installers are driven unattended; `.msi`
    /// packages fail under the same invocation and are always run with
    /// their own UI.
    #[must_use]
    pub fn supports_unattended(&self) -> bool {
        self.0.eq_ignore_ascii_case(UNATTENDED_SUFFIX)
    }
}

impl std::str::FromStr for InstallerSuffix {
    type Err = ArtefactError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let extension = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if extension.is_empty() {
            return Err(ArtefactError::InvalidSuffix {
                value: value.to_owned(),
                reason: "suffix must not be empty".to_owned(),
            });
        }
        if let Some(bad) = extension.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(ArtefactError::InvalidSuffix {
                value: value.to_owned(),
                reason: format!("unexpected character '{bad}'"),
            });
        }
        Ok(Self(format!(".{extension}")))
    }
}

impl fmt::Display for InstallerSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fully resolved artefact the install flow works on.
///
/// Built once at startup and never mutated afterwards. The name is always a
/// bare file name, resolved against the program directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactSpec {
    name: String,
    digest: Sha256Digest,
    url: String,
    suffix: InstallerSuffix,
}

impl ArtefactSpec {
    /// Construct a spec after validating the name and URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::InvalidName`] when `name` is empty or
    /// contains a path separator, and [`ArtefactError::InvalidUrl`] when
    /// `url` is not HTTP(S).
    pub fn new(
        name: impl Into<String>,
        digest: Sha256Digest,
        url: impl Into<String>,
        suffix: InstallerSuffix,
    ) -> Result<Self> {
        let name = validate_name(name.into())?;
        let url = validate_url(url.into())?;
        Ok(Self {
            name,
            digest,
            url,
            suffix,
        })
    }

    /// The artefact file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The digest the downloaded file must match.
    #[must_use]
    pub fn digest(&self) -> &Sha256Digest {
        &self.digest
    }

    /// Where the artefact is downloaded from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The installer format.
    #[must_use]
    pub fn suffix(&self) -> &InstallerSuffix {
        &self.suffix
    }
}

/// Editable artefact inputs, before the name and URL are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactDefaults {
    /// JDK major version (digits and dots only).
    pub version: String,
    /// Installer format.
    pub suffix: InstallerSuffix,
    /// Expected SHA-256 of the installer.
    pub digest: Sha256Digest,
    /// Explicit download URL; derived from the version when absent.
    pub url: Option<String>,
}

impl Default for ArtefactDefaults {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_owned(),
            suffix: InstallerSuffix(DEFAULT_SUFFIX.to_owned()),
            digest: Sha256Digest::from_checked(DEFAULT_SHA256),
            url: None,
        }
    }
}

impl ArtefactDefaults {
    /// The installer file name for the configured version and suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use nether_portal::artefact::spec::ArtefactDefaults;
    ///
    /// let defaults = ArtefactDefaults::default();
    /// assert_eq!(defaults.artefact_name(), "jdk-17_windows-x64_bin.exe");
    /// ```
    #[must_use]
    pub fn artefact_name(&self) -> String {
        format!("jdk-{}_windows-x64_bin{}", self.version, self.suffix)
    }

    /// The Oracle download URL for the configured version and name.
    #[must_use]
    pub fn default_url(&self) -> String {
        format!(
            "https://download.oracle.com/java/{}/latest/{}",
            self.version,
            self.artefact_name()
        )
    }

    /// Derive the immutable [`ArtefactSpec`].
    ///
    /// # Errors
    ///
    /// Returns an [`ArtefactError`] when the version is malformed or an
    /// explicit URL is not HTTP(S).
    pub fn build(&self) -> Result<ArtefactSpec> {
        validate_version(&self.version)?;
        let url = self.url.clone().unwrap_or_else(|| self.default_url());
        ArtefactSpec::new(
            self.artefact_name(),
            self.digest.clone(),
            url,
            self.suffix.clone(),
        )
    }
}

/// Validate a JDK version string: digits and dots, starting with a digit.
///
/// # Errors
///
/// Returns [`ArtefactError::InvalidVersion`] describing the first problem.
pub fn validate_version(value: &str) -> Result<()> {
    let starts_with_digit = value.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !starts_with_digit {
        return Err(ArtefactError::InvalidVersion {
            value: value.to_owned(),
            reason: "version must start with a digit".to_owned(),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
        return Err(ArtefactError::InvalidVersion {
            value: value.to_owned(),
            reason: format!("unexpected character '{bad}'"),
        });
    }
    Ok(())
}

/// Validate that `value` is an HTTP(S) URL, returning it trimmed.
///
/// # Errors
///
/// Returns [`ArtefactError::InvalidUrl`] otherwise.
pub fn validate_url(value: String) -> Result<String> {
    let trimmed = value.trim();
    let has_host = ["http://", "https://"]
        .iter()
        .filter_map(|scheme| trimmed.strip_prefix(scheme))
        .any(|rest| !rest.is_empty());
    if has_host {
        Ok(trimmed.to_owned())
    } else {
        Err(ArtefactError::InvalidUrl { value })
    }
}

fn validate_name(value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ArtefactError::InvalidName {
            value,
            reason: "name must not be empty".to_owned(),
        });
    }
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ArtefactError::InvalidName {
            value,
            reason: "name must be a bare file name".to_owned(),
        });
    }
    Ok(value)
}
