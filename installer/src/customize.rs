//! Interactive overrides for the artefact defaults.
//!
//! Prompting and applying are split: [`prompt_overrides`] gathers validated
//! answers from the console, and [`Overrides::apply`] turns them into new
//! [`ArtefactDefaults`] without touching the console.

use crate::artefact::error::ArtefactError;
use crate::artefact::sha256_digest::Sha256Digest;
use crate::artefact::spec::{ArtefactDefaults, InstallerSuffix, validate_url, validate_version};
use crate::confirm::{Confirmation, confirm};
use crate::console::Console;
use crate::output::customised_summary;
use std::io;

const VERSION_PROMPT: &str = "What version of JDK do you want to install?\n(number only) >>> ";
const SUFFIX_PROMPT: &str = "Input the suffix for the installation file:\n(excluding the dot) >>> ";
const DIGEST_PROMPT: &str = "Input the SHA-256 value of the JDK installation file:\n>>> ";
const URL_PROMPT: &str = " >>> ";

/// Validated answers from the customisation prompts.
///
/// `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// New JDK version.
    pub version: Option<String>,
    /// New installer suffix.
    pub suffix: Option<InstallerSuffix>,
    /// New expected digest.
    pub digest: Option<Sha256Digest>,
    /// Explicit download URL.
    pub url: Option<String>,
}

impl Overrides {
    /// Layer the overrides over `defaults`.
    ///
    /// The artefact name and derived URL follow the new version and suffix
    /// automatically, because both are computed from `defaults` on demand.
    /// A configured URL names one particular file, so it is dropped when the
    /// version or suffix changes and no new URL was given.
    ///
    /// # Examples
    ///
    /// ```
    /// use nether_portal::artefact::spec::ArtefactDefaults;
    /// use nether_portal::customize::Overrides;
    ///
    /// let overrides = Overrides {
    ///     version: Some("21".to_owned()),
    ///     ..Overrides::default()
    /// };
    /// let defaults = overrides.apply(ArtefactDefaults::default());
    /// assert_eq!(defaults.artefact_name(), "jdk-21_windows-x64_bin.exe");
    /// ```
    #[must_use]
    pub fn apply(self, defaults: ArtefactDefaults) -> ArtefactDefaults {
        let url = match self.url {
            Some(url) => Some(url),
            None if self.retargets() => None,
            None => defaults.url,
        };
        ArtefactDefaults {
            version: self.version.unwrap_or(defaults.version),
            suffix: self.suffix.unwrap_or(defaults.suffix),
            digest: self.digest.unwrap_or(defaults.digest),
            url,
        }
    }

    /// Whether these overrides point at a different installer file.
    #[must_use]
    pub fn retargets(&self) -> bool {
        self.version.is_some() || self.suffix.is_some()
    }

    /// Whether applying these overrides would discard `defaults.url`.
    #[must_use]
    pub fn drops_url_of(&self, defaults: &ArtefactDefaults) -> bool {
        defaults.url.is_some() && self.url.is_none() && self.retargets()
    }
}

/// Ask for a version, suffix, digest, and URL.
///
/// A blank version or suffix keeps the current one. The digest is only
/// asked for when the version or suffix actually changed, and is then
/// mandatory. Invalid answers are reported and asked again.
///
/// # Errors
///
/// Returns any console I/O error, and [`io::ErrorKind::UnexpectedEof`]
/// when input closes before a required answer.
pub fn prompt_overrides(
    console: &mut dyn Console,
    current: &ArtefactDefaults,
) -> io::Result<Overrides> {
    let version = ask_valid(console, VERSION_PROMPT, Blank::Keep, |value| {
        validate_version(value).map(|()| value.to_owned())
    })?
    .filter(|version| *version != current.version);
    let suffix = ask_valid(console, SUFFIX_PROMPT, Blank::Keep, |value| {
        value.parse::<InstallerSuffix>()
    })?
    .filter(|suffix| *suffix != current.suffix);

    let digest = if version.is_some() || suffix.is_some() {
        ask_valid(console, DIGEST_PROMPT, Blank::Reject, |value| {
            Sha256Digest::try_from(value)
        })?
    } else {
        None
    };

    let url_question = Confirmation::optional(
        "Do you want to set the download url?",
        "Input the download url:",
        "",
    );
    let url = if confirm(console, &url_question)?.is_accepted() {
        ask_valid(console, URL_PROMPT, Blank::Reject, |value| {
            validate_url(value.to_owned())
        })?
    } else {
        None
    };

    Ok(Overrides {
        version,
        suffix,
        digest,
        url,
    })
}

/// Run the customisation dialogue and return the updated defaults.
///
/// # Errors
///
/// See [`prompt_overrides`].
pub fn customize(
    console: &mut dyn Console,
    defaults: ArtefactDefaults,
) -> io::Result<ArtefactDefaults> {
    console.say("Enable custom options.");
    let overrides = prompt_overrides(console, &defaults)?;
    log::debug!("customisation overrides: {overrides:?}");
    if overrides.drops_url_of(&defaults) {
        let stale = defaults.url.as_deref().unwrap_or_default();
        console.say(&format!(
            "The configured download url \"{stale}\" is for another file and will not be used."
        ));
    }
    let customised = overrides.apply(defaults);
    console.say(&customised_summary(
        &customised.artefact_name(),
        customised.digest.as_str(),
    ));
    Ok(customised)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blank {
    Keep,
    Reject,
}

fn ask_valid<T>(
    console: &mut dyn Console,
    prompt: &str,
    blank: Blank,
    parse: impl Fn(&str) -> Result<T, ArtefactError>,
) -> io::Result<Option<T>> {
    loop {
        let Some(line) = console.ask(prompt)? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed during customisation",
            ));
        };
        let answer = line.trim();
        if answer.is_empty() && blank == Blank::Keep {
            return Ok(None);
        }
        match parse(answer) {
            Ok(value) => return Ok(Some(value)),
            Err(err) => console.say(&err.to_string()),
        }
    }
}
