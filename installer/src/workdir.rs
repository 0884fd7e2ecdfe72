//! Program-directory resolution.
//!
//! The artefact, the configuration file, and the error log all live beside
//! the executable, so the run starts by moving there.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;

/// Return the UTF-8 directory containing `executable`.
///
/// # Errors
///
/// Returns [`InstallerError::ProgramDirectory`] when the path has no parent
/// or is not valid UTF-8.
pub fn directory_of(executable: &Path) -> Result<Utf8PathBuf> {
    let parent = executable
        .parent()
        .ok_or_else(|| InstallerError::ProgramDirectory {
            reason: format!("{} has no parent directory", executable.display()),
        })?;
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    Utf8PathBuf::try_from(parent.to_path_buf()).map_err(|err| InstallerError::ProgramDirectory {
        reason: format!("non-UTF-8 path: {}", err.as_path().display()),
    })
}

/// Change the working directory to the directory of the running program and
/// return it.
///
/// # Errors
///
/// Returns [`InstallerError::ProgramDirectory`] when the executable cannot
/// be located or the directory cannot be entered.
pub fn enter_program_directory() -> Result<Utf8PathBuf> {
    let executable = std::env::current_exe().map_err(|err| InstallerError::ProgramDirectory {
        reason: format!("could not locate the executable: {err}"),
    })?;
    let dir = directory_of(&executable)?;
    enter(&dir)?;
    Ok(dir)
}

fn enter(dir: &Utf8Path) -> Result<()> {
    std::env::set_current_dir(dir).map_err(|err| InstallerError::ProgramDirectory {
        reason: format!("could not enter {dir}: {err}"),
    })?;
    log::debug!("working directory set to {dir}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::absolute("/opt/nether/nether-portal", "/opt/nether")]
    #[case::bare("nether-portal", ".")]
    #[case::relative("bin/nether-portal", "bin")]
    fn directory_of_returns_parent(#[case] executable: &str, #[case] expected: &str) {
        let dir = directory_of(Path::new(executable)).expect("directory");
        assert_eq!(dir, Utf8PathBuf::from(expected));
    }

    #[test]
    fn root_has_no_program_directory() {
        let err = directory_of(Path::new("/")).expect_err("root has no parent");
        assert!(matches!(err, InstallerError::ProgramDirectory { .. }));
    }

    #[test]
    fn entering_a_missing_directory_fails() {
        let temp = tempfile::tempdir().expect("temp dir");
        let missing = Utf8PathBuf::try_from(temp.path().join("missing")).expect("UTF-8 path");
        let err = enter(&missing).expect_err("missing directory");
        assert!(err.to_string().contains("could not enter"));
    }
}
