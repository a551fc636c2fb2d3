//! Writing `autoconfig.js` into a default-pref directory

use crate::declaration::{render_autoconfig, AutoconfigSettings, AUTOCONFIG_FILE_NAME};
use crate::error::{Error, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Options for [`install_autoconfig`]
///
/// # Example
///
/// ```rust
/// use ffautoconfig::InstallConfig;
///
/// let config = InstallConfig {
///     overwrite: true,
///     dry_run: false,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstallConfig {
    /// Replace an existing file whose content differs
    pub overwrite: bool,
    /// Report what would happen without touching the filesystem
    pub dry_run: bool,
}

/// What [`install_autoconfig`] did (or would do, on a dry run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Write the rendered `autoconfig.js` into `pref_dir`
///
/// The file is written to a temporary file in the same directory and then
/// renamed over the target, so the browser never sees a partial file.
/// Returns the target path together with the outcome.
pub fn install_autoconfig(
    pref_dir: &Path,
    settings: &AutoconfigSettings,
    config: &InstallConfig,
) -> Result<(PathBuf, InstallOutcome)> {
    let target = pref_dir.join(AUTOCONFIG_FILE_NAME);
    let content = render_autoconfig(settings);

    let outcome = match std::fs::read_to_string(&target) {
        Ok(existing) if existing == content => InstallOutcome::Unchanged,
        Ok(_) if !config.overwrite => return Err(Error::AlreadyExists(target)),
        Ok(_) => InstallOutcome::Updated,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => InstallOutcome::Created,
        Err(e) => return Err(e.into()),
    };

    if config.dry_run || outcome == InstallOutcome::Unchanged {
        tracing::info!(path = %target.display(), ?outcome, dry_run = config.dry_run, "autoconfig install skipped");
        return Ok((target, outcome));
    }

    std::fs::create_dir_all(pref_dir)?;
    let mut file = NamedTempFile::new_in(pref_dir)?;
    file.write_all(content.as_bytes())?;
    file.as_file().sync_all()?;
    // temp files are created 0600, the browser needs read access
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644))?;
    }
    file.persist(&target).map_err(|e| Error::Io(e.error))?;

    tracing::info!(path = %target.display(), ?outcome, "installed autoconfig");
    Ok((target, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_prefs_js_file;
    use tempfile::TempDir;

    #[test]
    fn test_install_creates_file() {
        let dir = TempDir::new().unwrap();
        let pref_dir = dir.path().join("defaults/pref");
        let settings = AutoconfigSettings::default();

        let (path, outcome) =
            install_autoconfig(&pref_dir, &settings, &InstallConfig::default()).unwrap();
        assert_eq!(outcome, InstallOutcome::Created);
        assert_eq!(path, pref_dir.join("autoconfig.js"));
        assert_eq!(parse_prefs_js_file(&path).unwrap().len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_install_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let (path, _) = install_autoconfig(
            dir.path(),
            &AutoconfigSettings::default(),
            &InstallConfig::default(),
        )
        .unwrap();
        let mode = std::fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_install_twice_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let settings = AutoconfigSettings::default();
        install_autoconfig(dir.path(), &settings, &InstallConfig::default()).unwrap();
        let (_, outcome) =
            install_autoconfig(dir.path(), &settings, &InstallConfig::default()).unwrap();
        assert_eq!(outcome, InstallOutcome::Unchanged);
    }

    #[test]
    fn test_install_refuses_to_overwrite_different_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("autoconfig.js");
        std::fs::write(&target, "pref(\"other\", 1);\n").unwrap();

        let result = install_autoconfig(
            dir.path(),
            &AutoconfigSettings::default(),
            &InstallConfig::default(),
        );
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "pref(\"other\", 1);\n"
        );
    }

    #[test]
    fn test_install_overwrite_updates() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("autoconfig.js"), "// old\n").unwrap();

        let config = InstallConfig {
            overwrite: true,
            dry_run: false,
        };
        let (path, outcome) =
            install_autoconfig(dir.path(), &AutoconfigSettings::default(), &config).unwrap();
        assert_eq!(outcome, InstallOutcome::Updated);
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            render_autoconfig(&AutoconfigSettings::default())
        );
    }

    #[test]
    fn test_install_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let pref_dir = dir.path().join("defaults/pref");
        let config = InstallConfig {
            overwrite: false,
            dry_run: true,
        };
        let (path, outcome) =
            install_autoconfig(&pref_dir, &AutoconfigSettings::default(), &config).unwrap();
        assert_eq!(outcome, InstallOutcome::Created);
        assert!(!path.exists());
        assert!(!pref_dir.exists());
    }
}
