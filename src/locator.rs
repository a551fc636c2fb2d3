//! Browser installation locator
//!
//! Finds Firefox-family installations (Firefox, Firefox ESR, LibreWolf) in
//! the usual platform locations so `autoconfig.js` can be written into their
//! default-pref directory.

use crate::declaration::PREF_DIR;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(target_os = "linux")]
const SEARCH_PATHS: &[&str] = &[
    "/usr/lib/firefox",
    "/usr/lib64/firefox",
    "/usr/lib/firefox-esr",
    "/usr/lib/librewolf",
    "/opt/firefox",
    "/opt/firefox-esr",
    "/opt/librewolf",
    "/usr/local/firefox",
];

#[cfg(target_os = "macos")]
const SEARCH_PATHS: &[&str] = &[
    "/Applications/Firefox.app/Contents/Resources",
    "/Applications/Firefox ESR.app/Contents/Resources",
    "/Applications/LibreWolf.app/Contents/Resources",
];

#[cfg(target_os = "windows")]
const SEARCH_PATHS: &[&str] = &[
    r"C:\Program Files\Mozilla Firefox",
    r"C:\Program Files\Mozilla Firefox ESR",
    r"C:\Program Files\LibreWolf",
    r"C:\Program Files (x86)\Mozilla Firefox",
];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const SEARCH_PATHS: &[&str] = &["/usr/local/lib/firefox", "/usr/local/lib/librewolf"];

/// A browser installation that can carry an `autoconfig.js`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserInstallation {
    /// Product name from application.ini, or the directory name
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    /// `<path>/defaults/pref`
    pub pref_dir: PathBuf,
}

/// Find the first installation in the platform search paths
pub fn find_installation() -> Result<Option<BrowserInstallation>> {
    Ok(find_all_installations()?.into_iter().next())
}

/// Find every installation in the platform search paths
pub fn find_all_installations() -> Result<Vec<BrowserInstallation>> {
    let mut installations = Vec::new();
    for path in SEARCH_PATHS {
        match inspect_installation(Path::new(path)) {
            Ok(install) => {
                tracing::debug!(path = %path, version = %install.version, "found installation");
                installations.push(install);
            }
            Err(e) => tracing::trace!(path = %path, error = %e, "not an installation"),
        }
    }
    Ok(installations)
}

/// Find an installation or fail with the list of searched paths
pub fn require_installation() -> Result<BrowserInstallation> {
    find_installation()?.ok_or_else(|| Error::InstallationNotFound {
        searched_paths: SEARCH_PATHS.join(", "),
    })
}

/// Inspect a directory and describe the installation it holds
///
/// A directory qualifies when it has an `application.ini`, an `omni.ja`
/// (at the root or under `browser/`) or a `defaults/pref` directory.
pub fn inspect_installation(path: &Path) -> Result<BrowserInstallation> {
    let not_found = || Error::InstallationNotFound {
        searched_paths: path.display().to_string(),
    };

    if !path.is_dir() {
        return Err(not_found());
    }

    let pref_dir = path.join(PREF_DIR);
    let markers = [
        path.join("application.ini"),
        path.join("omni.ja"),
        path.join("browser/omni.ja"),
    ];
    if !pref_dir.is_dir() && !markers.iter().any(|p| p.exists()) {
        return Err(not_found());
    }

    let info = ["application.ini", "platform.ini"]
        .iter()
        .map(|name| path.join(name))
        .find(|p| p.exists())
        .map(|p| read_app_ini(&p))
        .transpose()?
        .unwrap_or_default();

    let name = info.name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    });

    Ok(BrowserInstallation {
        name,
        version: info.version.unwrap_or_else(|| "unknown".to_string()),
        path: path.to_path_buf(),
        pref_dir,
    })
}

#[derive(Debug, Default)]
struct AppInfo {
    name: Option<String>,
    version: Option<String>,
}

/// Read `Name=` and `Version=` from the `[App]` section, falling back to
/// the first other section carrying them (`Milestone=` in platform.ini)
fn read_app_ini(ini_path: &Path) -> Result<AppInfo> {
    let content = fs::read_to_string(ini_path)?;
    Ok(parse_app_ini(&content))
}

fn parse_app_ini(content: &str) -> AppInfo {
    let mut app = AppInfo::default();
    let mut fallback = AppInfo::default();
    let mut in_app = false;

    for line in content.lines().map(str::trim) {
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_app = section.trim() == "App";
            continue;
        }
        let Some((field, value)) = line.split_once('=') else {
            continue;
        };
        let info = if in_app { &mut app } else { &mut fallback };
        let value = value.trim().to_string();
        match field.trim() {
            "Name" if info.name.is_none() => info.name = Some(value),
            "Version" | "Milestone" if info.version.is_none() => info.version = Some(value),
            _ => {}
        }
    }

    AppInfo {
        name: app.name.or(fallback.name),
        version: app.version.or(fallback.version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_search_paths_not_empty() {
        assert!(!SEARCH_PATHS.is_empty());
    }

    #[test]
    fn test_inspect_nonexistent_path() {
        assert!(inspect_installation(Path::new("/nonexistent/firefox/path/xyz123")).is_err());
    }

    #[test]
    fn test_inspect_empty_dir_is_not_installation() {
        let dir = TempDir::new().unwrap();
        assert!(inspect_installation(dir.path()).is_err());
    }

    #[test]
    fn test_inspect_installation_with_ini() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("application.ini"),
            "[App]\nVendor=Mozilla\nName=Firefox\nVersion=128.0\n",
        )
        .unwrap();

        let install = inspect_installation(dir.path()).unwrap();
        assert_eq!(install.name, "Firefox");
        assert_eq!(install.version, "128.0");
        assert_eq!(install.pref_dir, dir.path().join("defaults/pref"));
    }

    #[test]
    fn test_inspect_installation_with_pref_dir_only() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("librewolf");
        fs::create_dir_all(root.join("defaults/pref")).unwrap();

        let install = inspect_installation(&root).unwrap();
        assert_eq!(install.name, "librewolf");
        assert_eq!(install.version, "unknown");
    }

    #[test]
    fn test_parse_app_ini() {
        let info = parse_app_ini("[Build]\nMilestone=115.3.0\n");
        assert_eq!(info.version.as_deref(), Some("115.3.0"));
        assert!(info.name.is_none());
    }

    #[test]
    fn test_parse_app_ini_prefers_app_section() {
        let info = parse_app_ini(
            "[Build]\nName=Other\nMilestone=115.0\n\n[App]\nVendor=Mozilla\nName=Firefox\nVersion=128.0\n",
        );
        assert_eq!(info.name.as_deref(), Some("Firefox"));
        assert_eq!(info.version.as_deref(), Some("128.0"));
    }

    #[test]
    fn test_parse_app_ini_falls_back_outside_app() {
        let info = parse_app_ini("[App]\nName=LibreWolf\n[Gecko]\nMilestone=128.0\n");
        assert_eq!(info.name.as_deref(), Some("LibreWolf"));
        assert_eq!(info.version.as_deref(), Some("128.0"));
    }
}
