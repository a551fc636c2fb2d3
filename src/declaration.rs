//! Autoconfig loader declarations
//!
//! The browser reads `defaults/pref/autoconfig.js` once at startup. That file
//! only tells the autoconfig subsystem where the administrative script lives:
//!
//! ```text
//! pref("general.config.obscure_value", 0);
//! pref("general.config.filename", "firefox.cfg");
//! pref("autoadmin.global_config_url", "file:///usr/lib/firefox/defaults/pref/firefox-additional.cfg");
//! ```
//!
//! [`AutoconfigSettings`] holds those three facts and [`DeclarationSet`] is
//! the ordered, last-write-wins list of entries they render to.

use crate::error::Result;
use crate::parser::parse_prefs_js;
use crate::types::{PrefEntry, PrefType, PrefValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const OBSCURE_VALUE_KEY: &str = "general.config.obscure_value";
pub const FILENAME_KEY: &str = "general.config.filename";
pub const GLOBAL_CONFIG_URL_KEY: &str = "autoadmin.global_config_url";

/// `0` means the companion script is plain text
pub const DEFAULT_OBSCURE_VALUE: i64 = 0;
pub const DEFAULT_FILENAME: &str = "firefox.cfg";
pub const DEFAULT_GLOBAL_CONFIG_URL: &str =
    "file:///usr/lib/firefox/defaults/pref/firefox-additional.cfg";

/// File name the browser looks for in its default-pref directory
pub const AUTOCONFIG_FILE_NAME: &str = "autoconfig.js";
/// Default-pref directory, relative to the installation root
pub const PREF_DIR: &str = "defaults/pref";

const HEADER: &str = "\
// Autoconfig loader preferences.
//
// Read once by the browser at startup. The file named by
// general.config.filename is loaded from the installation directory and
// autoadmin.global_config_url points at an additional configuration script.
";

/// The three facts `autoconfig.js` declares
///
/// Deserialized from a JSON settings file; missing fields fall back to the
/// shipped values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoconfigSettings {
    pub obscure_value: i64,
    pub filename: String,
    pub global_config_url: String,
}

impl Default for AutoconfigSettings {
    fn default() -> Self {
        Self {
            obscure_value: DEFAULT_OBSCURE_VALUE,
            filename: DEFAULT_FILENAME.to_string(),
            global_config_url: DEFAULT_GLOBAL_CONFIG_URL.to_string(),
        }
    }
}

impl AutoconfigSettings {
    /// Load settings from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// The ordered declarations for these settings
    pub fn declarations(&self) -> DeclarationSet {
        let mut set = DeclarationSet::new();
        set.declare(PrefEntry::new(
            OBSCURE_VALUE_KEY,
            self.obscure_value,
            PrefType::Default,
        ));
        set.declare(PrefEntry::new(
            FILENAME_KEY,
            self.filename.as_str(),
            PrefType::Default,
        ));
        set.declare(PrefEntry::new(
            GLOBAL_CONFIG_URL_KEY,
            self.global_config_url.as_str(),
            PrefType::Default,
        ));
        set
    }

    /// Last path segment of the global config URL, if it has one
    pub fn url_basename(&self) -> Option<&str> {
        let path = self
            .global_config_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        path.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Whether the URL basename equals the configured filename
    ///
    /// Only a naming convention; the browser loads both files independently.
    pub fn linkage_matches(&self) -> bool {
        self.url_basename() == Some(self.filename.as_str())
    }
}

/// Render the `autoconfig.js` text for the given settings
pub fn render_autoconfig(settings: &AutoconfigSettings) -> String {
    settings.declarations().render()
}

/// Ordered preference declarations with last-write-wins semantics
///
/// A redeclared key keeps the position of its first declaration and takes the
/// value of the last one, mirroring how the browser applies the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationSet {
    entries: Vec<PrefEntry>,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from entries in declaration order
    pub fn from_entries(entries: impl IntoIterator<Item = PrefEntry>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            set.declare(entry);
        }
        set
    }

    /// Parse declaration text into a set
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self::from_entries(parse_prefs_js(content)?))
    }

    /// Add or override a declaration, returning the replaced entry
    pub fn declare(&mut self, entry: PrefEntry) -> Option<PrefEntry> {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => {
                tracing::debug!(key = %entry.key, "preference redeclared, last value wins");
                Some(std::mem::replace(existing, entry))
            }
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&PrefEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn value(&self, key: &str) -> Option<&PrefValue> {
        self.get(key).map(|e| &e.value)
    }

    pub fn entries(&self) -> &[PrefEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key/value mapping, sorted by key
    pub fn to_mapping(&self) -> BTreeMap<String, PrefValue> {
        self.entries
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    /// Render as declaration file text
    pub fn render(&self) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&entry.to_declaration());
            out.push('\n');
        }
        out
    }
}
