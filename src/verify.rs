//! Structural checks of an `autoconfig.js` file
//!
//! Compares parsed declarations against the expected [`AutoconfigSettings`]:
//! exactly the three loader keys, each declared once as a default pref, with
//! the expected values. The filename/URL naming convention is only ever reported as a
//! note.

use crate::declaration::{AutoconfigSettings, DeclarationSet};
use crate::parser::find_duplicate_keys;
use crate::types::{PrefEntry, PrefType, PrefValue};
use serde::Serialize;
use std::fmt;

/// Severity of a [`Finding`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Note,
}

/// A single verification result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    MissingKey {
        key: String,
    },
    UnexpectedKey {
        key: String,
    },
    ValueMismatch {
        key: String,
        expected: PrefValue,
        actual: PrefValue,
    },
    /// Declared with the wrong function or attribute, e.g. `lockPref`
    TypeMismatch {
        key: String,
        expected: PrefType,
        actual: PrefType,
    },
    DuplicateKey {
        key: String,
        lines: Vec<usize>,
    },
    /// URL basename differs from the configured filename
    LinkageNote {
        filename: String,
        url_basename: Option<String>,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::LinkageNote { .. } => Severity::Note,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::MissingKey { key } => write!(f, "missing key \"{}\"", key),
            Finding::UnexpectedKey { key } => write!(f, "unexpected key \"{}\"", key),
            Finding::ValueMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "\"{}\" is {} (expected {})",
                key, actual, expected
            ),
            Finding::TypeMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "\"{}\" is declared as a {} pref (expected {})",
                key, actual, expected
            ),
            Finding::DuplicateKey { key, lines } => {
                let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
                write!(f, "\"{}\" declared more than once (lines {})", key, lines.join(", "))
            }
            Finding::LinkageNote {
                filename,
                url_basename: Some(basename),
            } => write!(
                f,
                "global config URL names \"{}\" while general.config.filename is \"{}\"",
                basename, filename
            ),
            Finding::LinkageNote {
                filename,
                url_basename: None,
            } => write!(
                f,
                "global config URL has no file name to compare with \"{}\"",
                filename
            ),
        }
    }
}

/// Outcome of [`verify_declarations`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerifyReport {
    pub findings: Vec<Finding>,
}

impl VerifyReport {
    /// True when no error-level finding exists
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Error)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Note)
    }
}

/// Verify parsed declarations against the expected settings
///
/// # Example
///
/// ```rust
/// use ffautoconfig::{parse_prefs_js, render_autoconfig, verify_declarations, AutoconfigSettings};
///
/// let settings = AutoconfigSettings::default();
/// let entries = parse_prefs_js(&render_autoconfig(&settings))?;
/// assert!(verify_declarations(&entries, &settings).is_ok());
/// # Ok::<(), ffautoconfig::Error>(())
/// ```
pub fn verify_declarations(entries: &[PrefEntry], settings: &AutoconfigSettings) -> VerifyReport {
    let mut findings: Vec<Finding> = find_duplicate_keys(entries)
        .into_iter()
        .map(|d| Finding::DuplicateKey {
            key: d.key,
            lines: d.lines,
        })
        .collect();

    let expected = settings.declarations();
    let actual = DeclarationSet::from_entries(entries.iter().cloned());

    for want in expected.entries() {
        match actual.get(&want.key) {
            None => findings.push(Finding::MissingKey {
                key: want.key.clone(),
            }),
            Some(got) => {
                if got.value != want.value {
                    findings.push(Finding::ValueMismatch {
                        key: want.key.clone(),
                        expected: want.value.clone(),
                        actual: got.value.clone(),
                    });
                }
                if got.pref_type != want.pref_type {
                    findings.push(Finding::TypeMismatch {
                        key: want.key.clone(),
                        expected: want.pref_type,
                        actual: got.pref_type,
                    });
                }
            }
        }
    }

    for key in actual.keys() {
        if expected.get(key).is_none() {
            findings.push(Finding::UnexpectedKey {
                key: key.to_string(),
            });
        }
    }

    if !settings.linkage_matches() {
        findings.push(Finding::LinkageNote {
            filename: settings.filename.clone(),
            url_basename: settings.url_basename().map(str::to_string),
        });
    }

    for finding in &findings {
        match finding.severity() {
            Severity::Error => tracing::warn!(%finding, "verification failed"),
            Severity::Note => tracing::info!(%finding, "verification note"),
        }
    }

    VerifyReport { findings }
}
