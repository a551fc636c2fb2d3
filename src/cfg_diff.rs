//! Comparison of autoconfig scripts
//!
//! The script named by `general.config.filename` is JavaScript, so it is not
//! run through the strict declaration parser. Instead each line is scanned
//! for a `defaultPref("...", ...);` / `lockPref("...", ...);` call and the
//! value is kept as raw source text. Two scripts can then be merged and
//! printed back as a normalised, sorted script.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Marker key written by user.js tooling, never part of a real config
const PARROT_KEY: &str = "_user.js.parrot";

const DEFAULT_KEY_WIDTH: usize = 88;
const LOCK_KEY_WIDTH: usize = 91;

/// One declaration found in an autoconfig script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgPref {
    pub key: String,
    /// Declared through `lockPref`
    pub locked: bool,
    /// Value exactly as written in the source
    pub value: String,
}

impl CfgPref {
    fn function(&self) -> &'static str {
        if self.locked {
            "lockPref"
        } else {
            "defaultPref"
        }
    }
}

/// Scan a script for pref declarations, in file order
///
/// Fails with [`Error::DuplicateKey`] when a key is declared twice.
///
/// # Example
///
/// ```rust
/// use ffautoconfig::scan_cfg;
///
/// let script = r#"// first line is ignored by the browser
/// defaultPref("browser.startup.page", 3);
/// lockPref("app.update.auto", false);
/// "#;
/// let prefs = scan_cfg(script)?;
/// assert_eq!(prefs.len(), 2);
/// assert!(prefs[1].locked);
/// assert_eq!(prefs[1].value, "false");
/// # Ok::<(), ffautoconfig::Error>(())
/// ```
pub fn scan_cfg(content: &str) -> Result<Vec<CfgPref>> {
    let mut seen = HashSet::new();
    let mut prefs = Vec::new();

    for line in content.lines() {
        let Some(pref) = scan_line(line) else {
            continue;
        };
        if pref.key == PARROT_KEY {
            continue;
        }
        if !seen.insert(pref.key.clone()) {
            return Err(Error::DuplicateKey { key: pref.key });
        }
        prefs.push(pref);
    }

    Ok(prefs)
}

fn scan_line(line: &str) -> Option<CfgPref> {
    let trimmed = line.trim();
    if trimmed.starts_with("//") {
        return None;
    }
    if line.chars().count() < 4 || !line.contains('"') || !line.contains(';') || !line.contains(',')
    {
        return None;
    }

    // A bare pref() at the start of a line is a default-pref file
    // declaration, not a call into the autoconfig API.
    let start = line.to_ascii_lowercase().find("pref(\"")?;
    if start < 4 {
        return None;
    }
    let key_start = start + "pref(\"".len();
    let key_end = key_start + line[key_start..].find('"')?;
    let comma = key_end + 1 + line[key_end + 1..].find(',')?;
    let close = comma + 1 + line[comma + 1..].find(");")?;

    Some(CfgPref {
        key: line[key_start..key_end].trim().to_string(),
        locked: trimmed.starts_with(['l', 'L']),
        value: line[comma + 1..close].trim().to_string(),
    })
}

/// Scan an autoconfig script from disk
pub fn scan_cfg_file(path: &Path) -> Result<Vec<CfgPref>> {
    let content = std::fs::read_to_string(path)?;
    let prefs = scan_cfg(&content)?;
    tracing::debug!(path = %path.display(), count = prefs.len(), "scanned autoconfig script");
    Ok(prefs)
}

/// A key present in both scripts with different declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfgDifference {
    pub base: CfgPref,
    pub compare: CfgPref,
}

impl fmt::Display for CfgDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Values \"{}\" differ: Base ({}) = {} vs Compare ({}) = {}",
            self.base.key,
            self.base.function(),
            self.base.value,
            self.compare.function(),
            self.compare.value
        )
    }
}

/// Result of merging a compare script into a base script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CfgDiff {
    /// Base declarations plus everything only the compare script had
    pub merged: BTreeMap<String, CfgPref>,
    /// Keys taken from the compare script, in its order
    pub added: Vec<String>,
    /// Keys whose declarations differ; the base declaration is kept
    pub differences: Vec<CfgDifference>,
}

impl CfgDiff {
    /// Render the merged declarations as a normalised script
    pub fn render(&self) -> String {
        format_cfg(&self.merged)
    }
}

/// Merge `compare` into `base`
pub fn diff_cfg(base: Vec<CfgPref>, compare: Vec<CfgPref>) -> CfgDiff {
    let mut merged: BTreeMap<String, CfgPref> =
        base.into_iter().map(|p| (p.key.clone(), p)).collect();
    let mut added = Vec::new();
    let mut differences = Vec::new();

    for pref in compare {
        match merged.get(&pref.key) {
            None => {
                tracing::debug!(key = %pref.key, "adding key missing from base");
                added.push(pref.key.clone());
                merged.insert(pref.key.clone(), pref);
            }
            Some(existing) if *existing != pref => {
                differences.push(CfgDifference {
                    base: existing.clone(),
                    compare: pref,
                });
            }
            Some(_) => {}
        }
    }

    CfgDiff {
        merged,
        added,
        differences,
    }
}

/// Read both scripts and merge them
pub fn diff_cfg_files(base: &Path, compare: &Path) -> Result<CfgDiff> {
    Ok(diff_cfg(scan_cfg_file(base)?, scan_cfg_file(compare)?))
}

/// Format declarations sorted by key: all defaults, a blank line, then all
/// locks. Keys whose first segment changes are separated by a blank line.
pub fn format_cfg(prefs: &BTreeMap<String, CfgPref>) -> String {
    let mut out = String::new();
    write_section(&mut out, prefs.values().filter(|p| !p.locked));
    out.push('\n');
    write_section(&mut out, prefs.values().filter(|p| p.locked));
    out
}

fn write_section<'a>(out: &mut String, prefs: impl Iterator<Item = &'a CfgPref>) {
    let mut group: Option<String> = None;
    for pref in prefs {
        let current = pref
            .key
            .split('.')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if group.as_ref().is_some_and(|g| *g != current) {
            out.push('\n');
        }

        let width = if pref.locked {
            LOCK_KEY_WIDTH
        } else {
            DEFAULT_KEY_WIDTH
        };
        let quoted = format!("\"{}\"", pref.key);
        out.push_str(&format!(
            "{}({:<width$}, {});\n",
            pref.function(),
            quoted,
            pref.value,
            width = width
        ));

        group = Some(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pref(key: &str, locked: bool, value: &str) -> CfgPref {
        CfgPref {
            key: key.to_string(),
            locked,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_scan_default_and_lock() {
        let script = r#"//
defaultPref("browser.startup.page", 3);
lockPref("app.update.auto", false);
  defaultPref("browser.startup.homepage", "about:home");
"#;
        let prefs = scan_cfg(script).unwrap();
        assert_eq!(
            prefs,
            vec![
                pref("browser.startup.page", false, "3"),
                pref("app.update.auto", true, "false"),
                pref("browser.startup.homepage", false, "\"about:home\""),
            ]
        );
    }

    #[test]
    fn test_scan_skips_comments_and_noise() {
        let script = r#"
// defaultPref("commented.out", 1);
if (x) { y(); }
pref("bare.pref", 1);
lockPref("_user.js.parrot", "done");
lockPref("missing.close", 1)
"#;
        assert!(scan_cfg(script).unwrap().is_empty());
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let prefs = scan_cfg(r#"LOCKPREF("a.b", 1);"#).unwrap();
        assert_eq!(prefs, vec![pref("a.b", true, "1")]);
    }

    #[test]
    fn test_scan_user_pref() {
        let prefs = scan_cfg(r#"user_pref("a.b", "x");"#).unwrap();
        assert_eq!(prefs, vec![pref("a.b", false, "\"x\"")]);
    }

    #[test]
    fn test_scan_duplicate_key_is_error() {
        let script = "defaultPref(\"a.b\", 1);\nlockPref(\"a.b\", 2);\n";
        match scan_cfg(script) {
            Err(Error::DuplicateKey { key }) => assert_eq!(key, "a.b"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_diff_adds_and_reports() {
        let base = vec![pref("a.one", false, "1"), pref("b.two", true, "true")];
        let compare = vec![
            pref("a.one", false, "1"),
            pref("b.two", false, "true"),
            pref("c.three", false, "\"x\""),
        ];
        let diff = diff_cfg(base, compare);

        assert_eq!(diff.added, vec!["c.three".to_string()]);
        assert_eq!(diff.differences.len(), 1);
        assert_eq!(
            diff.differences[0].to_string(),
            "Values \"b.two\" differ: Base (lockPref) = true vs Compare (defaultPref) = true"
        );
        // base wins
        assert!(diff.merged["b.two"].locked);
        assert_eq!(diff.merged.len(), 3);
    }

    #[test]
    fn test_format_groups_and_sections() {
        let prefs: BTreeMap<String, CfgPref> = [
            pref("browser.a", false, "1"),
            pref("browser.b", false, "2"),
            pref("network.c", false, "3"),
            pref("app.d", true, "false"),
        ]
        .into_iter()
        .map(|p| (p.key.clone(), p))
        .collect();

        let out = format_cfg(&prefs);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], format!("defaultPref({:<88}, 1);", "\"browser.a\""));
        assert_eq!(lines[1], format!("defaultPref({:<88}, 2);", "\"browser.b\""));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], format!("defaultPref({:<88}, 3);", "\"network.c\""));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], format!("lockPref({:<91}, false);", "\"app.d\""));
    }

    #[test]
    fn test_format_group_compare_is_case_insensitive() {
        let prefs: BTreeMap<String, CfgPref> = [pref("Browser.a", false, "1"), pref("browser.b", false, "2")]
            .into_iter()
            .map(|p| (p.key.clone(), p))
            .collect();
        let out = format_cfg(&prefs);
        assert_eq!(out.lines().filter(|l| l.is_empty()).count(), 1);
    }

    #[test]
    fn test_render_rescans_to_same_prefs() {
        let diff = diff_cfg(
            vec![pref("a.b", false, "1"), pref("c.d", true, "\"x, y\"")],
            Vec::new(),
        );
        let rescanned = scan_cfg(&diff.render()).unwrap();
        let merged: Vec<CfgPref> = diff.merged.values().cloned().collect();
        assert_eq!(rescanned, merged);
    }
}
