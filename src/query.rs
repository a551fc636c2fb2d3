use crate::error::{Error, Result};
use crate::types::PrefEntry;
use glob::Pattern;

/// Query preference entries by glob patterns (OR logic)
///
/// Returns clones of the entries whose key matches any pattern, in their
/// original order.
///
/// ```rust
/// use ffautoconfig::{parse_prefs_js, query_preferences};
///
/// let prefs = parse_prefs_js(r#"
///     pref("general.config.obscure_value", 0);
///     pref("general.config.filename", "firefox.cfg");
///     pref("autoadmin.global_config_url", "file:///etc/firefox.cfg");
/// "#)?;
/// assert_eq!(query_preferences(&prefs, &["general.config.*"])?.len(), 2);
/// # Ok::<(), ffautoconfig::Error>(())
/// ```
pub fn query_preferences(preferences: &[PrefEntry], patterns: &[&str]) -> Result<Vec<PrefEntry>> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(preferences
        .iter()
        .filter(|entry| compiled_patterns.iter().any(|pattern| pattern.matches(&entry.key)))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefType;

    fn create_test_entries() -> Vec<PrefEntry> {
        vec![
            PrefEntry::new("general.config.obscure_value", 0, PrefType::Default),
            PrefEntry::new("general.config.filename", "firefox.cfg", PrefType::Default),
            PrefEntry::new(
                "autoadmin.global_config_url",
                "file:///usr/lib/firefox/defaults/pref/firefox-additional.cfg",
                PrefType::Default,
            ),
            PrefEntry::new("javascript.enabled", true, PrefType::Locked),
        ]
    }

    #[test]
    fn test_query_single_pattern() {
        let entries = create_test_entries();
        let queried = query_preferences(&entries, &["general.*"]).unwrap();
        assert_eq!(queried.len(), 2);
        assert_eq!(queried[0].key, "general.config.obscure_value");
        assert_eq!(queried[1].key, "general.config.filename");
    }

    #[test]
    fn test_query_multiple_patterns_or_logic() {
        let entries = create_test_entries();
        let queried =
            query_preferences(&entries, &["autoadmin.*", "javascript.enabled"]).unwrap();
        assert_eq!(queried.len(), 2);
    }

    #[test]
    fn test_query_no_matches() {
        let entries = create_test_entries();
        assert!(query_preferences(&entries, &["nonexistent.*"])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_query_invalid_pattern() {
        let entries = create_test_entries();
        let result = query_preferences(&entries, &["[invalid"]);
        assert!(matches!(result, Err(Error::InvalidGlobPattern(_))));
    }
}
