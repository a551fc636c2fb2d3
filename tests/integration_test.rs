// Integration tests against the shipped autoconfig.js and sample .cfg scripts
use ffautoconfig::{
    diff_cfg_files, install_autoconfig, parse_prefs_js, parse_prefs_js_file,
    render_autoconfig, verify_declarations, AutoconfigSettings, DeclarationSet, Finding,
    InstallConfig, InstallOutcome, PrefType, PrefValue, PrefValueExt, FILENAME_KEY,
    GLOBAL_CONFIG_URL_KEY, OBSCURE_VALUE_KEY,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// Helper function to get fixtures path
fn fixtures_path() -> PathBuf {
    Path::new("tests/fixtures").to_path_buf()
}

fn expected_mapping() -> BTreeMap<String, PrefValue> {
    BTreeMap::from([
        (OBSCURE_VALUE_KEY.to_string(), PrefValue::Integer(0)),
        (
            FILENAME_KEY.to_string(),
            PrefValue::String("firefox.cfg".to_string()),
        ),
        (
            GLOBAL_CONFIG_URL_KEY.to_string(),
            PrefValue::String(
                "file:///usr/lib/firefox/defaults/pref/firefox-additional.cfg".to_string(),
            ),
        ),
    ])
}

#[test]
fn test_fixture_yields_exact_mapping() {
    let entries = parse_prefs_js_file(&fixtures_path().join("autoconfig.js"))
        .expect("Failed to parse autoconfig.js");

    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.pref_type == PrefType::Default));

    let set = DeclarationSet::from_entries(entries);
    assert_eq!(set.to_mapping(), expected_mapping());
}

#[test]
fn test_fixture_values() {
    let entries = parse_prefs_js_file(&fixtures_path().join("autoconfig.js")).unwrap();
    let set = DeclarationSet::from_entries(entries);

    assert_eq!(set.value(OBSCURE_VALUE_KEY).and_then(|v| v.as_i64()), Some(0));
    assert_eq!(
        set.value(FILENAME_KEY).and_then(|v| v.as_str()),
        Some("firefox.cfg")
    );
    assert_eq!(
        set.value(GLOBAL_CONFIG_URL_KEY).and_then(|v| v.as_str()),
        Some("file:///usr/lib/firefox/defaults/pref/firefox-additional.cfg")
    );
}

#[test]
fn test_fixture_verifies_with_linkage_note_only() {
    let entries = parse_prefs_js_file(&fixtures_path().join("autoconfig.js")).unwrap();
    let report = verify_declarations(&entries, &AutoconfigSettings::default());

    assert!(report.is_ok(), "unexpected findings: {:?}", report.findings);
    assert_eq!(
        report.findings,
        vec![Finding::LinkageNote {
            filename: "firefox.cfg".to_string(),
            url_basename: Some("firefox-additional.cfg".to_string()),
        }]
    );
}

#[test]
fn test_reparsing_is_idempotent() {
    let content = std::fs::read_to_string(fixtures_path().join("autoconfig.js")).unwrap();
    let first = parse_prefs_js(&content).unwrap();
    let second = parse_prefs_js(&content).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rendered_file_matches_fixture_mapping() {
    let rendered = render_autoconfig(&AutoconfigSettings::default());
    let set = DeclarationSet::parse(&rendered).unwrap();
    assert_eq!(set.to_mapping(), expected_mapping());
}

#[test]
fn test_install_then_verify() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let pref_dir = temp_dir.path().join("defaults").join("pref");
    let settings = AutoconfigSettings {
        filename: "librewolf.cfg".to_string(),
        global_config_url: "file:///usr/lib/librewolf/defaults/pref/librewolf.cfg".to_string(),
        ..Default::default()
    };

    let (path, outcome) =
        install_autoconfig(&pref_dir, &settings, &InstallConfig::default()).unwrap();
    assert_eq!(outcome, InstallOutcome::Created);

    let entries = parse_prefs_js_file(&path).unwrap();
    let report = verify_declarations(&entries, &settings);
    assert!(report.findings.is_empty(), "{:?}", report.findings);

    // the default settings no longer match what was installed
    let report = verify_declarations(&entries, &AutoconfigSettings::default());
    assert_eq!(report.errors().count(), 2);
}

#[test]
fn test_cfg_diff_fixtures() {
    let diff = diff_cfg_files(
        &fixtures_path().join("base.cfg"),
        &fixtures_path().join("compare.cfg"),
    )
    .expect("Failed to compare fixtures");

    assert_eq!(diff.added, vec!["network.dns.disablePrefetch".to_string()]);
    assert_eq!(diff.differences.len(), 1);
    assert_eq!(
        diff.differences[0].to_string(),
        "Values \"browser.startup.page\" differ: Base (defaultPref) = 3 vs Compare (defaultPref) = 1"
    );
    assert!(!diff.merged.contains_key("_user.js.parrot"));
    assert!(!diff.merged.contains_key("commented.out"));

    let rendered = diff.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(
        lines,
        vec![
            format!("defaultPref({:<88}, \"about:home\");", "\"browser.startup.homepage\""),
            format!("defaultPref({:<88}, 3);", "\"browser.startup.page\""),
            String::new(),
            format!("defaultPref({:<88}, true);", "\"network.dns.disablePrefetch\""),
            String::new(),
            format!("lockPref({:<91}, false);", "\"app.update.auto\""),
            String::new(),
            format!("lockPref({:<91}, false);", "\"toolkit.telemetry.enabled\""),
        ]
    );
}

#[test]
fn test_cfg_diff_missing_file() {
    let result = diff_cfg_files(
        &fixtures_path().join("base.cfg"),
        &fixtures_path().join("does-not-exist.cfg"),
    );
    assert!(matches!(result, Err(ffautoconfig::Error::Io(_))));
}
