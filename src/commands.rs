use crate::cli::{self, SettingsArgs};
use anyhow::Context;
use ffautoconfig::{
    diff_cfg_files, find_all_installations, inspect_installation, install_autoconfig,
    parse_prefs_js_file, query_preferences, render_autoconfig, require_installation,
    verify_declarations, AutoconfigSettings, DeclarationSet, InstallConfig, PrefValue,
};
use serde::Serialize;
use std::path::Path;

/// Representation for array output format
#[derive(Debug, Serialize)]
struct ConfigEntry<'a> {
    key: &'a str,
    value: &'a PrefValue,
}

/// Defaults, then the settings file, then individual flags
pub fn resolve_settings(args: &SettingsArgs) -> anyhow::Result<AutoconfigSettings> {
    let mut settings = match &args.settings {
        Some(path) => AutoconfigSettings::from_json_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => AutoconfigSettings::default(),
    };

    if let Some(value) = args.obscure_value {
        settings.obscure_value = value;
    }
    if let Some(filename) = &args.filename {
        settings.filename = filename.clone();
    }
    if let Some(url) = &args.config_url {
        settings.global_config_url = url.clone();
    }

    Ok(settings)
}

pub fn render(args: &SettingsArgs, output: Option<&Path>) -> anyhow::Result<()> {
    let settings = resolve_settings(args)?;
    let content = render_autoconfig(&settings);

    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", content),
    }
    Ok(())
}

/// Parse a preference file and print it as JSON
pub fn show(
    file: &Path,
    query_patterns: &[String],
    get: Option<&str>,
    output_type: cli::OutputType,
) -> anyhow::Result<()> {
    let entries = parse_prefs_js_file(file).with_context(|| {
        format!(
            "Failed to parse {}. The file may be corrupted or in an unexpected format.",
            file.display()
        )
    })?;

    // Handle --get mode: single preference retrieval with raw output
    if let Some(key) = get {
        let set = DeclarationSet::from_entries(entries);
        let value = set
            .value(key)
            .with_context(|| format!("Preference '{}' not found", key))?;
        output_raw_value(value);
        return Ok(());
    }

    let entries = if query_patterns.is_empty() {
        entries
    } else {
        let patterns: Vec<&str> = query_patterns.iter().map(String::as_str).collect();
        query_preferences(&entries, &patterns).context("Failed to apply query")?
    };
    let set = DeclarationSet::from_entries(entries);

    let json = match output_type {
        cli::OutputType::JsonObject => serde_json::to_string_pretty(&set.to_mapping())?,
        cli::OutputType::JsonArray => {
            let array_output: Vec<ConfigEntry> = set
                .entries()
                .iter()
                .map(|e| ConfigEntry {
                    key: &e.key,
                    value: &e.value,
                })
                .collect();
            serde_json::to_string_pretty(&array_output)?
        }
    };

    println!("{}", json);
    Ok(())
}

/// Output a single preference value in raw format (no JSON wrapping)
fn output_raw_value(value: &PrefValue) {
    match value {
        PrefValue::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
}

/// Returns whether verification passed
pub fn verify(file: &Path, args: &SettingsArgs, json: bool) -> anyhow::Result<bool> {
    let settings = resolve_settings(args)?;
    let entries = parse_prefs_js_file(file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    let report = verify_declarations(&entries, &settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for finding in report.errors() {
            println!("error: {}", finding);
        }
        for finding in report.notes() {
            println!("note: {}", finding);
        }
        if report.is_ok() {
            println!("{}: ok", file.display());
        }
    }

    Ok(report.is_ok())
}

pub fn diff(base: &Path, compare: &Path) -> anyhow::Result<()> {
    let diff = diff_cfg_files(base, compare).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            base.display(),
            compare.display()
        )
    })?;

    for key in &diff.added {
        eprintln!("Adding missing key \"{}\" to Base.", key);
    }
    for difference in &diff.differences {
        eprintln!("{}", difference);
    }
    eprintln!();

    print!("{}", diff.render());
    Ok(())
}

pub fn install(
    prefix: Option<&Path>,
    args: &SettingsArgs,
    force: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let settings = resolve_settings(args)?;

    let installation = match prefix {
        Some(path) => inspect_installation(path)
            .with_context(|| format!("{} is not a browser installation", path.display()))?,
        None => require_installation()
            .context("No browser installation found. Pass --prefix to choose one.")?,
    };
    tracing::info!(
        name = %installation.name,
        version = %installation.version,
        path = %installation.path.display(),
        "installing into browser"
    );

    let config = InstallConfig {
        overwrite: force,
        dry_run,
    };
    let (path, outcome) = install_autoconfig(&installation.pref_dir, &settings, &config)
        .context("Failed to install autoconfig.js (use --force to replace a modified file)")?;

    let json = serde_json::json!({
        "path": path,
        "outcome": outcome,
        "dry_run": dry_run,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub fn locate() -> anyhow::Result<()> {
    let installations = find_all_installations().context("Failed to search for installations")?;
    println!("{}", serde_json::to_string_pretty(&installations)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_settings_defaults() {
        let settings = resolve_settings(&SettingsArgs::default()).unwrap();
        assert_eq!(settings, AutoconfigSettings::default());
    }

    #[test]
    fn test_resolve_settings_flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "filename": "librewolf.cfg", "obscure_value": 13 }"#,
        )
        .unwrap();

        let args = SettingsArgs {
            settings: Some(path),
            obscure_value: Some(0),
            filename: None,
            config_url: Some("file:///usr/lib/librewolf/librewolf.cfg".to_string()),
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.filename, "librewolf.cfg");
        assert_eq!(settings.obscure_value, 0);
        assert_eq!(
            settings.global_config_url,
            "file:///usr/lib/librewolf/librewolf.cfg"
        );
    }

    #[test]
    fn test_resolve_settings_missing_file() {
        let args = SettingsArgs {
            settings: Some("/nonexistent/settings.json".into()),
            ..Default::default()
        };
        assert!(resolve_settings(&args).is_err());
    }
}
