//! # ffautoconfig - autoconfig loader preferences for Firefox-family browsers
//!
//! Firefox and LibreWolf read `defaults/pref/autoconfig.js` from their
//! installation directory once at startup. That file is a handful of
//! `pref()` declarations telling the autoconfig subsystem where the
//! administrative configuration script lives. This library declares those
//! preferences, renders and parses them, verifies an existing file, compares
//! autoconfig scripts and installs the file into a browser.
//!
//! ## Features
//!
//! - Parse preference declaration files (`pref`, `user_pref`, `lockPref`,
//!   `defaultPref`, `sticky_pref`, `locked`/`sticky` attributes)
//! - Render `autoconfig.js` from [`AutoconfigSettings`]
//! - Verify a file declares exactly the expected loader preferences
//! - Merge and normalise autoconfig `.cfg` scripts
//! - Locate browser installations and install `autoconfig.js` atomically
//! - Query declarations with glob patterns (e.g. `"general.config.*"`)
//!
//! ## Quick Start
//!
//! ### Rendering and parsing
//!
//! ```rust
//! use ffautoconfig::{render_autoconfig, AutoconfigSettings, DeclarationSet, PrefValue};
//!
//! let text = render_autoconfig(&AutoconfigSettings::default());
//! let set = DeclarationSet::parse(&text)?;
//!
//! assert_eq!(set.len(), 3);
//! assert_eq!(
//!     set.value("general.config.filename"),
//!     Some(&PrefValue::String("firefox.cfg".to_string()))
//! );
//! # Ok::<(), ffautoconfig::Error>(())
//! ```
//!
//! ### Verifying an existing file
//!
//! ```rust
//! use ffautoconfig::{parse_prefs_js, verify_declarations, AutoconfigSettings};
//!
//! let content = r#"
//!     pref("general.config.obscure_value", 0);
//!     pref("general.config.filename", "firefox.cfg");
//! "#;
//!
//! let report = verify_declarations(&parse_prefs_js(content)?, &AutoconfigSettings::default());
//! assert!(!report.is_ok());
//! for finding in report.errors() {
//!     println!("{}", finding);
//! }
//! # Ok::<(), ffautoconfig::Error>(())
//! ```
//!
//! ### Installing
//!
//! ```rust,no_run
//! use ffautoconfig::{install_autoconfig, require_installation, AutoconfigSettings, InstallConfig};
//!
//! let installation = require_installation()?;
//! let (path, outcome) = install_autoconfig(
//!     &installation.pref_dir,
//!     &AutoconfigSettings::default(),
//!     &InstallConfig::default(),
//! )?;
//! println!("{}: {:?}", path.display(), outcome);
//! # Ok::<(), ffautoconfig::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All functions return [`Result<T, Error>`]:
//!
//! ```rust
//! use ffautoconfig::{parse_prefs_js, Error};
//!
//! match parse_prefs_js("pref(invalid syntax") {
//!     Ok(_) => println!("Parsed successfully"),
//!     Err(Error::Parser { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

// Re-export all public types at crate root
pub use types::{PrefEntry, PrefType, PrefValue, PrefValueExt};

// Re-export error types
pub use error::{Error, Result};

pub use declaration::{
    render_autoconfig, AutoconfigSettings, DeclarationSet, AUTOCONFIG_FILE_NAME,
    DEFAULT_FILENAME, DEFAULT_GLOBAL_CONFIG_URL, DEFAULT_OBSCURE_VALUE, FILENAME_KEY,
    GLOBAL_CONFIG_URL_KEY, OBSCURE_VALUE_KEY, PREF_DIR,
};
pub use parser::{find_duplicate_keys, parse_prefs_js, parse_prefs_js_file, DuplicateKey};
pub use query::query_preferences;
pub use verify::{verify_declarations, Finding, Severity, VerifyReport};

pub use cfg_diff::{
    diff_cfg, diff_cfg_files, format_cfg, scan_cfg, scan_cfg_file, CfgDiff, CfgDifference,
    CfgPref,
};

pub use install::{install_autoconfig, InstallConfig, InstallOutcome};
pub use locator::{
    find_all_installations, find_installation, inspect_installation, require_installation,
    BrowserInstallation,
};

// All modules are private - use re-exports above for public API
mod cfg_diff;
mod declaration;
mod error;
mod install;
mod lexer;
mod locator;
mod parser;
mod query;
mod types;
mod verify;
