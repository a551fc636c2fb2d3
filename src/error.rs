//! Error types for autoconfig preference parsing and operations
//!
//! All public functions of the ffautoconfig library return [`Result<T, Error>`].

use std::path::PathBuf;

/// Errors that can occur while parsing, verifying or installing preferences
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexer error during tokenization
    #[error("Lexer error at line {line}, column {column}: {message}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Parser error during parsing
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// A key was declared twice where uniqueness is required
    #[error("Duplicate key: \"{key}\"")]
    DuplicateKey { key: String },

    /// Invalid preference type or value
    #[error("Invalid preference: {0}")]
    InvalidPreference(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be decoded
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),

    /// No browser installation found
    #[error("Browser installation not found (searched: {searched_paths})")]
    InstallationNotFound { searched_paths: String },

    /// Target file exists with different content and overwriting was not requested
    #[error("{0} already exists with different content")]
    AlreadyExists(PathBuf),
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use ffautoconfig::{parse_prefs_js, Result};
///
/// fn count(content: &str) -> Result<usize> {
///     Ok(parse_prefs_js(content)?.len())
/// }
/// # assert_eq!(count(r#"pref("a.b", 1);"#).unwrap(), 1);
/// ```
pub type Result<T> = std::result::Result<T, Error>;
