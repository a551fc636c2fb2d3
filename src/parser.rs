//! Parser for preference declaration files
//!
//! A recursive descent parser over the tokens produced by [`crate::lexer`].
//!
//! # Format
//!
//! ```text
//! pref("preference.name", value);                 // default
//! pref("preference.name", value, locked);         // locked
//! pref("preference.name", value, sticky);         // sticky
//! user_pref("preference.name", value);            // user
//! lockPref("preference.name", value);             // locked
//! defaultPref("preference.name", value);          // default
//! ```
//!
//! # Example
//!
//! ```rust
//! use ffautoconfig::{parse_prefs_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     // autoconfig loader
//!     pref("general.config.obscure_value", 0);
//!     pref("general.config.filename", "firefox.cfg");
//! "#;
//!
//! let prefs = parse_prefs_js(content)?;
//! assert_eq!(prefs.len(), 2);
//! assert_eq!(prefs[0].value, PrefValue::Integer(0));
//! assert_eq!(prefs[1].pref_type, PrefType::Default);
//! # Ok::<(), ffautoconfig::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};
use crate::types::{PrefEntry, PrefType, PrefValue};
use std::collections::BTreeMap;
use std::path::Path;

/// Parse preference declarations from a string
///
/// Entries are returned in declaration order. Duplicate keys are kept; use
/// [`find_duplicate_keys`] or [`crate::DeclarationSet`] to resolve them.
pub fn parse_prefs_js(content: &str) -> Result<Vec<PrefEntry>> {
    Parser::new(content)?.parse()
}

/// Read and parse a preference file
pub fn parse_prefs_js_file(path: &Path) -> Result<Vec<PrefEntry>> {
    tracing::debug!(path = %path.display(), "reading preference file");
    let content = std::fs::read_to_string(path)?;
    let entries = parse_prefs_js(&content)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "parsed preference file");
    Ok(entries)
}

/// A key declared more than once, with the lines it appears on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: String,
    pub lines: Vec<usize>,
}

/// Find every key declared more than once, sorted by key
///
/// Entries without line information contribute `0` as their line.
pub fn find_duplicate_keys(entries: &[PrefEntry]) -> Vec<DuplicateKey> {
    let mut seen: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for entry in entries {
        seen.entry(entry.key.as_str())
            .or_default()
            .push(entry.line.unwrap_or(0));
    }

    seen.into_iter()
        .filter(|(_, lines)| lines.len() > 1)
        .map(|(key, lines)| DuplicateKey {
            key: key.to_string(),
            lines,
        })
        .collect()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    /// Current lookahead token
    current: Token,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        let (line, column) = lexer.token_position();
        Ok(Parser {
            lexer,
            current,
            line,
            column,
        })
    }

    fn parse(&mut self) -> Result<Vec<PrefEntry>> {
        let mut preferences = Vec::new();
        while self.current != Token::Eof {
            preferences.push(self.parse_statement()?);
        }
        Ok(preferences)
    }

    /// func "(" key "," value ("," attribute)* ")" ";"
    fn parse_statement(&mut self) -> Result<PrefEntry> {
        let line = self.line;
        let mut pref_type = self.parse_function()?;

        self.expect_token(Token::LeftParen)?;
        let key = self.expect_string()?;
        self.expect_token(Token::Comma)?;
        let value = self.parse_value()?;

        while self.current == Token::Comma {
            self.advance()?;
            pref_type = self.parse_attribute(pref_type)?;
        }

        self.expect_token(Token::RightParen)?;
        self.expect_token(Token::Semicolon)?;

        Ok(PrefEntry {
            key,
            value,
            pref_type,
            line: Some(line),
        })
    }

    fn parse_function(&mut self) -> Result<PrefType> {
        let pref_type = match &self.current {
            Token::Identifier(ident) => PrefType::from_function(ident).ok_or_else(|| {
                self.error(format!(
                    "Unknown pref function '{}'. Expected pref, user_pref, lockPref, defaultPref or sticky_pref",
                    ident
                ))
            })?,
            token => {
                return Err(self.error(format!(
                    "Expected pref function name, got {:?}",
                    token
                )))
            }
        };
        self.advance()?;
        Ok(pref_type)
    }

    /// Trailing `locked` / `sticky` attribute of a `pref()` declaration
    fn parse_attribute(&mut self, pref_type: PrefType) -> Result<PrefType> {
        let attribute = match &self.current {
            Token::Identifier(ident) if ident == "locked" => PrefType::Locked,
            Token::Identifier(ident) if ident == "sticky" => PrefType::Sticky,
            token => {
                return Err(self.error(format!(
                    "Expected attribute 'locked' or 'sticky', got {:?}",
                    token
                )))
            }
        };
        if pref_type != PrefType::Default {
            return Err(self.error("Attributes are only valid on pref() declarations"));
        }
        self.advance()?;
        Ok(attribute)
    }

    fn parse_value(&mut self) -> Result<PrefValue> {
        let value = match &mut self.current {
            Token::String(s) => PrefValue::String(std::mem::take(s)),
            Token::Integer(n) => PrefValue::Integer(*n),
            Token::Number(n) => PrefValue::from_f64(*n),
            Token::Boolean(b) => PrefValue::Bool(*b),
            Token::Null => PrefValue::Null,
            Token::Eof => return Err(self.error("Unexpected end of input")),
            token => {
                let message = format!("Expected value, got {:?}", token);
                return Err(self.error(message));
            }
        };
        self.advance()?;
        Ok(value)
    }

    fn expect_token(&mut self, expected: Token) -> Result<()> {
        if self.current == expected {
            return self.advance();
        }
        if self.current == Token::Eof {
            return Err(self.error("Unexpected end of input"));
        }
        Err(self.error(format!("Expected {:?}, got {:?}", expected, self.current)))
    }

    fn expect_string(&mut self) -> Result<String> {
        let key = match &mut self.current {
            Token::String(s) => std::mem::take(s),
            token => {
                let message = format!("Expected string, got {:?}", token);
                return Err(self.error(message));
            }
        };
        self.advance()?;
        Ok(key)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        let (line, column) = self.lexer.token_position();
        self.line = line;
        self.column = column;
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parser {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }
}
