//! Core data types for preference declarations

use serde::{Deserialize, Serialize};
use std::fmt;

/// A preference value as it appears in a declaration
///
/// Serialized untagged, so a JSON dump of a set of entries reads as a plain
/// `key -> value` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Null,
}

impl PrefValue {
    /// Build a numeric value, folding integral numbers into [`PrefValue::Integer`]
    pub fn from_f64(n: f64) -> Self {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
            PrefValue::Integer(n as i64)
        } else {
            PrefValue::Float(n)
        }
    }
}

impl From<&str> for PrefValue {
    fn from(s: &str) -> Self {
        PrefValue::String(s.to_string())
    }
}

impl From<String> for PrefValue {
    fn from(s: String) -> Self {
        PrefValue::String(s)
    }
}

impl From<i64> for PrefValue {
    fn from(n: i64) -> Self {
        PrefValue::Integer(n)
    }
}

impl From<bool> for PrefValue {
    fn from(b: bool) -> Self {
        PrefValue::Bool(b)
    }
}

/// Renders the value as a literal usable inside a `pref()` declaration
impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Integer(n) => write!(f, "{}", n),
            PrefValue::Float(n) => write!(f, "{}", n),
            PrefValue::Null => f.write_str("null"),
            PrefValue::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c if (c as u32) < 0x20 => write!(f, "\\x{:02x}", c as u32)?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// Convenience accessors for [`PrefValue`]
pub trait PrefValueExt {
    fn as_bool(&self) -> Option<bool>;
    fn as_i64(&self) -> Option<i64>;
    fn as_f64(&self) -> Option<f64>;
    fn as_str(&self) -> Option<&str>;
    fn is_number(&self) -> bool;
    fn is_null(&self) -> bool;
}

impl PrefValueExt for PrefValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            PrefValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            PrefValue::Integer(n) => Some(*n as f64),
            PrefValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, PrefValue::Integer(_) | PrefValue::Float(_))
    }

    fn is_null(&self) -> bool {
        matches!(self, PrefValue::Null)
    }
}

/// How a preference was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefType {
    /// `pref()` / `defaultPref()`
    Default,
    /// `user_pref()`
    User,
    /// `lock_pref()`, `lockPref()` or `pref(.., locked)`
    Locked,
    /// `sticky_pref()` or `pref(.., sticky)`
    Sticky,
}

impl PrefType {
    /// Map a declaration function name to its type
    pub fn from_function(name: &str) -> Option<Self> {
        match name {
            "pref" | "defaultPref" => Some(PrefType::Default),
            "user_pref" => Some(PrefType::User),
            "lock_pref" | "lockPref" => Some(PrefType::Locked),
            "sticky_pref" => Some(PrefType::Sticky),
            _ => None,
        }
    }
}

impl fmt::Display for PrefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrefType::Default => "default",
            PrefType::User => "user",
            PrefType::Locked => "locked",
            PrefType::Sticky => "sticky",
        };
        f.write_str(name)
    }
}

/// A single parsed or constructed preference declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefEntry {
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
    /// Source line of the declaration, when parsed from text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,
}

impl PrefEntry {
    pub fn new(key: impl Into<String>, value: impl Into<PrefValue>, pref_type: PrefType) -> Self {
        PrefEntry {
            key: key.into(),
            value: value.into(),
            pref_type,
            line: None,
        }
    }

    /// Render as a single declaration statement
    ///
    /// Locked and sticky entries use the attribute form, which every
    /// default-pref file accepts.
    pub fn to_declaration(&self) -> String {
        let key = PrefValue::String(self.key.clone());
        match self.pref_type {
            PrefType::Default => format!("pref({}, {});", key, self.value),
            PrefType::User => format!("user_pref({}, {});", key, self.value),
            PrefType::Locked => format!("pref({}, {}, locked);", key, self.value),
            PrefType::Sticky => format!("pref({}, {}, sticky);", key, self.value),
        }
    }
}
