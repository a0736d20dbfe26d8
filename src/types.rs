use std::fmt;

use serde_json::Value;

/// Name pair identifying a declared option.
///
/// Either name may be used for lookup by a source. When both resolve to
/// distinct values the full name is preferred.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionKey {
    short: String,
    full: String,
}

impl OptionKey {
    pub fn new(short: &str, full: &str) -> Self {
        Self {
            short: short.to_string(),
            full: full.to_string(),
        }
    }

    pub fn short(&self) -> &str {
        &self.short
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    /// True if `name` is either the short or the full name.
    pub fn matches(&self, name: &str) -> bool {
        self.full == name || self.short == name
    }
}

/// Storage and parse kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Int,
    String,
    Bool,
    /// Boolean whose true state comes from the key's presence alone.
    Existence,
    Slice,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::Int => "int",
            OptionKind::String => "string",
            OptionKind::Bool => "bool",
            OptionKind::Existence => "flag",
            OptionKind::Slice => "list",
        };
        f.write_str(name)
    }
}

/// A value produced by a source or held as an option default.
///
/// Existence values travel as `Bool`. Slice elements are untyped document
/// nodes: argument and environment sources yield strings, documents pass
/// their array elements through as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Int(i64),
    String(String),
    Bool(bool),
    Slice(Vec<Value>),
}

impl OptionValue {
    /// Whether this value can be stored by an option of `kind`.
    pub fn fits(&self, kind: OptionKind) -> bool {
        matches!(
            (self, kind),
            (OptionValue::Int(_), OptionKind::Int)
                | (OptionValue::String(_), OptionKind::String)
                | (OptionValue::Bool(_), OptionKind::Bool | OptionKind::Existence)
                | (OptionValue::Slice(_), OptionKind::Slice)
        )
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::String(s) => write!(f, "\"{s}\""),
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Slice(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}
