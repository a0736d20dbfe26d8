//! The contract every configuration source implements.
//!
//! The resolution engine only talks to sources through [`Source`]. Each typed
//! lookup receives both names of an option and answers `Some(value)` when the
//! source has an opinion on that key, `None` otherwise. `None` never means
//! "the kind's zero value": a key that is present but cannot be read as the
//! requested kind is also `None`, and the engine keeps whatever value the
//! option already had.
//!
//! `init` runs once per resolution pass before any lookup. Implementations
//! must tolerate a second `init` by rebuilding their state from scratch.

use serde_json::Value;

use crate::error::OptfigError;

pub trait Source {
    /// Short label used in logs and error messages.
    fn name(&self) -> &str {
        "source"
    }

    /// Load or re-scan the raw data behind this source.
    fn init(&mut self) -> Result<(), OptfigError>;

    fn parse_int(&self, short: &str, full: &str) -> Option<i64>;

    fn parse_string(&self, short: &str, full: &str) -> Option<String>;

    fn parse_bool(&self, short: &str, full: &str) -> Option<bool>;

    /// Presence check for existence flags. Sources are expected to always
    /// answer `Some`, with `false` meaning "not set".
    fn parse_existence(&self, short: &str, full: &str) -> Option<bool>;

    fn parse_slice(&self, short: &str, full: &str) -> Option<Vec<Value>>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn init(&mut self) -> Result<(), OptfigError> {
        (**self).init()
    }

    fn parse_int(&self, short: &str, full: &str) -> Option<i64> {
        (**self).parse_int(short, full)
    }

    fn parse_string(&self, short: &str, full: &str) -> Option<String> {
        (**self).parse_string(short, full)
    }

    fn parse_bool(&self, short: &str, full: &str) -> Option<bool> {
        (**self).parse_bool(short, full)
    }

    fn parse_existence(&self, short: &str, full: &str) -> Option<bool> {
        (**self).parse_existence(short, full)
    }

    fn parse_slice(&self, short: &str, full: &str) -> Option<Vec<Value>> {
        (**self).parse_slice(short, full)
    }
}
