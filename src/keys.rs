//! Key/value storage shared by the argument and environment sources.
//!
//! Raw `(key, value)` pairs are split into two maps. Keys of the form
//! `name[]` or `name[N]` append their value to an ordered list under `name`;
//! the index is accepted but never used for placement, so values stay in the
//! order they were inserted. Every other key lands in a scalar map where a
//! later insert replaces an earlier one.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ARRAY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)\[\d*\]$").expect("array key pattern is valid"));

/// If `key` uses array syntax, return the base name.
///
/// `"tags[]"` and `"tags[3]"` both yield `Some("tags")`; `"tags"` yields `None`.
pub fn array_key(key: &str) -> Option<&str> {
    ARRAY_KEY
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse the textual booleans accepted by flags and environment variables:
/// `1 t T true TRUE True` and `0 f F false FALSE False`.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Default, Clone)]
pub struct FlatStore {
    scalars: HashMap<String, String>,
    slices: HashMap<String, Vec<Value>>,
}

impl FlatStore {
    pub fn clear(&mut self) {
        self.scalars.clear();
        self.slices.clear();
    }

    pub fn insert(&mut self, key: &str, value: String) {
        match array_key(key) {
            Some(name) => self
                .slices
                .entry(name.to_string())
                .or_default()
                .push(Value::String(value)),
            None => {
                self.scalars.insert(key.to_string(), value);
            }
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty() && self.slices.is_empty()
    }

    /// Raw scalar lookup, full name first. Empty values count as absent.
    pub fn get(&self, short: &str, full: &str) -> Option<&str> {
        [full, short]
            .into_iter()
            .filter_map(|name| self.scalars.get(name))
            .map(String::as_str)
            .find(|v| !v.is_empty())
    }

    pub fn int(&self, short: &str, full: &str) -> Option<i64> {
        self.get(short, full)?.parse().ok()
    }

    pub fn string(&self, short: &str, full: &str) -> Option<String> {
        self.get(short, full).map(str::to_string)
    }

    pub fn bool(&self, short: &str, full: &str) -> Option<bool> {
        parse_bool_str(self.get(short, full)?)
    }

    /// Always answers: `true` only when the key reads as boolean true.
    pub fn existence(&self, short: &str, full: &str) -> Option<bool> {
        Some(self.bool(short, full).unwrap_or(false))
    }

    pub fn slice(&self, short: &str, full: &str) -> Option<Vec<Value>> {
        self.slices
            .get(full)
            .or_else(|| self.slices.get(short))
            .cloned()
    }
}
