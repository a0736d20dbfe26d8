use serde_json::Value;

use crate::binding::Binding;
use crate::types::{OptionKind, OptionValue};

/// Typed storage behind an option. One variant per storage type; `Bool`
/// serves both `Bool` and `Existence` options.
#[derive(Debug, Clone)]
pub enum Slot {
    Int(Binding<i64>),
    String(Binding<String>),
    Bool(Binding<bool>),
    Slice(Binding<Vec<Value>>),
}

impl Slot {
    pub fn value(&self) -> OptionValue {
        match self {
            Slot::Int(b) => OptionValue::Int(b.get()),
            Slot::String(b) => OptionValue::String(b.get()),
            Slot::Bool(b) => OptionValue::Bool(b.get()),
            Slot::Slice(b) => OptionValue::Slice(b.get()),
        }
    }
}

/// A declared option: default, bound storage, kind, and description.
#[derive(Debug, Clone)]
pub struct OptionEntry {
    default: OptionValue,
    slot: Slot,
    kind: OptionKind,
    description: String,
}

impl OptionEntry {
    pub(crate) fn new(
        default: OptionValue,
        slot: Slot,
        kind: OptionKind,
        description: &str,
    ) -> Self {
        Self {
            default,
            slot,
            kind,
            description: description.to_string(),
        }
    }

    pub fn default_value(&self) -> &OptionValue {
        &self.default
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Current value of the bound storage.
    pub fn value(&self) -> OptionValue {
        self.slot.value()
    }

    /// Write `value` into the bound storage.
    ///
    /// Values whose type does not match the option's kind are dropped without
    /// error. Returns whether the write happened.
    pub(crate) fn put(&self, value: OptionValue) -> bool {
        if !value.fits(self.kind) {
            return false;
        }
        match (&self.slot, value) {
            (Slot::Int(b), OptionValue::Int(v)) => b.set(v),
            (Slot::String(b), OptionValue::String(v)) => b.set(v),
            (Slot::Bool(b), OptionValue::Bool(v)) => b.set(v),
            (Slot::Slice(b), OptionValue::Slice(v)) => b.set(v),
            _ => return false,
        }
        true
    }
}
