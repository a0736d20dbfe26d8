//! Shared storage handles that options write through.
//!
//! A [`Binding`] is the caller's view of an option's value. The registry keeps
//! a clone of the handle and writes resolved values into it; everything outside
//! this crate can only read. Clones alias the same slot, so a handle handed out
//! by [`Conf::to_struct`](crate::Conf::to_struct) observes later resolution
//! passes as well.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

pub struct Binding<T> {
    slot: Arc<RwLock<T>>,
}

impl<T: Default> Binding<T> {
    /// Create a handle holding `T::default()`. Declaring an option with this
    /// handle overwrites it with the option's default.
    pub fn new() -> Self {
        Self::with_value(T::default())
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Binding<T> {
    pub(crate) fn with_value(value: T) -> Self {
        Self {
            slot: Arc::new(RwLock::new(value)),
        }
    }

    pub(crate) fn set(&self, value: T) {
        *self.slot.write() = value;
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.read())
    }

    /// True if both handles point at the same slot.
    pub fn same_slot(&self, other: &Binding<T>) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T: Clone> Binding<T> {
    pub fn get(&self) -> T {
        self.slot.read().clone()
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&*self.slot.read()).finish()
    }
}

impl<T: PartialEq> PartialEq for Binding<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_slot(other) || *self.slot.read() == *other.slot.read()
    }
}
