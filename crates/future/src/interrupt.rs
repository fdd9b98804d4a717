//! Cancellation handles
//!
//! An [`InterruptHandle`] lets a party raise on a future's cell without
//! holding the future itself. It does not keep the cell alive: raising on
//! a handle whose promise and future are both gone is a no-op.

use crate::cell::ValueCell;
use std::fmt;
use std::sync::{Arc, Weak};
use strand_core::Error;

/// Anything that accepts cancellation requests
pub(crate) trait Interruptible: Send + Sync {
    fn raise(&self, error: Error);
}

impl<T: Send + 'static> Interruptible for ValueCell<T> {
    fn raise(&self, error: Error) {
        ValueCell::raise(self, error)
    }
}

/// Weak, type-erased handle for raising on one future's cell
///
/// Obtained from [`Future::interrupt_handle`](crate::Future::interrupt_handle).
#[derive(Clone)]
pub struct InterruptHandle {
    target: Weak<dyn Interruptible + Send + Sync>,
}

impl InterruptHandle {
    pub(crate) fn new<T: Send + 'static>(cell: &Arc<ValueCell<T>>) -> Self {
        let target: Weak<ValueCell<T>> = Arc::downgrade(cell);
        InterruptHandle { target }
    }

    /// Raise on the cell, as `Future::raise` would
    ///
    /// Returns `false` if the cell no longer exists.
    pub fn raise(&self, error: impl Into<Error>) -> bool {
        match self.target.upgrade() {
            Some(target) => {
                target.raise(error.into());
                true
            }
            None => false,
        }
    }

    /// Check whether the cell still exists
    pub fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }
}

impl fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
